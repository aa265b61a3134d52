// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Output locations and command line options.

use clap::Parser;
use std::path::PathBuf;

/// Relative image directories written into the dataset manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPaths {
    pub train: String,
    pub val: String,
    pub test: String,
}

impl Default for SplitPaths {
    fn default() -> Self {
        Self {
            train: "../train/images".to_string(),
            val: "../valid/images".to_string(),
            test: "../test/images".to_string(),
        }
    }
}

/// Where and under which names results are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory receiving images, label files, the manifest and the registry.
    pub results_dir: PathBuf,
    pub registry_file: String,
    pub manifest_file: String,
    pub splits: SplitPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            registry_file: "class_to_id_mapping.json".to_string(),
            manifest_file: "data.yaml".to_string(),
            splits: SplitPaths::default(),
        }
    }
}

impl Settings {
    pub fn registry_path(&self) -> PathBuf {
        self.results_dir.join(&self.registry_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.results_dir.join(&self.manifest_file)
    }
}

/// Command line options for the desktop tool.
#[derive(Debug, Parser)]
#[command(name = "boxmark", version, about = "Draw and label bounding boxes for detector training")]
pub struct Cli {
    /// Directory for saved images, labels, data.yaml and the class mapping
    #[arg(long, value_name = "DIR", default_value = "results")]
    pub results_dir: PathBuf,

    /// Image to open on startup
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            results_dir: self.results_dir.clone(),
            ..Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let settings = Settings::default();
        assert_eq!(
            settings.registry_path(),
            PathBuf::from("results").join("class_to_id_mapping.json")
        );
        assert_eq!(settings.manifest_path(), PathBuf::from("results").join("data.yaml"));
    }

    #[test]
    fn test_cli_overrides_results_dir() {
        let cli = Cli::parse_from(["boxmark", "--results-dir", "/tmp/out", "cat.jpg"]);
        assert_eq!(cli.image, Some(PathBuf::from("cat.jpg")));
        let settings = cli.settings();
        assert_eq!(settings.results_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.manifest_file, "data.yaml");
    }
}
