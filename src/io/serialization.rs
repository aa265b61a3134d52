// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reading and writing the results directory.
//!
//! A save writes four files into the results directory: the image as PNG,
//! its label file, the dataset manifest and the class registry.

use std::fs;
use std::path::{Path, PathBuf};

use super::labels::{
    decode_labels, decode_registry, encode_labels, encode_manifest, encode_registry,
};
use super::media::{save_png, LoadedImage};
use crate::config::Settings;
use crate::error::AnnotateError;
use crate::models::annotation::BoundingBox;
use crate::models::project::AnnotatedImage;
use crate::models::registry::ClassRegistry;

const LABEL_EXTENSION: &str = "txt";
const IMAGE_EXTENSION: &str = "png";

/// Files written by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub image: PathBuf,
    pub labels: PathBuf,
    pub manifest: PathBuf,
    pub registry: PathBuf,
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SavedFiles),
    /// No committed boxes, nothing was written.
    NothingToSave,
}

/// Label file path for an image inside the results directory.
pub fn label_path(settings: &Settings, image: &AnnotatedImage) -> PathBuf {
    settings
        .results_dir
        .join(format!("{}.{}", image.stem(), LABEL_EXTENSION))
}

/// Write the image, its labels, the manifest and the registry.
///
/// # Errors
///
/// [`AnnotateError::NotFound`] if a box references an unknown class (checked
/// before anything is written), otherwise IO, image or serialization errors.
pub fn export_results(
    settings: &Settings,
    image: &AnnotatedImage,
    pixels: &LoadedImage,
    registry: &ClassRegistry,
) -> Result<SaveOutcome, AnnotateError> {
    if image.boxes.is_empty() {
        return Ok(SaveOutcome::NothingToSave);
    }

    let labels = encode_labels(image, registry)?;
    let manifest = encode_manifest(registry, &settings.splits)?;
    let mapping = encode_registry(registry)?;

    fs::create_dir_all(&settings.results_dir)?;

    let files = SavedFiles {
        image: settings
            .results_dir
            .join(format!("{}.{}", image.stem(), IMAGE_EXTENSION)),
        labels: label_path(settings, image),
        manifest: settings.manifest_path(),
        registry: settings.registry_path(),
    };

    save_png(pixels, &files.image)?;
    fs::write(&files.labels, labels)?;
    log::info!("Labels saved to {}", files.labels.display());
    fs::write(&files.manifest, manifest)?;
    log::info!("Manifest saved to {}", files.manifest.display());
    fs::write(&files.registry, mapping)?;

    Ok(SaveOutcome::Saved(files))
}

/// Restore the class registry from `path` if the file exists.
///
/// Returns `false` when there is no file to restore from.
///
/// # Errors
///
/// IO and JSON errors, and anything [`ClassRegistry::load`] rejects.
pub fn import_registry(path: &Path, registry: &mut ClassRegistry) -> Result<bool, AnnotateError> {
    if !path.is_file() {
        log::info!("No class mapping at {}, starting empty", path.display());
        return Ok(false);
    }

    let text = fs::read_to_string(path)?;
    registry.load(decode_registry(&text)?)?;
    Ok(true)
}

/// Read a label file for an image of the given size.
///
/// Every class id must be known to `registry`; a label file referencing an
/// unknown id means it was written against a different class mapping.
///
/// # Errors
///
/// IO errors, [`AnnotateError::Parse`] for malformed lines and
/// [`AnnotateError::NotFound`] for unknown class ids.
pub fn import_labels(
    path: &Path,
    width: u32,
    height: u32,
    registry: &ClassRegistry,
) -> Result<Vec<BoundingBox>, AnnotateError> {
    let text = fs::read_to_string(path)?;
    let boxes = decode_labels(&text, width, height)?;
    for bbox in &boxes {
        registry.reverse_lookup(bbox.class_id)?;
    }
    log::info!("Imported {} box(es) from {}", boxes.len(), path.display());
    Ok(boxes)
}
