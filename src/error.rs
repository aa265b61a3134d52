// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error type for the annotation engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::registry::ClassId;

/// The main error type for BoxMark operations.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// Image or viewport dimensions that cannot produce a display transform.
    #[error(
        "Cannot fit a {image_width}x{image_height} image into a \
         {viewport_width}x{viewport_height} viewport"
    )]
    InvalidTransform {
        image_width: f64,
        image_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    },

    /// Commit attempted with a blank class name or a zero-area box.
    #[error("Commit rejected: {0}")]
    EmptyCommit(&'static str),

    /// Malformed line in a label file.
    #[error("Invalid label on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A class id with no name in the registry.
    #[error("Class id {0} is not in the class registry")]
    NotFound(ClassId),

    /// Two class names mapped to the same id in a persisted registry.
    #[error("Class id {id} is assigned to both '{first}' and '{second}'")]
    DuplicateClassId {
        id: ClassId,
        first: String,
        second: String,
    },

    /// A persisted id too large to leave room for new classes after it.
    #[error("Class id {0} leaves no room for new classes")]
    ClassIdOverflow(ClassId),

    /// `load` called on a registry that already assigned ids.
    #[error("Class registry already holds {0} class(es); it can only be loaded once at startup")]
    RegistryInUse(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read class registry JSON: {0}")]
    RegistryJson(#[from] serde_json::Error),

    #[error("Failed to read dataset manifest YAML: {0}")]
    ManifestYaml(#[from] serde_yaml::Error),

    #[error("Image error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
