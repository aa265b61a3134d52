// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The image currently being annotated.

use super::annotation::BoundingBox;
use std::path::PathBuf;

/// An image together with the boxes committed on it so far.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<BoundingBox>,
}

impl AnnotatedImage {
    /// Create an image record with no boxes.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            boxes: Vec::new(),
        }
    }

    /// File stem used to name the label file and the PNG artifact.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}
