// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading and PNG export.
//!
//! Images are decoded to tightly packed RGBA8 so the same buffer can be
//! uploaded as an egui texture and written back out at native resolution.

use std::path::Path;

use crate::error::AnnotateError;

/// Decoded image pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Decode an image file.
///
/// # Errors
///
/// [`AnnotateError::Image`] if the file cannot be read or decoded.
pub fn load_image(path: &Path) -> Result<LoadedImage, AnnotateError> {
    let rgba = image::open(path)
        .map_err(|source| AnnotateError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();

    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Write the pixels as a PNG file.
///
/// # Errors
///
/// [`AnnotateError::Image`] if encoding or writing fails.
pub fn save_png(image: &LoadedImage, path: &Path) -> Result<(), AnnotateError> {
    image::save_buffer_with_format(
        path,
        &image.pixels,
        image.width,
        image.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|source| AnnotateError::Image {
        path: path.to_path_buf(),
        source,
    })
}
