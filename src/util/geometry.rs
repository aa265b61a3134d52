// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations between display
//! space (pointer position inside the canvas), image space (pixels of the
//! original bitmap) and normalized coordinates (fractions of the image size).

use crate::error::AnnotateError;
use crate::models::annotation::{BoundingBox, Point};

/// Uniform scale and centering offset of an image letterboxed into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DisplayTransform {
    /// Fit an image into a viewport, preserving its aspect ratio and
    /// centering it on the axis with slack.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::InvalidTransform`] if any dimension is zero, negative
    /// or not finite, since no usable scale exists.
    pub fn fit(
        image_width: f64,
        image_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, AnnotateError> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !(usable(image_width)
            && usable(image_height)
            && usable(viewport_width)
            && usable(viewport_height))
        {
            return Err(AnnotateError::InvalidTransform {
                image_width,
                image_height,
                viewport_width,
                viewport_height,
            });
        }

        let scale = (viewport_width / image_width).min(viewport_height / image_height);
        Ok(Self {
            scale,
            offset_x: (viewport_width - image_width * scale) / 2.0,
            offset_y: (viewport_height - image_height * scale) / 2.0,
        })
    }

    /// Map a display-space position to image pixels.
    pub fn to_image_space(&self, px: f64, py: f64) -> Point {
        Point::new(
            (px - self.offset_x) / self.scale,
            (py - self.offset_y) / self.scale,
        )
    }

    /// Map an image-space position to display space.
    pub fn to_display_space(&self, point: Point) -> (f64, f64) {
        (
            point.x * self.scale + self.offset_x,
            point.y * self.scale + self.offset_y,
        )
    }

    /// Display-space `(x, y, width, height)` of an image-space rectangle.
    pub fn to_display_rect(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        let (dx, dy) = self.to_display_space(Point::new(x, y));
        (dx, dy, width * self.scale, height * self.scale)
    }
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_x / width as f64,
        y: pixel_y / height as f64,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (point.x * width as f64, point.y * height as f64)
}

/// Normalized `(x_center, y_center, width, height)` of a box.
///
/// Boxes reaching past the image edge produce values outside `[0, 1]`;
/// they are not clamped.
pub fn to_normalized_cxcywh(bbox: &BoundingBox, width: u32, height: u32) -> (f64, f64, f64, f64) {
    let center = normalize_coordinates(bbox.center().x, bbox.center().y, width, height);
    let size = normalize_coordinates(bbox.width, bbox.height, width, height);
    (center.x, center.y, size.x, size.y)
}

/// Pixel-space `(x, y, width, height)` of a normalized center/size box.
pub fn from_normalized_cxcywh(
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
    width: u32,
    height: u32,
) -> (f64, f64, f64, f64) {
    let (center_x, center_y) = denormalize_coordinates(&Point::new(cx, cy), width, height);
    let (box_w, box_h) = denormalize_coordinates(&Point::new(w, h), width, height);
    (center_x - box_w / 2.0, center_y - box_h / 2.0, box_w, box_h)
}
