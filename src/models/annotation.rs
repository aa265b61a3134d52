// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the rectangles the editor works with: the pending
//! box being dragged out by the user and the committed, labelled box.
//! All coordinates are image pixels with the origin at the top-left corner.

use serde::{Deserialize, Serialize};

use super::registry::ClassId;

/// A 2D point in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A box still being drawn.
///
/// Width and height are signed: dragging up or to the left yields negative
/// extents until the box is normalized on commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PendingBox {
    /// A zero-size box anchored at `origin`.
    pub fn at(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the box so its far corner sits at `corner`.
    pub fn stretch_to(&mut self, corner: Point) {
        self.width = corner.x - self.x;
        self.height = corner.y - self.y;
    }

    /// Flip negative extents so the same region has a positive size and a
    /// top-left origin.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self { x, y, width, height }
    }

    /// True when the box covers a non-empty area.
    pub fn has_area(&self) -> bool {
        let n = self.normalized();
        n.width > 0.0 && n.height > 0.0
    }

    /// Normalize and attach a class id.
    pub fn label(&self, class_id: ClassId) -> BoundingBox {
        let n = self.normalized();
        BoundingBox {
            x: n.x,
            y: n.y,
            width: n.width,
            height: n.height,
            class_id,
        }
    }
}

/// A committed, labelled box. Width and height are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub class_id: ClassId,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64, class_id: ClassId) -> Self {
        Self {
            x,
            y,
            width,
            height,
            class_id,
        }
    }

    /// Center of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_keeps_signed_extent() {
        let mut pending = PendingBox::at(Point::new(300.0, 400.0));
        pending.stretch_to(Point::new(100.0, 100.0));
        assert_eq!(pending.width, -200.0);
        assert_eq!(pending.height, -300.0);
        assert_eq!(pending.x, 300.0);
    }

    #[test]
    fn test_normalize_flips_to_top_left() {
        let pending = PendingBox {
            x: 300.0,
            y: 100.0,
            width: -200.0,
            height: 300.0,
        };
        let n = pending.normalized();
        assert_eq!(n, PendingBox { x: 100.0, y: 100.0, width: 200.0, height: 300.0 });
    }

    #[test]
    fn test_zero_extent_has_no_area() {
        let mut pending = PendingBox::at(Point::new(10.0, 10.0));
        assert!(!pending.has_area());
        pending.stretch_to(Point::new(50.0, 10.0));
        assert!(!pending.has_area());
        pending.stretch_to(Point::new(50.0, 5.0));
        assert!(pending.has_area());
    }

    #[test]
    fn test_label_normalizes() {
        let pending = PendingBox {
            x: 50.0,
            y: 60.0,
            width: -10.0,
            height: -20.0,
        };
        let bbox = pending.label(ClassId(3));
        assert_eq!(bbox, BoundingBox::new(40.0, 40.0, 10.0, 20.0, ClassId(3)));
        assert_eq!(bbox.center(), Point::new(45.0, 50.0));
    }
}
