// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BoxMark annotation engine.
//!
//! Maps pointer positions on a letterboxed display back to image pixels,
//! runs the draw → label → commit cycle for bounding boxes, keeps class ids
//! stable across sessions and reads/writes detector training labels.

pub mod config;
pub mod editor;
pub mod error;
pub mod io;
pub mod models;
pub mod session;
pub mod util;

pub use error::AnnotateError;
pub use models::annotation::{BoundingBox, PendingBox, Point};
pub use models::project::AnnotatedImage;
pub use models::registry::{ClassId, ClassRegistry};
pub use session::AnnotationSession;
pub use util::geometry::DisplayTransform;
