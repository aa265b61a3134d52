// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: boxes, the class registry and the annotated image.

pub mod annotation;
pub mod project;
pub mod registry;
