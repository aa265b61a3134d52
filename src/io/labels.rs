// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label, registry and manifest text formats.
//!
//! Label files hold one box per line:
//!
//! ```text
//! <class_id> <x_center> <y_center> <width> <height>
//! ```
//!
//! with the four geometry values normalized by the image size. The class
//! registry is a JSON object of name to id, and the dataset manifest is the
//! YAML document detector training tools expect next to the splits.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::SplitPaths;
use crate::error::AnnotateError;
use crate::models::annotation::BoundingBox;
use crate::models::project::AnnotatedImage;
use crate::models::registry::{ClassId, ClassRegistry};
use crate::util::geometry::{from_normalized_cxcywh, to_normalized_cxcywh};

/// Decimal places written for normalized values.
const LABEL_PRECISION: usize = 8;

/// Dataset manifest (`data.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub train: String,
    pub val: String,
    pub test: String,
    pub nc: usize,
    pub names: Vec<String>,
}

/// Encode the committed boxes of `image` as label text.
///
/// # Errors
///
/// [`AnnotateError::NotFound`] if a box carries a class id the registry does
/// not know. Nothing is encoded in that case.
pub fn encode_labels(
    image: &AnnotatedImage,
    registry: &ClassRegistry,
) -> Result<String, AnnotateError> {
    for bbox in &image.boxes {
        registry.reverse_lookup(bbox.class_id)?;
    }

    let mut out = String::new();
    for bbox in &image.boxes {
        let (cx, cy, w, h) = to_normalized_cxcywh(bbox, image.width, image.height);
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            bbox.class_id,
            format_normalized(cx),
            format_normalized(cy),
            format_normalized(w),
            format_normalized(h)
        ));
    }
    Ok(out)
}

/// Decode label text back into pixel-space boxes.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// [`AnnotateError::Parse`] naming the first malformed line (1-based).
pub fn decode_labels(
    text: &str,
    width: u32,
    height: u32,
) -> Result<Vec<BoundingBox>, AnnotateError> {
    let mut boxes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let Some(row) = parse_label_line(line, idx + 1)? else {
            continue;
        };
        let (x, y, w, h) = from_normalized_cxcywh(row.cx, row.cy, row.w, row.h, width, height);
        boxes.push(BoundingBox::new(x, y, w, h, row.class_id));
    }
    Ok(boxes)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LabelRow {
    class_id: ClassId,
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
}

fn parse_label_line(line: &str, line_num: usize) -> Result<Option<LabelRow>, AnnotateError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Six tokens are enough to tell "too many" apart from "exactly five".
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
    if tokens.len() != 5 {
        let found = if tokens.len() > 5 {
            "more than 5".to_string()
        } else {
            tokens.len().to_string()
        };
        return Err(AnnotateError::Parse {
            line: line_num,
            message: format!("expected 5 fields, found {found}"),
        });
    }

    let class_id = tokens[0]
        .parse::<u32>()
        .map(ClassId)
        .map_err(|_| AnnotateError::Parse {
            line: line_num,
            message: format!(
                "invalid class id '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    Ok(Some(LabelRow {
        class_id,
        cx: parse_f64_token(tokens[1], "x_center", line_num)?,
        cy: parse_f64_token(tokens[2], "y_center", line_num)?,
        w: parse_f64_token(tokens[3], "width", line_num)?,
        h: parse_f64_token(tokens[4], "height", line_num)?,
    }))
}

fn parse_f64_token(token: &str, field: &str, line_num: usize) -> Result<f64, AnnotateError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AnnotateError::Parse {
            line: line_num,
            message: format!("invalid {field} '{token}'; expected finite number"),
        }),
    }
}

/// Fixed precision with trailing zeros trimmed: `0.25`, `0.41666667`, `1`.
fn format_normalized(value: f64) -> String {
    let fixed = format!("{:.*}", LABEL_PRECISION, value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Encode the dataset manifest for the current registry.
///
/// # Errors
///
/// Propagates YAML serialization failures.
pub fn encode_manifest(
    registry: &ClassRegistry,
    splits: &SplitPaths,
) -> Result<String, AnnotateError> {
    let manifest = DatasetManifest {
        train: splits.train.clone(),
        val: splits.val.clone(),
        test: splits.test.clone(),
        nc: registry.len(),
        names: registry.names_sorted_by_id(),
    };
    Ok(serde_yaml::to_string(&manifest)?)
}

/// Parse a dataset manifest.
///
/// # Errors
///
/// [`AnnotateError::ManifestYaml`] for malformed YAML or missing keys.
pub fn decode_manifest(text: &str) -> Result<DatasetManifest, AnnotateError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Encode the registry as a JSON object of name to id.
///
/// # Errors
///
/// Propagates JSON serialization failures.
pub fn encode_registry(registry: &ClassRegistry) -> Result<String, AnnotateError> {
    let mapping: BTreeMap<String, ClassId> = registry.entries().into_iter().collect();
    Ok(serde_json::to_string_pretty(&mapping)?)
}

/// Decode a persisted registry into `(name, id)` pairs ordered by id,
/// ready for [`ClassRegistry::load`].
///
/// # Errors
///
/// [`AnnotateError::RegistryJson`] for malformed JSON, non-integer or
/// negative ids.
pub fn decode_registry(text: &str) -> Result<Vec<(String, ClassId)>, AnnotateError> {
    let mapping: HashMap<String, ClassId> = serde_json::from_str(text)?;
    let mut entries: Vec<(String, ClassId)> = mapping.into_iter().collect();
    entries.sort_by_key(|(_, id)| *id);
    Ok(entries)
}
