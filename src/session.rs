// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! The session owns everything the engine needs between events: the class
//! registry, the image being annotated, the display transform and the
//! editor state. Pointer events arrive in display space, are mapped into
//! image space, stepped through the editor and the resulting effects are
//! applied here. The GUI reads the outcome as plain data.

use std::path::PathBuf;

use crate::config::Settings;
use crate::editor::{Effect, EditorEvent, EditorState};
use crate::error::AnnotateError;
use crate::io::media::LoadedImage;
use crate::io::serialization::{export_results, SaveOutcome};
use crate::models::annotation::{BoundingBox, PendingBox, Point};
use crate::models::project::AnnotatedImage;
use crate::models::registry::ClassRegistry;
use crate::util::geometry::DisplayTransform;

/// State of the class-name text field as requested by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassInput {
    pub enabled: bool,
    focus_requested: bool,
    clear_requested: bool,
}

impl ClassInput {
    /// Consume a pending request to focus the field.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Consume a pending request to clear the field.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }
}

/// A rectangle to draw over the displayed image.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Class name for committed boxes, `None` for the box being drawn.
    pub label: Option<String>,
}

/// One annotation session: a registry shared across images plus the
/// current image.
#[derive(Debug, Default)]
pub struct AnnotationSession {
    registry: ClassRegistry,
    image: Option<AnnotatedImage>,
    editor: EditorState,
    viewport: Option<(f64, f64)>,
    transform: Option<DisplayTransform>,
    class_input: ClassInput,
    unsaved: bool,
}

impl AnnotationSession {
    pub fn new(registry: ClassRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn image(&self) -> Option<&AnnotatedImage> {
        self.image.as_ref()
    }

    pub fn editor_state(&self) -> EditorState {
        self.editor
    }

    pub fn transform(&self) -> Option<DisplayTransform> {
        self.transform
    }

    /// Last viewport size reported by the display.
    pub fn viewport(&self) -> Option<(f64, f64)> {
        self.viewport
    }

    pub fn class_input(&self) -> &ClassInput {
        &self.class_input
    }

    pub fn class_input_mut(&mut self) -> &mut ClassInput {
        &mut self.class_input
    }

    /// Committed boxes of the current image.
    pub fn boxes(&self) -> &[BoundingBox] {
        match &self.image {
            Some(image) => &image.boxes,
            None => &[],
        }
    }

    /// Box being drawn or waiting for a label.
    pub fn pending(&self) -> Option<PendingBox> {
        self.editor.pending().copied()
    }

    /// True when there are committed boxes not yet written to disk.
    pub fn can_save(&self) -> bool {
        self.unsaved && !self.boxes().is_empty()
    }

    /// Start annotating a new image. Boxes of the previous image and any
    /// unfinished box are discarded.
    pub fn load_image(&mut self, path: impl Into<PathBuf>, width: u32, height: u32) {
        if self.unsaved || self.editor != EditorState::Idle {
            log::warn!("Discarding unsaved annotations of the previous image");
        }

        let image = AnnotatedImage::new(path, width, height);
        log::info!("Annotating {} ({}x{})", image.path.display(), width, height);
        self.image = Some(image);
        self.editor = EditorState::Idle;
        self.class_input = ClassInput::default();
        self.unsaved = false;
        self.refresh_transform();
    }

    /// Replace the committed boxes of the current image, e.g. with ones read
    /// back from an earlier label file. They count as already saved.
    pub fn restore_boxes(&mut self, boxes: Vec<BoundingBox>) {
        if let Some(image) = self.image.as_mut() {
            image.boxes = boxes;
        }
    }

    /// Record a new viewport size and recompute the display transform.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::InvalidTransform`] for unusable sizes. Pointer events
    /// are ignored until a valid size arrives.
    pub fn resize_viewport(
        &mut self,
        width: f64,
        height: f64,
    ) -> Result<Option<DisplayTransform>, AnnotateError> {
        self.viewport = Some((width, height));
        self.transform = None;
        let Some(image) = self.image.as_ref() else {
            return Ok(None);
        };

        let transform =
            DisplayTransform::fit(image.width as f64, image.height as f64, width, height)?;
        self.transform = Some(transform);
        Ok(Some(transform))
    }

    fn refresh_transform(&mut self) {
        if let Some((width, height)) = self.viewport {
            if let Err(e) = self.resize_viewport(width, height) {
                log::warn!("{}", e);
            }
        }
    }

    fn to_image_space(&self, px: f64, py: f64) -> Result<Point, AnnotateError> {
        match self.transform {
            Some(transform) => Ok(transform.to_image_space(px, py)),
            None => {
                let (image_width, image_height) = self
                    .image
                    .as_ref()
                    .map_or((0.0, 0.0), |image| (image.width as f64, image.height as f64));
                let (viewport_width, viewport_height) = self.viewport.unwrap_or((0.0, 0.0));
                Err(AnnotateError::InvalidTransform {
                    image_width,
                    image_height,
                    viewport_width,
                    viewport_height,
                })
            }
        }
    }

    /// Pointer pressed at a display-space position.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::InvalidTransform`] when no image is displayed.
    pub fn pointer_down(&mut self, px: f64, py: f64) -> Result<(), AnnotateError> {
        let at = self.to_image_space(px, py)?;
        self.handle(EditorEvent::PointerDown(at)).map(|_| ())
    }

    /// Pointer moved to a display-space position.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::InvalidTransform`] when no image is displayed.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> Result<(), AnnotateError> {
        let at = self.to_image_space(px, py)?;
        self.handle(EditorEvent::PointerMove(at)).map(|_| ())
    }

    /// Pointer released at a display-space position.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::InvalidTransform`] when no image is displayed.
    pub fn pointer_up(&mut self, px: f64, py: f64) -> Result<(), AnnotateError> {
        let at = self.to_image_space(px, py)?;
        self.handle(EditorEvent::PointerUp(at)).map(|_| ())
    }

    /// Label the pending box with `class_name`.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::EmptyCommit`] when the name is blank, the box has no
    /// area or nothing is pending. The pending box is kept.
    pub fn commit_label(&mut self, class_name: &str) -> Result<BoundingBox, AnnotateError> {
        self.handle(EditorEvent::Commit(class_name.to_string()))?
            .ok_or(AnnotateError::EmptyCommit("no image loaded"))
    }

    fn handle(&mut self, event: EditorEvent) -> Result<Option<BoundingBox>, AnnotateError> {
        if self.image.is_none() {
            return Ok(None);
        }

        let (next, effects) = self.editor.step(event);
        if next != self.editor {
            log::debug!("Editor {:?} -> {:?}", self.editor, next);
        }
        self.editor = next;

        let mut committed = None;
        for effect in effects {
            match effect {
                Effect::DisableClassInput => self.class_input.enabled = false,
                Effect::EnableClassInput => self.class_input.enabled = true,
                Effect::FocusClassInput => self.class_input.focus_requested = true,
                Effect::ClearClassInput => self.class_input.clear_requested = true,
                Effect::CommitBox { class_name, pending } => {
                    committed = self.commit(&class_name, pending);
                }
                Effect::CommitRejected(reason) => {
                    log::debug!("Commit ignored: {}", reason.as_str());
                    return Err(AnnotateError::EmptyCommit(reason.as_str()));
                }
            }
        }
        Ok(committed)
    }

    fn commit(&mut self, class_name: &str, pending: PendingBox) -> Option<BoundingBox> {
        let image = self.image.as_mut()?;
        let class_id = self.registry.resolve(class_name);
        let bbox = pending.label(class_id);
        image.boxes.push(bbox);
        self.unsaved = true;
        log::info!(
            "Committed '{}' box at ({:.1}, {:.1}) {:.1}x{:.1}, total: {}",
            class_name,
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height,
            image.boxes.len()
        );
        Some(bbox)
    }

    /// Rectangles to draw, in display space: committed boxes with their class
    /// names followed by the pending box.
    ///
    /// # Errors
    ///
    /// [`AnnotateError::NotFound`] if a committed box has a class id missing
    /// from the registry.
    pub fn overlay(&self) -> Result<Vec<OverlayRect>, AnnotateError> {
        let Some(transform) = self.transform else {
            return Ok(Vec::new());
        };

        let mut rects = Vec::with_capacity(self.boxes().len() + 1);
        for bbox in self.boxes() {
            let (x, y, width, height) =
                transform.to_display_rect(bbox.x, bbox.y, bbox.width, bbox.height);
            rects.push(OverlayRect {
                x,
                y,
                width,
                height,
                label: Some(self.registry.reverse_lookup(bbox.class_id)?.to_string()),
            });
        }
        if let Some(pending) = self.pending() {
            let n = pending.normalized();
            let (x, y, width, height) = transform.to_display_rect(n.x, n.y, n.width, n.height);
            rects.push(OverlayRect {
                x,
                y,
                width,
                height,
                label: None,
            });
        }
        Ok(rects)
    }

    /// Write the current image and its labels.
    ///
    /// Saving with no image or no committed boxes does nothing.
    ///
    /// # Errors
    ///
    /// Anything [`export_results`] reports.
    pub fn save(
        &mut self,
        settings: &Settings,
        pixels: &LoadedImage,
    ) -> Result<SaveOutcome, AnnotateError> {
        let Some(image) = self.image.as_ref() else {
            return Ok(SaveOutcome::NothingToSave);
        };

        let outcome = export_results(settings, image, pixels, &self.registry)?;
        if matches!(outcome, SaveOutcome::Saved(_)) {
            self.unsaved = false;
        }
        Ok(outcome)
    }
}
