// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! The canvas draws the letterboxed image and the overlay rectangles it is
//! given, and reports its size and pointer activity as events in
//! canvas-local coordinates. It never changes annotation state itself.

use boxmark::session::OverlayRect;
use boxmark::DisplayTransform;

/// Input observed on the canvas, relative to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    Resize(f64, f64),
    PointerDown(f64, f64),
    PointerMove(f64, f64),
    PointerUp(f64, f64),
}

/// Display the main canvas area and collect mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    image_texture: &Option<egui::TextureHandle>,
    transform: Option<DisplayTransform>,
    overlay: &[OverlayRect],
) -> Vec<CanvasEvent> {
    let mut events = Vec::new();

    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();
    let (response, painter) = ui.allocate_painter(available_size, egui::Sense::drag());
    let canvas = response.rect;
    let origin = canvas.min;
    events.push(CanvasEvent::Resize(canvas.width() as f64, canvas.height() as f64));

    painter.rect_filled(canvas, 0.0, egui::Color32::from_gray(40));

    let Some(texture) = image_texture else {
        painter.text(
            canvas.center(),
            egui::Align2::CENTER_CENTER,
            "Load an image to begin labeling",
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(180),
        );
        return events;
    };

    let to_screen = |x: f64, y: f64, w: f64, h: f64| {
        egui::Rect::from_min_size(
            origin + egui::vec2(x as f32, y as f32),
            egui::vec2(w as f32, h as f32),
        )
    };

    if let Some(transform) = transform {
        let size = texture.size_vec2();
        let image_rect = to_screen(
            transform.offset_x,
            transform.offset_y,
            size.x as f64 * transform.scale,
            size.y as f64 * transform.scale,
        );

        // Draw the image
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    // Draw the committed boxes and the box being drawn
    for rect in overlay {
        let screen = to_screen(rect.x, rect.y, rect.width, rect.height);
        match &rect.label {
            Some(label) => {
                painter.rect_stroke(screen, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));
                painter.text(
                    screen.left_top(),
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::proportional(14.0),
                    egui::Color32::RED,
                );
            }
            None => {
                painter.rect_stroke(screen, 0.0, egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE));
            }
        }
    }

    // Handle mouse interactions
    let local = |pos: egui::Pos2| {
        let rel = pos - origin;
        (rel.x as f64, rel.y as f64)
    };

    if response.drag_started_by(egui::PointerButton::Primary) {
        // The drag is recognized after the pointer has moved; start the box
        // where the button went down.
        let start = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let Some(pos) = start {
            let (x, y) = local(pos);
            events.push(CanvasEvent::PointerDown(x, y));
        }
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        if let Some(pos) = response.interact_pointer_pos() {
            let (x, y) = local(pos);
            events.push(CanvasEvent::PointerMove(x, y));
        }
    }

    if response.drag_stopped_by(egui::PointerButton::Primary) {
        let end = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));
        if let Some(pos) = end {
            let (x, y) = local(pos);
            events.push(CanvasEvent::PointerUp(x, y));
        }
    }

    events
}
