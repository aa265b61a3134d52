// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the egui widgets to the annotation session: it feeds
//! canvas pointer events and toolbar actions into the session and renders
//! whatever the session exposes. It holds no annotation logic of its own.

use anyhow::Context;
use boxmark::config::Settings;
use boxmark::io::media::{load_image, LoadedImage};
use boxmark::io::serialization::{import_labels, import_registry, label_path, SaveOutcome};
use boxmark::session::OverlayRect;
use boxmark::{AnnotateError, AnnotationSession, ClassRegistry};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

use crate::ui::{canvas, toolbar};

/// Result of background image loading operation.
struct LoadedImageData {
    path: PathBuf,
    image: LoadedImage,
}

/// Main application state.
pub struct BoxMarkApp {
    settings: Settings,

    /// Registry, current image, editor state and display transform
    session: AnnotationSession,

    /// Decoded pixels of the current image, written out on save
    pixels: Option<LoadedImage>,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Contents of the class name field
    class_text: String,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last message shown in the status line
    status: String,
}

impl BoxMarkApp {
    /// Create the application, restoring the class mapping from the results
    /// directory if one was saved before.
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let mut registry = ClassRegistry::new();
        let registry_path = settings.registry_path();
        import_registry(&registry_path, &mut registry).with_context(|| {
            format!(
                "Failed to restore classes from {}",
                registry_path.display()
            )
        })?;

        let status = if registry.is_empty() {
            "Open an image to begin labeling".to_string()
        } else {
            format!("Restored {} class(es)", registry.len())
        };

        Ok(Self {
            settings,
            session: AnnotationSession::new(registry),
            pixels: None,
            image_texture: None,
            class_text: String::new(),
            image_loader: None,
            loading_message: None,
            status,
        })
    }

    /// Load an image file in the background.
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = load_image(&path)
                .map(|image| LoadedImageData { path, image })
                .map_err(|e| format!("Failed to load image: {}", e));
            let _ = sender.send(result);
        });
    }

    /// Hand a decoded image to the session and pick up labels saved for it
    /// earlier.
    fn accept_image(&mut self, ctx: &egui::Context, data: LoadedImageData) {
        let LoadedImageData { path, image } = data;

        let size = [image.width as usize, image.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
        self.image_texture = Some(ctx.load_texture(
            "loaded_image",
            color_image,
            egui::TextureOptions::LINEAR,
        ));

        self.session.load_image(path, image.width, image.height);
        self.class_text.clear();
        self.status = format!("Loaded {}x{} image", image.width, image.height);

        if let Some(current) = self.session.image() {
            let labels = label_path(&self.settings, current);
            if labels.is_file() {
                match import_labels(&labels, image.width, image.height, self.session.registry()) {
                    Ok(boxes) => {
                        self.status = format!("Loaded {} saved box(es)", boxes.len());
                        self.session.restore_boxes(boxes);
                    }
                    Err(e) => {
                        log::error!("Failed to read {}: {}", labels.display(), e);
                        self.status = format!("Could not read saved labels: {}", e);
                    }
                }
            }
        }

        self.pixels = Some(image);
    }

    fn pick_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    fn commit_label(&mut self) {
        match self.session.commit_label(&self.class_text) {
            Ok(_) => self.status = format!("{} box(es)", self.session.boxes().len()),
            Err(AnnotateError::EmptyCommit(reason)) => log::debug!("Commit ignored: {}", reason),
            Err(e) => log::error!("Commit failed: {}", e),
        }
    }

    fn save_labels(&mut self) {
        let Some(pixels) = self.pixels.as_ref() else {
            return;
        };

        match self.session.save(&self.settings, pixels) {
            Ok(SaveOutcome::Saved(files)) => {
                self.status = format!("Labels saved to {}", files.labels.display());
            }
            Ok(SaveOutcome::NothingToSave) => {}
            Err(e) => {
                log::error!("Failed to save labels: {}", e);
                self.status = format!("Save failed: {}", e);
            }
        }
    }

    fn overlay(&mut self) -> Vec<OverlayRect> {
        match self.session.overlay() {
            Ok(rects) => rects,
            Err(e) => {
                log::error!("Cannot draw boxes: {}", e);
                self.status = format!("Class mapping out of sync: {}", e);
                Vec::new()
            }
        }
    }

    fn apply_canvas_event(&mut self, event: canvas::CanvasEvent) {
        let result = match event {
            canvas::CanvasEvent::Resize(width, height) => {
                if self.session.viewport() == Some((width, height)) {
                    return;
                }
                self.session.resize_viewport(width, height).map(|_| ())
            }
            canvas::CanvasEvent::PointerDown(x, y) => self.session.pointer_down(x, y),
            canvas::CanvasEvent::PointerMove(x, y) => self.session.pointer_move(x, y),
            canvas::CanvasEvent::PointerUp(x, y) => self.session.pointer_up(x, y),
        };

        if let Err(e) = result {
            log::debug!("Canvas event ignored: {}", e);
        }
    }
}

impl eframe::App for BoxMarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(data) => self.accept_image(ctx, data),
                    Err(e) => {
                        log::error!("{}", e);
                        self.status = e;
                    }
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.pick_image();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.session.can_save(), egui::Button::new("Save Labels"))
                        .clicked()
                    {
                        self.save_labels();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let can_save = self.session.can_save();
        let toolbar_action = egui::TopBottomPanel::bottom("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &mut self.class_text,
                    self.session.class_input_mut(),
                    can_save,
                    &self.status,
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::LoadImage => self.pick_image(),
            toolbar::ToolbarAction::Save => self.save_labels(),
            toolbar::ToolbarAction::Commit => self.commit_label(),
            toolbar::ToolbarAction::None => {}
        }

        // Main canvas (center)
        let overlay = self.overlay();
        let canvas_events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                // Show loading overlay if loading
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    canvas::show(ui, &self.image_texture, self.session.transform(), &overlay)
                }
            })
            .inner;

        for event in canvas_events {
            self.apply_canvas_event(event);
        }
    }
}
