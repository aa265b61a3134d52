// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the load/save buttons and the class name field.

use boxmark::session::ClassInput;

/// Action requested from the toolbar this frame.
pub enum ToolbarAction {
    None,
    LoadImage,
    Save,
    /// Enter pressed in the class name field
    Commit,
}

/// Display the toolbar and report which action, if any, was triggered.
pub fn show(
    ui: &mut egui::Ui,
    class_text: &mut String,
    input: &mut ClassInput,
    can_save: bool,
    status: &str,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("Load Image").clicked() {
            action = ToolbarAction::LoadImage;
        }

        if ui.add_enabled(can_save, egui::Button::new("Save Labels")).clicked() {
            action = ToolbarAction::Save;
        }

        ui.separator();

        if input.take_clear_request() {
            class_text.clear();
        }

        let response = ui.add_enabled(
            input.enabled,
            egui::TextEdit::singleline(class_text)
                .hint_text("Class name")
                .desired_width(200.0),
        );

        if input.take_focus_request() {
            response.request_focus();
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            action = ToolbarAction::Commit;
        }

        ui.separator();
        ui.label(egui::RichText::new(status).italics().weak());
    });

    action
}
