// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BoxMark - bounding box labeling tool
//!
//! A desktop application for drawing bounding boxes on an image, naming
//! their classes and saving detector training labels.

mod app;
mod ui;

use anyhow::Result;
use app::BoxMarkApp;
use boxmark::config::Cli;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let settings = cli.settings();
    let mut app = BoxMarkApp::new(settings)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("BoxMark - Bounding Box Labeling Tool"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "BoxMark",
        options,
        Box::new(move |_cc| {
            if let Some(path) = cli.image {
                app.load_image_file(path);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
