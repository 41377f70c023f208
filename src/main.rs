// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Trimline - clip trimming timeline
//!
//! A cross-platform desktop application for previewing a clip, marking a
//! start and end point on a zoomable timeline and exporting the range.

mod app;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::TrimApp;
use clap::Parser;
use io::config::Settings;
use std::path::PathBuf;

/// Trim clips on a zoomable timeline.
#[derive(Parser, Debug)]
#[command(name = "trimline", version, about)]
struct Cli {
    /// Clip to open on startup
    video: Option<PathBuf>,

    /// Settings file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = match cli.config {
        Some(ref path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    log::debug!("Settings: {:?}", settings);

    if let Some(ref path) = cli.write_config {
        settings.save(path)?;
        log::info!("Settings written to {}", path.display());
        return Ok(());
    }

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Trimline")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    // Run the application
    let initial_clip = cli.video;
    eframe::run_native(
        "Trimline",
        options,
        Box::new(move |_cc| Ok(Box::new(TrimApp::new(settings, initial_clip)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
