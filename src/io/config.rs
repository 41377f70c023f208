// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings can be read from a YAML or JSON file. Every field has a
//! default, so a file only needs to list the values it overrides.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable behaviour of the timeline, playback and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preview frames fetched per second while playing or scrubbing.
    pub preview_fps: u32,
    /// Playback clock ticks per second.
    pub clock_hz: u32,
    /// Initial zoom in pixels per second.
    pub default_pps: f64,
    pub min_pps: f64,
    pub max_pps: f64,
    /// Zoom range covered by the 0-100 zoom slider.
    pub slider_min_pps: f64,
    pub slider_max_pps: f64,
    /// Zoom multiplier per wheel step.
    pub wheel_zoom_factor: f64,
    pub left_padding: f64,
    pub right_padding: f64,
    /// Grab distance in pixels for markers and the playhead.
    pub hit_radius: f64,
    /// Preferred on-screen distance between ticks.
    pub tick_target_px: f64,
    /// Shortest range (seconds) that may be exported.
    pub min_export_range: f64,
    /// Distance covered by the step back/forward buttons.
    pub step_seconds: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_fps: 12,
            clock_hz: 60,
            default_pps: 120.0,
            min_pps: 40.0,
            max_pps: 1000.0,
            slider_min_pps: 40.0,
            slider_max_pps: 400.0,
            wheel_zoom_factor: 1.15,
            left_padding: 50.0,
            right_padding: 50.0,
            hit_radius: 10.0,
            tick_target_px: 120.0,
            min_export_range: 0.01,
            step_seconds: 1.0,
        }
    }
}

impl Settings {
    /// Load settings from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let extension = path.extension().and_then(|s| s.to_str());
        let settings: Settings = match extension {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML settings in {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON settings in {}", path.display()))?,
            _ => bail!("Unsupported settings file extension: {:?}", extension),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings to a `.yaml`, `.yml` or `.json` file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str());
        let text = match extension {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => bail!("Unsupported settings file extension: {:?}", extension),
        };
        std::fs::write(path, text)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.preview_fps == 0 || self.clock_hz == 0 {
            bail!("preview_fps and clock_hz must be positive");
        }
        if !(self.min_pps > 0.0 && self.min_pps <= self.max_pps) {
            bail!("Zoom bounds must satisfy 0 < min_pps <= max_pps");
        }
        if self.slider_min_pps > self.slider_max_pps {
            bail!("slider_min_pps must not exceed slider_max_pps");
        }
        if self.wheel_zoom_factor <= 1.0 {
            bail!("wheel_zoom_factor must be greater than 1");
        }
        Ok(())
    }
}
