// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! `TrimApp` owns the loaded clip and wires the timeline, the playback
//! clock and the preview together. Clip loading and export run on
//! background threads and report back over channels; everything else
//! happens on the UI thread between frames.

use crate::io::config::Settings;
use crate::io::error::MediaError;
use crate::io::media::{self, ClipSource, Frame};
use crate::models::interaction::{Interaction, TimelineEvent};
use crate::models::playback::{Cadence, ClockTick, PlaybackClock, PreviewTask, SharedPlayhead};
use crate::models::timeline::TimelineModel;
use crate::ui::{markers, preview, timeline, transport};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

/// Result of background clip loading.
struct LoadedClip {
    path: PathBuf,
    clip: Box<dyn ClipSource>,
    first_frame: Option<Frame>,
}

/// A message box waiting to be dismissed.
struct Alert {
    title: String,
    message: String,
}

/// Main application state.
pub struct TrimApp {
    settings: Settings,

    /// Currently loaded clip
    clip: Option<Box<dyn ClipSource>>,

    /// File the clip came from (None after an in-memory cut)
    clip_path: Option<PathBuf>,

    timeline: TimelineModel,
    interaction: Interaction,
    clock: PlaybackClock,

    /// Gate for the playback clock task
    clock_task: Cadence,

    /// Playhead as seen by the preview task
    playhead: SharedPlayhead,
    preview_task: PreviewTask,

    /// Frame fetched but not yet uploaded
    pending_frame: Option<Frame>,
    preview_texture: Option<egui::TextureHandle>,
    preview_size: Option<(u32, u32)>,
    decode_error: Option<String>,

    /// Zoom slider position (0-100)
    zoom_position: f64,

    /// Receiver for background clip loading
    clip_loader: Option<Receiver<Result<LoadedClip, MediaError>>>,

    /// Receiver for the export worker; Some while an export is running
    export_job: Option<Receiver<Result<PathBuf, MediaError>>>,

    loading_message: Option<String>,
    status: String,
    alert: Option<Alert>,
}

impl TrimApp {
    /// Create the application, optionally loading `initial_clip` right away.
    pub fn new(settings: Settings, initial_clip: Option<PathBuf>) -> Self {
        let timeline = TimelineModel::from_settings(&settings);
        let zoom_position =
            timeline.zoom_slider_position(settings.slider_min_pps, settings.slider_max_pps);
        let playhead = SharedPlayhead::new(0.0);

        let mut app = Self {
            interaction: Interaction::new(settings.hit_radius),
            clock: PlaybackClock::new(),
            clock_task: Cadence::from_hz(settings.clock_hz),
            preview_task: PreviewTask::new(settings.preview_fps, playhead.clone()),
            playhead,
            settings,
            clip: None,
            clip_path: None,
            timeline,
            pending_frame: None,
            preview_texture: None,
            preview_size: None,
            decode_error: None,
            zoom_position,
            clip_loader: None,
            export_job: None,
            loading_message: None,
            status: "Ready".to_string(),
            alert: None,
        };

        if let Some(path) = initial_clip {
            app.load_clip_file(path);
        }
        app
    }

    fn is_exporting(&self) -> bool {
        self.export_job.is_some()
    }

    /// Transport and range actions are available.
    fn controls_enabled(&self) -> bool {
        self.clip.is_some() && !self.is_exporting() && self.clip_loader.is_none()
    }

    fn show_alert(&mut self, title: &str, message: impl Into<String>) {
        self.alert = Some(Alert {
            title: title.to_string(),
            message: message.into(),
        });
    }

    /// Load a clip file (asynchronously).
    pub fn load_clip_file(&mut self, path: PathBuf) {
        if self.is_exporting() {
            self.status = "Wait for the export to finish before loading".to_string();
            return;
        }

        let (sender, receiver) = channel();
        self.clip_loader = Some(receiver);
        self.loading_message = Some("Loading clip...".to_string());
        self.status = "Loading...".to_string();

        std::thread::spawn(move || {
            let result = media::open_clip(&path).map(|mut clip| {
                let first_frame = match clip.frame_at(0.0) {
                    Ok(frame) => Some(frame),
                    Err(e) => {
                        log::warn!("No first frame for {}: {}", path.display(), e);
                        None
                    }
                };
                LoadedClip {
                    path,
                    clip,
                    first_frame,
                }
            });
            let _ = sender.send(result);
        });
    }

    fn on_clip_loaded(&mut self, result: Result<LoadedClip, MediaError>) {
        match result {
            Ok(loaded) => {
                let name = file_name(&loaded.path);
                let duration = loaded.clip.duration();
                self.install_clip(loaded.clip, Some(loaded.path.clone()));
                match loaded.first_frame {
                    Some(frame) => {
                        self.pending_frame = Some(preview::fit_frame(
                            frame,
                            preview::MAX_TEXTURE_EDGE,
                            preview::MAX_TEXTURE_EDGE,
                        ))
                    }
                    None => {
                        self.decode_error = Some("this format cannot be previewed".to_string())
                    }
                }
                self.status = format!("Loaded: {} ({:.2}s)", name, duration);
                log::info!("Loaded {} ({:.2}s)", loaded.path.display(), duration);
            }
            Err(e) => {
                log::error!("Failed to load clip: {}", e);
                self.status = "Ready".to_string();
                self.show_alert("Load error", e.to_string());
            }
        }
    }

    /// Make `clip` the current clip and reset the timeline around it.
    fn install_clip(&mut self, clip: Box<dyn ClipSource>, path: Option<PathBuf>) {
        self.timeline.set_clip_duration(clip.duration());
        self.clip = Some(clip);
        self.clip_path = path;
        self.clock = PlaybackClock::new();
        self.interaction.release();
        self.playhead.store(0.0);
        self.preview_task.invalidate();
        self.pending_frame = None;
        self.decode_error = None;
    }

    /// Play from the playhead, or pause if already playing.
    ///
    /// Playing from at or past the stop point restarts at the start marker.
    pub fn toggle_play(&mut self, now: Instant) {
        if self.clip.is_none() {
            return;
        }
        if self.clock.is_playing() {
            self.clock.pause(&mut self.timeline, now);
            self.status = "Paused".to_string();
            return;
        }

        let from = if self.timeline.playhead() >= self.timeline.stop_bound() {
            self.timeline.start()
        } else {
            self.timeline.playhead()
        };
        let from = self.timeline.set_playhead(from);
        self.clock.play(from, now);
        self.status = "Playing".to_string();
    }

    pub fn stop(&mut self) {
        if self.clip.is_none() {
            return;
        }
        self.clock.stop(&mut self.timeline);
        self.status = "Ready".to_string();
    }

    pub fn step_by(&mut self, seconds: f64, now: Instant) {
        if self.clip.is_none() {
            return;
        }
        self.seek_to(self.timeline.playhead() + seconds, now);
    }

    /// Move the playhead, keeping playback running from the new point.
    pub fn seek_to(&mut self, t: f64, now: Instant) {
        let t = self.timeline.set_playhead(t);
        self.clock.seek(t, now);
        log::debug!("Seek to {:.3}s", t);
    }

    fn handle_timeline_event(&mut self, event: TimelineEvent, now: Instant) {
        match event {
            TimelineEvent::SeekRequested(t) => {
                self.clock.seek(t, now);
                log::debug!("Seek to {:.3}s", t);
            }
            TimelineEvent::RangeChanged { start, end } => {
                log::debug!("Range changed to {:.3}s - {:.3}s", start, end);
                if let Some(t) = self.timeline.clamp_playhead_to_range() {
                    self.clock.seek(t, now);
                }
            }
        }
    }

    fn set_zoom_position(&mut self, position: f64) {
        self.zoom_position = position;
        self.timeline.zoom_from_slider(
            position,
            self.settings.slider_min_pps,
            self.settings.slider_max_pps,
        );
    }

    fn zoom_by_steps(&mut self, steps: i32) {
        self.timeline.zoom_wheel(steps, self.settings.wheel_zoom_factor);
        self.sync_zoom_slider();
    }

    fn sync_zoom_slider(&mut self) {
        self.zoom_position = self
            .timeline
            .zoom_slider_position(self.settings.slider_min_pps, self.settings.slider_max_pps);
    }

    /// Run the clock task and the preview task if they are due.
    fn run_tasks(&mut self, now: Instant) {
        if self.clip.is_none() {
            return;
        }

        if self.clock_task.due(now) {
            if let ClockTick::ReachedEnd(_) = self.clock.tick(&mut self.timeline, now) {
                self.status = "Ready".to_string();
            }
        }
        self.playhead.store(self.timeline.playhead());

        let Some(t) = self.preview_task.poll(now) else {
            return;
        };
        let Some(clip) = self.clip.as_mut() else {
            return;
        };
        match clip.frame_at(t) {
            Ok(frame) => {
                self.pending_frame = Some(preview::fit_frame(
                    frame,
                    preview::MAX_TEXTURE_EDGE,
                    preview::MAX_TEXTURE_EDGE,
                ));
                self.decode_error = None;
            }
            Err(e) => {
                log::warn!("{}", e);
                self.pending_frame = None;
                self.decode_error = Some(e.to_string());
            }
        }
    }

    fn upload_preview(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.pending_frame.take() else {
            return;
        };
        let image = preview::to_color_image(&frame);
        self.preview_size = Some(frame.dimensions());
        match self.preview_texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture =
                    Some(ctx.load_texture("preview", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Ask for a destination and export the selected range.
    fn export_trimmed(&mut self) {
        let Some(extension) = self.clip.as_ref().map(|clip| clip.output_extension()) else {
            self.show_alert("No clip", "Load a clip before exporting.");
            return;
        };
        let (start, end) = (self.timeline.start(), self.timeline.end());
        if let Err(e) = media::validate_export_range(start, end, self.settings.min_export_range) {
            log::warn!("{}", e);
            self.show_alert(
                "Invalid range",
                "Select a valid start and end range before exporting.",
            );
            return;
        }

        let stem = self
            .clip_path
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("clip");
        let Some(path) = rfd::FileDialog::new()
            .add_filter(extension.to_uppercase(), &[extension])
            .set_file_name(format!("{}_trimmed.{}", stem, extension))
            .save_file()
        else {
            return;
        };
        let path = if path.extension().is_none() {
            path.with_extension(extension)
        } else {
            path
        };

        if let Err(e) = self.start_export(path, Instant::now()) {
            log::error!("Failed to start export: {}", e);
            self.show_alert("Export error", e.to_string());
        }
    }

    /// Cut the selected range and write it to `path` on a worker thread.
    fn start_export(&mut self, path: PathBuf, now: Instant) -> Result<(), MediaError> {
        if self.is_exporting() {
            return Err(MediaError::export("an export is already running"));
        }
        let clip = self
            .clip
            .as_ref()
            .ok_or_else(|| MediaError::export("no clip loaded"))?;
        let (start, end) = (self.timeline.start(), self.timeline.end());
        let mut trimmed =
            media::prepare_export(clip.as_ref(), start, end, self.settings.min_export_range)?;

        if self.clock.is_playing() {
            self.clock.pause(&mut self.timeline, now);
        }

        log::info!(
            "Exporting {:.3}s - {:.3}s to {}",
            start,
            end,
            path.display()
        );
        let (sender, receiver) = channel();
        std::thread::spawn(move || {
            let result = trimmed.write_to(&path).map(|_| path);
            let _ = sender.send(result);
        });
        self.export_job = Some(receiver);
        self.status = "Exporting... (this may take a while)".to_string();
        Ok(())
    }

    fn on_export_finished(&mut self, result: Result<PathBuf, MediaError>) {
        match result {
            Ok(path) => {
                log::info!("Exported to {}", path.display());
                self.status = format!("Exported to {}", path.display());
                self.show_alert(
                    "Export done",
                    format!("Trimmed clip exported to:\n{}", path.display()),
                );
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.status = "Ready".to_string();
                self.show_alert("Export error", e.to_string());
            }
        }
    }

    /// Replace the loaded clip with the selected range.
    fn cut_to_selection(&mut self) {
        let Some(clip) = self.clip.as_ref() else {
            return;
        };
        let (start, end) = (self.timeline.start(), self.timeline.end());
        if media::validate_export_range(start, end, 0.0).is_err() {
            self.show_alert("Invalid range", "End must be after start.");
            return;
        }
        match clip.subclip(start, end) {
            Ok(cut) => {
                log::info!("Cut clip to {:.3}s - {:.3}s", start, end);
                self.install_clip(cut, None);
                self.status = "Cut applied to current clip (in memory)".to_string();
            }
            Err(e) => {
                log::error!("Cut failed: {}", e);
                self.show_alert("Cut error", e.to_string());
            }
        }
    }

    fn open_file_dialog(&mut self) {
        let extensions = media::accepted_extensions();
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Clips", &extensions[..])
            .pick_file()
        {
            self.load_clip_file(path);
        }
    }

    /// Check background workers for results.
    fn poll_workers(&mut self) {
        if let Some(ref receiver) = self.clip_loader {
            if let Ok(result) = receiver.try_recv() {
                self.clip_loader = None;
                self.loading_message = None;
                self.on_clip_loaded(result);
            }
        }
        if let Some(ref receiver) = self.export_job {
            if let Ok(result) = receiver.try_recv() {
                self.export_job = None;
                self.on_export_finished(result);
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> =
            ctx.input(|i| i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect());
        let Some(path) = dropped.into_iter().next() else {
            return;
        };
        if media::is_supported(&path) {
            self.load_clip_file(path);
        } else {
            log::warn!("Ignoring dropped file {}", path.display());
            self.status = format!("Unsupported file: {}", file_name(&path));
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context, now: Instant) {
        if ctx.wants_keyboard_input() || !self.controls_enabled() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.toggle_play(now);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.step_by(-self.settings.step_seconds, now);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.step_by(self.settings.step_seconds, now);
        }
    }

    /// Schedule the next frame for whichever task is due first.
    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.clip_loader.is_some() || self.is_exporting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        if self.clock.is_playing() {
            let next = self
                .clock_task
                .time_until_due(now)
                .min(self.preview_task.time_until_due(now));
            ctx.request_repaint_after(next);
        } else if self.clip.is_some() && self.preview_task.is_stale() {
            ctx.request_repaint_after(self.preview_task.time_until_due(now));
        }
    }

    fn show_alert_window(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.alert.as_ref() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(alert.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(alert.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for TrimApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.poll_workers();
        self.handle_dropped_files(ctx);
        self.handle_keys(ctx, now);
        self.run_tasks(now);
        self.upload_preview(ctx);

        let enabled = self.controls_enabled();
        let can_open = !self.is_exporting();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(can_open, egui::Button::new("Open Clip...")).clicked() {
                        self.open_file_dialog();
                        ui.close_menu();
                    }
                    if ui.add_enabled(enabled, egui::Button::new("Export Trimmed...")).clicked() {
                        self.export_trimmed();
                        ui.close_menu();
                    }
                    if ui.add_enabled(enabled, egui::Button::new("Cut to Selection")).clicked() {
                        self.cut_to_selection();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.zoom_by_steps(1);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.zoom_by_steps(-1);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.timeline.set_zoom(self.settings.default_pps);
                        self.sync_zoom_slider();
                        ui.close_menu();
                    }
                });
            });
        });

        // Transport
        let transport_action = egui::TopBottomPanel::top("transport")
            .show(ctx, |ui| {
                transport::show(
                    ui,
                    enabled,
                    self.clock.state(),
                    self.timeline.playhead(),
                    self.timeline.duration(),
                    self.settings.step_seconds,
                )
            })
            .inner;

        match transport_action {
            transport::TransportAction::TogglePlay => self.toggle_play(now),
            transport::TransportAction::Stop => self.stop(),
            transport::TransportAction::Step(seconds) => self.step_by(seconds, now),
            transport::TransportAction::Seek(t) => self.seek_to(t, now),
            transport::TransportAction::None => {}
        }

        // Status line
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(ref path) = self.clip_path {
                    ui.separator();
                    ui.label(egui::RichText::new(file_name(path)).weak());
                }
            });
        });

        // Timeline
        let timeline_response = egui::TopBottomPanel::bottom("timeline")
            .resizable(false)
            .show(ctx, |ui| {
                timeline::show(
                    ui,
                    &mut self.timeline,
                    &mut self.interaction,
                    &self.settings,
                    enabled,
                )
            })
            .inner;

        for event in timeline_response.events {
            self.handle_timeline_event(event, now);
        }
        if timeline_response.zoom_changed {
            self.sync_zoom_slider();
        }

        // Range panel (right side)
        let mut zoom_position = self.zoom_position;
        let markers_action = egui::SidePanel::right("range")
            .default_width(220.0)
            .show(ctx, |ui| {
                markers::show(
                    ui,
                    self.timeline.start(),
                    self.timeline.end(),
                    &mut zoom_position,
                    enabled,
                )
            })
            .inner;

        match markers_action {
            markers::MarkersAction::Zoom(position) => self.set_zoom_position(position),
            markers::MarkersAction::Export => self.export_trimmed(),
            markers::MarkersAction::CutToSelection => self.cut_to_selection(),
            markers::MarkersAction::None => {}
        }

        // Preview (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            preview::show(
                ui,
                &self.preview_texture,
                self.preview_size,
                self.decode_error.as_deref(),
                self.loading_message.as_deref(),
            );
        });

        self.show_alert_window(ctx);

        self.playhead.store(self.timeline.playhead());
        self.schedule_repaint(ctx, now);
    }
}
