// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video clips backed by OpenCV (`video-opencv` feature).
//!
//! A clip is a window `[start, end]` onto a source file. Sub-clips reopen
//! the same file with a narrower window, so cutting never re-encodes until
//! the result is written.

use super::error::{MediaError, Result};
use super::media::{ClipSource, Frame};
use opencv::{core, imgproc, prelude::*, videoio};
use std::path::{Path, PathBuf};

pub struct VideoClip {
    path: PathBuf,
    capture: videoio::VideoCapture,
    fps: f64,
    width: i32,
    height: i32,
    /// Window onto the source, in source seconds.
    start: f64,
    end: f64,
}

fn load_err(path: &Path, e: opencv::Error) -> MediaError {
    MediaError::load(format!("{}: {}", path.display(), e))
}

impl VideoClip {
    /// Open the whole file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_window(path, 0.0, None)
    }

    fn open_window(path: &Path, start: f64, end: Option<f64>) -> Result<Self> {
        let capture = videoio::VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
            .map_err(|e| load_err(path, e))?;
        if !capture.is_opened().map_err(|e| load_err(path, e))? {
            return Err(MediaError::load(format!("{} could not be opened", path.display())));
        }

        let prop = |id: i32| capture.get(id).map_err(|e| load_err(path, e));
        let fps = prop(videoio::CAP_PROP_FPS)?;
        let frame_count = prop(videoio::CAP_PROP_FRAME_COUNT)?;
        let width = prop(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = prop(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
        if fps <= 0.0 || frame_count <= 0.0 {
            return Err(MediaError::load(format!(
                "{} does not report a frame rate and length",
                path.display()
            )));
        }

        let source_duration = frame_count / fps;
        let end = end.unwrap_or(source_duration).min(source_duration);
        log::debug!(
            "Opened {} ({}x{} @ {:.2} fps, window {:.3}-{:.3}s)",
            path.display(),
            width,
            height,
            fps,
            start,
            end
        );

        Ok(Self {
            path: path.to_path_buf(),
            capture,
            fps,
            width,
            height,
            start,
            end,
        })
    }

    fn seek_frame(&mut self, source_time: f64) -> opencv::Result<()> {
        let index = (source_time * self.fps).floor().max(0.0);
        self.capture.set(videoio::CAP_PROP_POS_FRAMES, index)?;
        Ok(())
    }

    fn to_rgba(bgr: &core::Mat, t: f64) -> Result<Frame> {
        let mut rgba = core::Mat::default();
        imgproc::cvt_color_def(bgr, &mut rgba, imgproc::COLOR_BGR2RGBA)
            .map_err(|e| MediaError::decode(t, e.to_string()))?;
        let bytes = rgba
            .data_bytes()
            .map_err(|e| MediaError::decode(t, e.to_string()))?;
        Frame::from_raw(rgba.cols() as u32, rgba.rows() as u32, bytes.to_vec())
            .ok_or_else(|| MediaError::decode(t, "frame buffer size mismatch"))
    }
}

impl ClipSource for VideoClip {
    fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    fn frame_at(&mut self, t: f64) -> Result<Frame> {
        let source_time = self.start + t.clamp(0.0, self.duration());
        self.seek_frame(source_time)
            .map_err(|e| MediaError::decode(t, e.to_string()))?;
        let mut bgr = core::Mat::default();
        let got_frame = self
            .capture
            .read(&mut bgr)
            .map_err(|e| MediaError::decode(t, e.to_string()))?;
        if !got_frame || bgr.empty() {
            return Err(MediaError::decode(t, "no frame at this position"));
        }
        Self::to_rgba(&bgr, t)
    }

    fn subclip(&self, start: f64, end: f64) -> Result<Box<dyn ClipSource>> {
        let start = start.clamp(0.0, self.duration());
        let end = end.clamp(0.0, self.duration());
        if end <= start {
            return Err(MediaError::InvalidRange { start, end, min: 0.0 });
        }
        Ok(Box::new(Self::open_window(
            &self.path,
            self.start + start,
            Some(self.start + end),
        )?))
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        let export = |e: opencv::Error| MediaError::export(e.to_string());
        let fourcc = videoio::VideoWriter::fourcc('m', 'p', '4', 'v').map_err(export)?;
        let mut writer = videoio::VideoWriter::new(
            &path.to_string_lossy(),
            fourcc,
            self.fps,
            core::Size::new(self.width, self.height),
            true,
        )
        .map_err(export)?;
        if !writer.is_opened().map_err(export)? {
            return Err(MediaError::export(format!("cannot write {}", path.display())));
        }

        self.seek_frame(self.start).map_err(export)?;
        let frame_total = (self.duration() * self.fps).round() as u64;
        let mut frame = core::Mat::default();
        let mut written = 0u64;
        while written < frame_total {
            if !self.capture.read(&mut frame).map_err(export)? || frame.empty() {
                break;
            }
            writer.write(&frame).map_err(export)?;
            written += 1;
        }
        writer.release().map_err(export)?;

        if written == 0 {
            return Err(MediaError::export("no frames could be read from the source"));
        }
        log::info!("Wrote {} frames to {}", written, path.display());
        Ok(())
    }

    fn output_extension(&self) -> &'static str {
        "mp4"
    }
}
