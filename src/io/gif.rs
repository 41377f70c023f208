// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Animated GIF clips.
//!
//! The whole animation is decoded up front with the `image` crate; frames
//! are composited to full-canvas RGBA buffers by the decoder.

use super::error::{MediaError, Result};
use super::media::{ClipSource, Frame};
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Delay given to frames that declare none (the common browser convention).
const DEFAULT_FRAME_MS: f64 = 100.0;

/// A decoded animated GIF.
pub struct GifClip {
    frames: Vec<image::Frame>,
    /// Start time of each frame in seconds.
    starts: Vec<f64>,
    duration: f64,
}

fn frame_seconds(frame: &image::Frame) -> f64 {
    let (numer, denom) = frame.delay().numer_denom_ms();
    let ms = if denom == 0 { 0.0 } else { numer as f64 / denom as f64 };
    if ms <= 0.0 {
        DEFAULT_FRAME_MS / 1000.0
    } else {
        ms / 1000.0
    }
}

impl GifClip {
    /// Decode every frame of the file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| MediaError::load(format!("{}: {}", path.display(), e)))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .map_err(|e| MediaError::load(format!("{}: {}", path.display(), e)))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| MediaError::load(format!("{}: {}", path.display(), e)))?;
        if frames.is_empty() {
            return Err(MediaError::load(format!("{} has no frames", path.display())));
        }
        log::debug!("Decoded {} GIF frames from {}", frames.len(), path.display());
        Ok(Self::from_frames(frames))
    }

    fn from_frames(frames: Vec<image::Frame>) -> Self {
        let mut starts = Vec::with_capacity(frames.len());
        let mut elapsed = 0.0;
        for frame in &frames {
            starts.push(elapsed);
            elapsed += frame_seconds(frame);
        }
        Self {
            frames,
            starts,
            duration: elapsed,
        }
    }

    /// Index of the frame on screen at `t`.
    fn index_at(&self, t: f64) -> usize {
        let t = t.clamp(0.0, self.duration);
        self.starts.partition_point(|&s| s <= t).saturating_sub(1)
    }
}

impl ClipSource for GifClip {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn frame_at(&mut self, t: f64) -> Result<Frame> {
        if !t.is_finite() {
            return Err(MediaError::decode(t, "timestamp is not finite"));
        }
        self.frames
            .get(self.index_at(t))
            .map(|frame| frame.buffer().clone())
            .ok_or_else(|| MediaError::decode(t, "clip has no frames"))
    }

    fn subclip(&self, start: f64, end: f64) -> Result<Box<dyn ClipSource>> {
        let start = start.clamp(0.0, self.duration);
        let end = end.clamp(0.0, self.duration);
        if end <= start {
            return Err(MediaError::InvalidRange { start, end, min: 0.0 });
        }

        // Keep every frame overlapping the range, shortened to the overlap.
        let mut frames = Vec::new();
        for (frame, &frame_start) in self.frames.iter().zip(&self.starts) {
            let frame_end = frame_start + frame_seconds(frame);
            let overlap = frame_end.min(end) - frame_start.max(start);
            if overlap <= 0.0 {
                continue;
            }
            let delay = Delay::from_numer_denom_ms((overlap * 1000.0).round().max(1.0) as u32, 1);
            frames.push(image::Frame::from_parts(frame.buffer().clone(), 0, 0, delay));
        }
        Ok(Box::new(Self::from_frames(frames)))
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| MediaError::export(e.to_string()))?;
        encoder
            .encode_frames(self.frames.iter().cloned())
            .map_err(|e| MediaError::export(e.to_string()))?;
        log::info!("Wrote {} frames to {}", self.frames.len(), path.display());
        Ok(())
    }

    fn output_extension(&self) -> &'static str {
        "gif"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Write a GIF with one solid frame per color, each `frame_ms` long.
    fn write_test_gif(path: &Path, colors: &[[u8; 3]], frame_ms: u32) {
        let frames: Vec<image::Frame> = colors
            .iter()
            .map(|&[r, g, b]| {
                image::Frame::from_parts(
                    RgbaImage::from_pixel(8, 8, Rgba([r, g, b, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(frame_ms, 1),
                )
            })
            .collect();
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder.encode_frames(frames).unwrap();
    }

    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    #[test]
    fn test_open_reports_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.gif");
        write_test_gif(&path, &[RED, GREEN, BLUE], 500);

        let clip = GifClip::open(&path).unwrap();
        assert!((clip.duration() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_frame_at_picks_frame_on_screen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.gif");
        write_test_gif(&path, &[RED, GREEN, BLUE], 500);

        let mut clip = GifClip::open(&path).unwrap();
        assert!(clip.frame_at(0.0).unwrap().get_pixel(0, 0)[0] > 200);
        assert!(clip.frame_at(0.75).unwrap().get_pixel(0, 0)[1] > 200);
        assert!(clip.frame_at(1.4).unwrap().get_pixel(0, 0)[2] > 200);
        // Past the end clamps to the last frame.
        assert!(clip.frame_at(99.0).unwrap().get_pixel(0, 0)[2] > 200);
        assert!(clip.frame_at(f64::NAN).is_err());
    }

    #[test]
    fn test_subclip_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.gif");
        write_test_gif(&path, &[RED, GREEN, BLUE], 500);

        let clip = GifClip::open(&path).unwrap();
        let mut sub = clip.subclip(0.25, 1.0).unwrap();
        assert!((sub.duration() - 0.75).abs() < 1e-9);
        assert!(sub.frame_at(0.0).unwrap().get_pixel(0, 0)[0] > 200);
        assert!(sub.frame_at(0.5).unwrap().get_pixel(0, 0)[1] > 200);

        let out = dir.path().join("trimmed.gif");
        sub.write_to(&out).unwrap();
        let reloaded = GifClip::open(&out).unwrap();
        assert_eq!(reloaded.frames.len(), 2);
        assert!((reloaded.duration() - 0.75).abs() < 0.02);
    }

    #[test]
    fn test_subclip_rejects_empty_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.gif");
        write_test_gif(&path, &[RED, GREEN], 500);

        let clip = GifClip::open(&path).unwrap();
        assert!(clip.subclip(0.8, 0.8).is_err());
    }

    #[test]
    fn test_open_missing_file_is_load_error() {
        let err = GifClip::open(Path::new("/nonexistent/clip.gif")).err().unwrap();
        assert!(matches!(err, MediaError::Load(_)));
    }
}
