// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading, frame extraction and trimmed export.
//!
//! A loaded file is a [`ClipSource`]. Decoding and encoding belong to the
//! backend; the rest of the application only asks for a duration, frames
//! at a timestamp, and a sub-range written to a new file.

use super::error::{MediaError, Result};
use std::path::Path;

/// Decoded RGBA frame.
pub type Frame = image::RgbaImage;

/// Extensions handled by the built-in GIF backend.
pub const GIF_EXTENSIONS: &[&str] = &["gif"];

/// Extensions handled by the OpenCV backend (feature `video-opencv`).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

/// A loaded clip. Dropping it releases the underlying file.
pub trait ClipSource: Send {
    /// Length in seconds.
    fn duration(&self) -> f64;

    /// Decode the frame shown at `t` seconds.
    fn frame_at(&mut self, t: f64) -> Result<Frame>;

    /// A new clip covering `[start, end]` of this one.
    fn subclip(&self, start: f64, end: f64) -> Result<Box<dyn ClipSource>>;

    /// Encode the whole clip to `path`.
    fn write_to(&mut self, path: &Path) -> Result<()>;

    /// Extension used when suggesting an export file name.
    fn output_extension(&self) -> &'static str;
}

/// All extensions this build can open.
pub fn accepted_extensions() -> Vec<&'static str> {
    let mut extensions = GIF_EXTENSIONS.to_vec();
    if cfg!(feature = "video-opencv") {
        extensions.extend_from_slice(VIDEO_EXTENSIONS);
    }
    extensions
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Whether this build has a backend for `path`.
pub fn is_supported(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| accepted_extensions().contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Open a clip, choosing the backend by file extension.
pub fn open_clip(path: &Path) -> Result<Box<dyn ClipSource>> {
    let extension = extension_of(path).unwrap_or_default();
    if GIF_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(Box::new(super::gif::GifClip::open(path)?));
    }
    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return open_video(path, &extension);
    }
    Err(MediaError::Unsupported(extension))
}

#[cfg(feature = "video-opencv")]
fn open_video(path: &Path, _extension: &str) -> Result<Box<dyn ClipSource>> {
    Ok(Box::new(super::video::VideoClip::open(path)?))
}

#[cfg(not(feature = "video-opencv"))]
fn open_video(_path: &Path, extension: &str) -> Result<Box<dyn ClipSource>> {
    Err(MediaError::Unsupported(format!(
        "{} (built without the video-opencv feature)",
        extension
    )))
}

/// Reject ranges no longer than `min_length` seconds.
pub fn validate_export_range(start: f64, end: f64, min_length: f64) -> Result<()> {
    if !(end - start > min_length) {
        return Err(MediaError::InvalidRange {
            start,
            end,
            min: min_length,
        });
    }
    Ok(())
}

/// Cut `[start, end]` out of `clip`, ready to be written.
///
/// The range is validated before the backend is touched.
pub fn prepare_export(
    clip: &dyn ClipSource,
    start: f64,
    end: f64,
    min_length: f64,
) -> Result<Box<dyn ClipSource>> {
    validate_export_range(start, end, min_length)?;
    clip.subclip(start, end)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory clip that counts backend calls.
    pub(crate) struct FakeClip {
        pub duration: f64,
        pub subclips: Arc<AtomicUsize>,
        pub writes: Arc<AtomicUsize>,
        pub fail_decode: bool,
    }

    impl FakeClip {
        pub fn new(duration: f64) -> Self {
            Self {
                duration,
                subclips: Arc::new(AtomicUsize::new(0)),
                writes: Arc::new(AtomicUsize::new(0)),
                fail_decode: false,
            }
        }
    }

    impl ClipSource for FakeClip {
        fn duration(&self) -> f64 {
            self.duration
        }

        fn frame_at(&mut self, t: f64) -> Result<Frame> {
            if self.fail_decode {
                return Err(MediaError::decode(t, "fake failure"));
            }
            Ok(Frame::new(2, 2))
        }

        fn subclip(&self, start: f64, end: f64) -> Result<Box<dyn ClipSource>> {
            self.subclips.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeClip {
                duration: end - start,
                subclips: self.subclips.clone(),
                writes: self.writes.clone(),
                fail_decode: self.fail_decode,
            }))
        }

        fn write_to(&mut self, _path: &Path) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn output_extension(&self) -> &'static str {
            "gif"
        }
    }

    #[test]
    fn test_too_short_range_is_rejected_before_export() {
        let clip = FakeClip::new(10.0);
        let result = prepare_export(&clip, 1.0, 1.005, 0.01);
        assert!(matches!(result, Err(MediaError::InvalidRange { .. })));
        assert_eq!(clip.subclips.load(Ordering::SeqCst), 0);
        assert_eq!(clip.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(validate_export_range(2.0, 2.01, 0.01).is_err());
        assert!(validate_export_range(2.0, 2.02, 0.01).is_ok());
        assert!(validate_export_range(3.0, 1.0, 0.01).is_err());
        assert!(validate_export_range(0.0, f64::NAN, 0.01).is_err());
    }

    #[test]
    fn test_valid_range_produces_subclip() {
        let clip = FakeClip::new(10.0);
        let sub = prepare_export(&clip, 2.0, 6.5, 0.01).unwrap();
        assert!((sub.duration() - 4.5).abs() < 1e-9);
        assert_eq!(clip.subclips.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_extension_dispatch() {
        assert!(is_supported(Path::new("clip.GIF")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
        assert_eq!(is_supported(Path::new("movie.mp4")), cfg!(feature = "video-opencv"));

        let err = open_clip(Path::new("song.wav")).err().unwrap();
        assert!(matches!(err, MediaError::Unsupported(ext) if ext == "wav"));
    }

    #[cfg(not(feature = "video-opencv"))]
    #[test]
    fn test_video_without_backend_is_unsupported() {
        let err = open_clip(Path::new("movie.mkv")).err().unwrap();
        assert!(matches!(err, MediaError::Unsupported(_)));
    }
}
