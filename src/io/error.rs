// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for clip loading, decoding and export.

use thiserror::Error;

/// Result type for media operations.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors raised by clip backends.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The file could not be opened or is not a readable clip.
    #[error("Could not load clip: {0}")]
    Load(String),

    /// A single frame failed to decode.
    #[error("Could not decode frame at {time:.3}s: {message}")]
    Decode {
        /// Requested timestamp in seconds.
        time: f64,
        /// Backend description of the failure.
        message: String,
    },

    /// Writing the output file failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The requested export range is too short.
    #[error("Invalid range {start:.3}s - {end:.3}s (must be longer than {min}s)")]
    InvalidRange {
        start: f64,
        end: f64,
        min: f64,
    },

    /// No backend handles this file type.
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    /// Create a decode error for the frame at `time`.
    pub fn decode(time: f64, message: impl Into<String>) -> Self {
        Self::Decode {
            time,
            message: message.into(),
        }
    }

    /// Create an export error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export(message.into())
    }
}
