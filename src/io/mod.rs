// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media and settings files.

pub mod config;
pub mod error;
pub mod gif;
pub mod media;
#[cfg(feature = "video-opencv")]
pub mod video;
