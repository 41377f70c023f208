// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline state, pointer interaction and playback timing.
//!
//! Nothing here depends on the GUI toolkit.

pub mod interaction;
pub mod playback;
pub mod timeline;
