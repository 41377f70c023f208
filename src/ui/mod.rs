// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Trimline application.

pub mod markers;
pub mod preview;
pub mod timeline;
pub mod transport;
