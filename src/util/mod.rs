// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pure helpers: coordinate mapping, tick layout, time formatting.

pub mod geometry;
pub mod ticks;
pub mod time;
