// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine implementations behind [`EngineContext`](crate::traits::EngineContext).
//!
//! [`HeadlessEngine`] is the one shipped engine: it validates frame
//! bracketing, flattens each finished tree into [`DrawCommand`]s and can dump
//! them as JSON. A windowed renderer would implement the same trait.

pub mod draw;
pub mod headless;
#[cfg(test)]
pub mod stub;

pub use draw::{flatten, DrawCommand};
pub use headless::HeadlessEngine;
