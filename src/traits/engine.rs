// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::EngineError;
use crate::tree::UiTree;

/// The capability surface the harness needs from a rendering engine.
///
/// The engine is created once at startup (each implementation provides its
/// own `init`) and outlives every logic reload. The harness only brackets
/// frames and hands over finished trees; error trees take the same path as
/// normal ones.
pub trait EngineContext {
    /// `false` once the user closed the window or an interrupt arrived.
    fn should_continue(&mut self) -> bool;

    fn begin_frame(&mut self) -> Result<(), EngineError>;

    /// Submits the frame's tree and returns the number of draw commands it produced.
    fn end_frame(&mut self, tree: &UiTree) -> Result<usize, EngineError>;

    fn width(&self) -> f32;

    fn height(&self) -> f32;

    /// Number of frames completed so far.
    fn frame_count(&self) -> u64;
}
