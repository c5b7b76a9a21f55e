// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test engine that records every frame it is given.

use crate::errors::EngineError;
use crate::traits::EngineContext;
use crate::tree::UiTree;

pub struct RecordingEngine {
    pub begins: u64,
    pub ends: u64,
    pub trees: Vec<UiTree>,
    width: f32,
    height: f32,
    stop_after: Option<u64>,
    fail_begin_at: Option<u64>,
    in_frame: bool,
}

impl RecordingEngine {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            begins: 0,
            ends: 0,
            trees: Vec::new(),
            width,
            height,
            stop_after: None,
            fail_begin_at: None,
            in_frame: false,
        }
    }

    /// `should_continue` turns false once this many frames have ended.
    pub fn stop_after(mut self, frames: u64) -> Self {
        self.stop_after = Some(frames);
        self
    }

    /// `begin_frame` fails when this many frames have already ended.
    pub fn fail_begin_at(mut self, frame: u64) -> Self {
        self.fail_begin_at = Some(frame);
        self
    }

    pub fn last_tree(&self) -> &UiTree {
        self.trees.last().expect("no frame has ended yet")
    }
}

impl EngineContext for RecordingEngine {
    fn should_continue(&mut self) -> bool {
        self.stop_after.map_or(true, |max| self.ends < max)
    }

    fn begin_frame(&mut self) -> Result<(), EngineError> {
        if self.fail_begin_at == Some(self.ends) {
            return Err(EngineError::Init("injected device loss".to_string()));
        }
        if self.in_frame {
            return Err(EngineError::FrameState("begin twice".to_string()));
        }
        self.in_frame = true;
        self.begins += 1;
        Ok(())
    }

    fn end_frame(&mut self, tree: &UiTree) -> Result<usize, EngineError> {
        if !self.in_frame {
            return Err(EngineError::FrameState("end without begin".to_string()));
        }
        self.in_frame = false;
        self.ends += 1;
        self.trees.push(tree.clone());
        Ok(tree.len())
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn frame_count(&self) -> u64 {
        self.ends
    }
}
