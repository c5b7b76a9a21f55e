// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine lifecycle events.

use super::StructuredLog;
use std::fmt::{Display, Formatter};

/// Engine surface created.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineStarted<'a> {
    pub title: &'a str,
    pub width: u32,
    pub height: u32,
}

impl Display for EngineStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine started: '{}' ({}x{})",
            self.title, self.width, self.height
        )
    }
}

impl StructuredLog for EngineStarted<'_> {
    fn log(&self) {
        tracing::info!(
            title = self.title,
            width = self.width,
            height = self.height,
            "{}", self
        );
    }
}

/// The frame loop ended normally.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineStopped<'a> {
    pub frames: u64,
    pub reason: &'a str,
}

impl Display for EngineStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine stopped after {} frames: {}", self.frames, self.reason)
    }
}

impl StructuredLog for EngineStopped<'_> {
    fn log(&self) {
        tracing::info!(frames = self.frames, reason = self.reason, "{}", self);
    }
}

/// The latest draw list was written to disk.
///
/// # Log Level
/// `debug!` - Per-frame detail
pub struct SnapshotWritten<'a> {
    pub path: &'a str,
    pub frame: u64,
    pub commands: usize,
}

impl Display for SnapshotWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Wrote frame {} snapshot ({} commands) to '{}'",
            self.frame, self.commands, self.path
        )
    }
}

impl StructuredLog for SnapshotWritten<'_> {
    fn log(&self) {
        tracing::debug!(path = self.path, frame = self.frame, commands = self.commands, "{}", self);
    }
}

/// The draw list could not be written; the frame itself still ends normally.
///
/// # Log Level
/// `warn!` - Debug output lost, rendering unaffected
pub struct SnapshotFailed<'a> {
    pub path: &'a str,
    pub frame: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for SnapshotFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Could not write frame {} snapshot to '{}': {}",
            self.frame, self.path, self.error
        )
    }
}

impl StructuredLog for SnapshotFailed<'_> {
    fn log(&self) {
        tracing::warn!(path = self.path, frame = self.frame, "{}", self);
    }
}
