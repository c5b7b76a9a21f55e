// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-frame rendering outcomes.

use super::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Active logic failed while building the frame; the crash screen is shown.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RenderFailed<'a> {
    pub frame: u64,
    pub backend: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RenderFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frame {}: {} logic failed: {}",
            self.frame, self.backend, self.error
        )
    }
}

impl StructuredLog for RenderFailed<'_> {
    fn log(&self) {
        tracing::error!(frame = self.frame, backend = self.backend, "{}", self);
    }
}

/// Logic renders normally again after a failed frame.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RenderRecovered {
    pub frame: u64,
}

impl Display for RenderRecovered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Frame {}: logic renders again", self.frame)
    }
}

impl StructuredLog for RenderRecovered {
    fn log(&self) {
        tracing::info!(frame = self.frame, "{}", self);
    }
}

/// Periodic frame summary.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FrameSummary {
    pub frame: u64,
    pub draw_count: usize,
    pub reloads: u64,
    pub failures: u64,
}

impl Display for FrameSummary {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frame {}: {} draw commands ({} reloads, {} failed frames so far)",
            self.frame, self.draw_count, self.reloads, self.failures
        )
    }
}

impl StructuredLog for FrameSummary {
    fn log(&self) {
        tracing::info!(
            frame = self.frame,
            draw_count = self.draw_count,
            reloads = self.reloads,
            failures = self.failures,
            "{}", self
        );
    }
}

/// One iteration of the frame loop.
///
/// # Log Level
/// `trace!` - Per-frame detail
pub struct FrameStarted {
    pub frame: u64,
}

impl Display for FrameStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Frame {} started", self.frame)
    }
}

impl StructuredLog for FrameStarted {
    fn log(&self) {
        tracing::trace!(frame = self.frame, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("frame", span_name = name, frame = self.frame)
    }
}

/// Output of a script's `log(...)` call.
///
/// # Log Level
/// `info!` - Requested by the logic author
pub struct ScriptLog<'a> {
    pub line: usize,
    pub message: &'a str,
}

impl Display for ScriptLog<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "[script:{}] {}", self.line, self.message)
    }
}

impl StructuredLog for ScriptLog<'_> {
    fn log(&self) {
        tracing::info!(target: "ui_script", line = self.line, "{}", self);
    }
}
