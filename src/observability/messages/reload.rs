// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for change detection and logic swaps.

use super::StructuredLog;
use std::fmt::{Display, Formatter};

/// The logic file's timestamp changed and a reload is starting.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ReloadDetected<'a> {
    pub path: &'a str,
    pub attempt: u64,
}

impl Display for ReloadDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Source changed, reloading '{}' (attempt {})", self.path, self.attempt)
    }
}

impl StructuredLog for ReloadDetected<'_> {
    fn log(&self) {
        tracing::info!(path = self.path, attempt = self.attempt, "{}", self);
    }
}

/// The new logic unit loaded and is now active.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ReloadSucceeded<'a> {
    pub path: &'a str,
    pub backend: &'a str,
    pub version: u64,
}

impl Display for ReloadSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reloaded '{}' with {} backend (version {})",
            self.path, self.backend, self.version
        )
    }
}

impl StructuredLog for ReloadSucceeded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            backend = self.backend,
            version = self.version,
            "{}", self
        );
    }
}

/// The new logic unit failed to load; the previous one stays active.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ReloadFailed<'a> {
    pub path: &'a str,
    pub error: &'a dyn std::error::Error,
    pub keeps_previous: bool,
}

impl Display for ReloadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Reload of '{}' failed: {}", self.path, self.error)?;
        if self.keeps_previous {
            write!(f, " (previous logic stays active)")?;
        }
        Ok(())
    }
}

impl StructuredLog for ReloadFailed<'_> {
    fn log(&self) {
        tracing::error!(
            path = self.path,
            keeps_previous = self.keeps_previous,
            "{}", self
        );
    }
}

/// The logic file's timestamp could not be read this frame.
///
/// # Log Level
/// `trace!` - Expected while an editor is mid-save
pub struct ModifiedTimeUnavailable<'a> {
    pub path: &'a str,
    pub error: &'a std::io::Error,
}

impl Display for ModifiedTimeUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Could not read modification time of '{}': {}",
            self.path, self.error
        )
    }
}

impl StructuredLog for ModifiedTimeUnavailable<'_> {
    fn log(&self) {
        tracing::trace!(path = self.path, "{}", self);
    }
}


/// The reload supervisor moved between watching, reloading and degraded.
///
/// # Log Level
/// `debug!` - State machine detail
pub struct SupervisorStateChanged<'a> {
    pub path: &'a str,
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for SupervisorStateChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Supervisor for '{}': {} -> {}", self.path, self.from, self.to)
    }
}

impl StructuredLog for SupervisorStateChanged<'_> {
    fn log(&self) {
        tracing::debug!(path = self.path, from = self.from, to = self.to, "{}", self);
    }
}
