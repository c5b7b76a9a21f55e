// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ReloadError, RenderError};
use std::error::Error;
use std::fmt;

/// Where a captured failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    Reload,
    Render,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorOrigin::Reload => write!(f, "reload"),
            ErrorOrigin::Render => write!(f, "render"),
        }
    }
}

/// A captured failure ready to be shown on the crash screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub origin: ErrorOrigin,
    /// One line, the top-level error message.
    pub summary: String,
    /// The full cause chain, one cause per line.
    pub detail: String,
}

impl ErrorState {
    pub fn reload(error: &ReloadError) -> Self {
        Self::capture(ErrorOrigin::Reload, error)
    }

    pub fn render(error: &RenderError) -> Self {
        Self::capture(ErrorOrigin::Render, error)
    }

    fn capture(origin: ErrorOrigin, error: &dyn Error) -> Self {
        let summary = error.to_string();
        let mut detail = summary.clone();
        let mut source = error.source();
        while let Some(cause) = source {
            detail.push_str("\n  caused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            origin,
            summary,
            detail,
        }
    }

    /// Title shown on the crash screen.
    pub fn title(&self) -> &'static str {
        match self.origin {
            ErrorOrigin::Reload => "Reload Error",
            ErrorOrigin::Render => "Render Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_reload_error_detail_includes_cause_chain() {
        let error = ReloadError::Io {
            path: PathBuf::from("ui/app.ui"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let state = ErrorState::reload(&error);

        assert_eq!(state.origin, ErrorOrigin::Reload);
        assert_eq!(state.title(), "Reload Error");
        assert!(state.summary.contains("ui/app.ui"));
        assert!(state.detail.contains("caused by: gone"));
    }

    #[test]
    fn test_render_error_state() {
        let state = ErrorState::render(&RenderError::Script {
            line: 3,
            message: "unknown variable 'x'".to_string(),
        });

        assert_eq!(state.origin, ErrorOrigin::Render);
        assert_eq!(state.summary, "script error on line 3: unknown variable 'x'");
        assert_eq!(state.detail, state.summary);
    }
}
