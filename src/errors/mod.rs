// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error taxonomy for the reload harness.
//!
//! Only [`EngineError`] is fatal. Everything else is caught at the boundary
//! closest to where it happened and turned into an [`ErrorState`] that the
//! crash screen can display.

mod config;
mod engine;
mod error_state;
mod reload;
mod render;

pub use config::ConfigError;
pub use engine::EngineError;
pub use error_state::{ErrorOrigin, ErrorState};
pub use reload::ReloadError;
pub use render::{RenderError, ScopeViolation, StateError};
