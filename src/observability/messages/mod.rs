// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit itself at the right level with its fields
//! attached.

use tracing::Span;

pub mod engine;
pub mod frame;
pub mod reload;
pub mod wasm;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emits the message as a `tracing` event.
    fn log(&self);

    /// A span carrying the message's fields, for work done on its behalf.
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("ouroboros", span_name = name)
    }
}
