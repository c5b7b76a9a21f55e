// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! All diagnostic and operational log lines of the harness are built from
//! message structs with a `Display` implementation, so the wording lives in
//! one place and call sites only fill in fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::reload` - change detection and logic swaps
//! * `messages::frame` - per-frame rendering outcomes
//! * `messages::engine` - engine lifecycle and snapshots
//! * `messages::wasm` - module loading and fuel exhaustion
//!
//! # Usage
//!
//! ```rust
//! use the_ouroboros::observability::messages::{reload::ReloadSucceeded, StructuredLog};
//!
//! ReloadSucceeded {
//!     path: "ui/app.ui",
//!     backend: "script",
//!     version: 2,
//! }
//! .log();
//! ```

pub mod messages;
