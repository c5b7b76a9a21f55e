// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The UI script backend.
//!
//! A script is a sequence of statements run top to bottom on every frame.
//! Node constructors (`column()`, `text("hi")`, ...) open or add nodes and
//! return a value whose methods style the node while it is still the latest
//! one:
//!
//! ```text
//! init {
//!     let accent = hex("#4f8cff")
//! }
//!
//! let taps = state("taps", 0)
//! column().padding(24).bg(rgb(0.08, 0.08, 0.1))
//!     text("taps: " + str(taps)).font_size(20).color(accent)
//! end()
//! ```
//!
//! The optional `init` block runs once per load. Its variables are copied
//! into every frame, while `state`/`set` values live in the host and survive
//! reloads.

mod ast;
mod interpreter;
mod lexer;
mod loader;
mod parser;
mod value;

pub use loader::{ScriptLoader, ScriptLogic};
