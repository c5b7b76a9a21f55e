// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sandboxed WASM logic modules.
//!
//! A module imports the tree-building host functions from `"ui"` (see
//! [`host`]) and exports `render: () -> ()`. Each frame runs in a fresh
//! instance under a fuel limit, so an endless loop ends the frame with a
//! trap instead of hanging the harness.

mod host;
mod loader;
mod logic;

pub use loader::{WasmLogicLoader, MAX_MODULE_SIZE};
pub use logic::WasmLogic;
