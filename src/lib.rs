// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // script / wasm logic loaders
pub mod config;     // YAML config + defaults
pub mod engine;     // headless engine + draw list
pub mod errors;     // error handling
pub mod harness;    // the frame loop
pub mod isolation;  // crash screen
pub mod observability;
pub mod reload;     // change detection + atomic swap
pub mod state;      // host-owned persistent state
pub mod traits;     // unified abstractions
pub mod tree;       // immediate-mode tree + builder protocol
