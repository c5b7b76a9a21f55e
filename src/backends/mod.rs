// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Logic backend implementations for The Ouroboros live-reload harness.
//!
//! A backend turns a file on disk into a [`RenderLogic`](crate::traits::RenderLogic)
//! unit through a [`LogicLoader`](crate::traits::LogicLoader). The reload
//! supervisor only sees those two traits, so a backend can be swapped without
//! touching the frame loop.
//!
//! # Available Backends
//!
//! ## Script Backend
//! Interpreted `.ui` scripts:
//! - **Loading**: Parse plus one run of the `init` block
//! - **Limits**: Step budget per frame
//! - **Use Case**: The default, edited by hand while the harness runs
//!
//! ## WASM Backend
//! Sandboxed WebAssembly modules (`.wasm` binaries or `.wat` text):
//! - **Host Interface**: Tree-building imports from module `"ui"`
//! - **Limits**: Fuel per frame, module size cap, import allowlist
//! - **Use Case**: Logic compiled from another language
//!
//! Native Rust closures can also act as logic through
//! [`FnLogic`](crate::traits::FnLogic); they skip loading entirely.
//!
//! # Examples
//!
//! ```rust,no_run
//! use the_ouroboros::backends::LogicLoaderFactory;
//! use the_ouroboros::config::Config;
//! use std::path::Path;
//!
//! let path = Path::new("ui/app.ui");
//! let loader = LogicLoaderFactory::create_loader(path, &Config::default());
//! let logic = loader.load(path)?;
//! println!("loaded {} logic", logic.backend());
//! # Ok::<(), the_ouroboros::errors::ReloadError>(())
//! ```

pub mod factory;
pub mod script;
pub mod wasm;

pub use factory::{BackendKind, LogicLoaderFactory};
