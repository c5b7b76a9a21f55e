// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// A new logic unit failed to load. The previously active unit stays in place.
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The logic source could not be read.
    #[error("failed to read logic file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The UI script does not parse.
    #[error("syntax error in '{path}' at {line}:{column}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// The script's `init` block failed while the module was loading.
    #[error("init block of '{path}' failed: {message}")]
    Init { path: PathBuf, message: String },

    /// The WASM module failed to compile or link.
    #[error("failed to compile logic module '{path}': {message}")]
    Compile { path: PathBuf, message: String },

    /// The WASM module is larger than the loader accepts.
    #[error("logic module '{path}' is too large: {size} bytes (max: {max} bytes)")]
    TooLarge { path: PathBuf, size: usize, max: usize },

    /// The WASM module imports something the host does not provide.
    #[error("logic module '{path}' imports unsupported function '{module}::{name}'")]
    UnsupportedImport {
        path: PathBuf,
        module: String,
        name: String,
    },

    /// The WASM module lacks a required export or exports it with the wrong type.
    #[error("logic module '{path}' must export {expected}")]
    MissingExport { path: PathBuf, expected: String },

    /// The WASM runtime itself could not be configured.
    #[error("failed to create WASM engine: {0}")]
    Engine(String),
}
