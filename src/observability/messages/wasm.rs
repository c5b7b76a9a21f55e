// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the WASM logic backend.

use super::StructuredLog;
use std::fmt::{Display, Formatter};

/// WASM logic module compiled and linked against the host interface.
///
/// # Log Level
/// `debug!` - Diagnostic detail; the reload itself is logged separately
///
/// # Example
/// ```
/// use the_ouroboros::observability::messages::wasm::ModuleLoaded;
/// use the_ouroboros::observability::messages::StructuredLog;
///
/// let msg = ModuleLoaded {
///     module_path: "ui/counter.wat",
///     size_bytes: 4096,
///     imports: 6,
/// };
///
/// msg.log();
/// ```
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
    pub imports: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM module: {} ({} bytes, {} host imports)",
            self.module_path, self.size_bytes, self.imports
        )
    }
}

impl StructuredLog for ModuleLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            module_path = self.module_path,
            size_bytes = self.size_bytes,
            imports = self.imports,
            "{}",
            self
        );
    }
}

/// A frame's `render` call used up its whole fuel allowance.
///
/// # Log Level
/// `warn!` - Usually an endless loop in the module
pub struct FuelExhausted {
    pub frame: u64,
    pub fuel: u64,
}

impl Display for FuelExhausted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frame {}: WASM logic ran out of fuel ({} units)",
            self.frame, self.fuel
        )
    }
}

impl StructuredLog for FuelExhausted {
    fn log(&self) {
        tracing::warn!(frame = self.frame, fuel = self.fuel, "{}", self);
    }
}
