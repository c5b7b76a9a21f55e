// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::script::ScriptLoader;
use super::wasm::WasmLogicLoader;
use crate::config::Config;
use crate::traits::LogicLoader;
use std::path::Path;

/// The logic backends a source file can be loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Script,
    Wasm,
}

impl BackendKind {
    /// `.wasm` and `.wat` files are WASM modules; everything else is a UI script.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("wasm") || ext.eq_ignore_ascii_case("wat") => {
                BackendKind::Wasm
            }
            _ => BackendKind::Script,
        }
    }
}

/// Creates the loader matching a logic file.
pub struct LogicLoaderFactory;

impl LogicLoaderFactory {
    pub fn create_loader(path: &Path, config: &Config) -> Box<dyn LogicLoader> {
        match BackendKind::for_path(path) {
            BackendKind::Wasm => Box::new(WasmLogicLoader::new(config.wasm.fuel.effective())),
            BackendKind::Script => Box::new(ScriptLoader::new(config.script.max_steps)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_by_extension() {
        assert_eq!(BackendKind::for_path(Path::new("ui/app.ui")), BackendKind::Script);
        assert_eq!(BackendKind::for_path(Path::new("ui/counter.wat")), BackendKind::Wasm);
        assert_eq!(BackendKind::for_path(Path::new("logic.WASM")), BackendKind::Wasm);
        assert_eq!(BackendKind::for_path(Path::new("no_extension")), BackendKind::Script);
    }
}
