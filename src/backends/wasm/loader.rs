// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM logic loading and validation
//!
//! Reads a `.wasm` binary (or `.wat` text), checks its size, compiles it with
//! fuel metering enabled, verifies it only imports host functions from the
//! `"ui"` module and exports `render: () -> ()`, and pre-links it so frames
//! only pay for instantiation.

use super::host::{self, HOST_FUNCTIONS, HOST_MODULE};
use super::logic::WasmLogic;
use crate::errors::ReloadError;
use crate::observability::messages::wasm::ModuleLoaded;
use crate::observability::messages::StructuredLog;
use crate::traits::{LogicLoader, RenderLogic};
use std::path::Path;
use wasmtime::{Config, Engine, ExternType, Module};

/// Maximum allowed size for WASM logic modules (16 MB)
pub const MAX_MODULE_SIZE: usize = 16 * 1024 * 1024;

/// Loads WASM logic modules with a per-frame fuel allowance.
#[derive(Debug, Clone)]
pub struct WasmLogicLoader {
    fuel: u64,
}

impl WasmLogicLoader {
    pub fn new(fuel: u64) -> Self {
        Self { fuel }
    }

    pub fn fuel(&self) -> u64 {
        self.fuel
    }

    /// Engine with fuel metering and without proposals the host interface
    /// does not use.
    fn create_engine() -> Result<Engine, ReloadError> {
        let mut config = Config::new();
        config.wasm_threads(false);
        config.wasm_multi_memory(false);
        config.wasm_memory64(false);
        config.consume_fuel(true);
        config.epoch_interruption(false);

        Engine::new(&config).map_err(|e| ReloadError::Engine(e.to_string()))
    }

    fn check_imports(path: &Path, module: &Module) -> Result<usize, ReloadError> {
        let mut count = 0;
        for import in module.imports() {
            if import.module() != HOST_MODULE || !HOST_FUNCTIONS.contains(&import.name()) {
                return Err(ReloadError::UnsupportedImport {
                    path: path.to_path_buf(),
                    module: import.module().to_string(),
                    name: import.name().to_string(),
                });
            }
            count += 1;
        }
        Ok(count)
    }

    fn check_exports(path: &Path, module: &Module) -> Result<(), ReloadError> {
        match module.get_export("render") {
            Some(ExternType::Func(ty)) if ty.params().len() == 0 && ty.results().len() == 0 => {
                Ok(())
            }
            _ => Err(ReloadError::MissingExport {
                path: path.to_path_buf(),
                expected: "a function 'render' with signature () -> ()".to_string(),
            }),
        }
    }
}

impl LogicLoader for WasmLogicLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn RenderLogic>, ReloadError> {
        let bytes = std::fs::read(path).map_err(|source| ReloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.len() > MAX_MODULE_SIZE {
            return Err(ReloadError::TooLarge {
                path: path.to_path_buf(),
                size: bytes.len(),
                max: MAX_MODULE_SIZE,
            });
        }

        let compile_error = |e: wasmtime::Error| ReloadError::Compile {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        };

        let engine = Self::create_engine()?;
        let module = Module::new(&engine, &bytes).map_err(compile_error)?;
        let imports = Self::check_imports(path, &module)?;
        Self::check_exports(path, &module)?;

        let linker = host::link(&engine).map_err(|e| ReloadError::Engine(e.to_string()))?;
        let pre = linker.instantiate_pre(&module).map_err(compile_error)?;

        ModuleLoaded {
            module_path: &path.display().to_string(),
            size_bytes: bytes.len(),
            imports,
        }
        .log();

        Ok(Box::new(WasmLogic::new(path, engine, pre, self.fuel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RenderError;
    use crate::state::PersistentState;
    use crate::traits::{FrameContext, Viewport};
    use crate::tree::{NodeKind, TreeBuilder, UiTree};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COUNTER: &str = r#"
        (module
          (import "ui" "begin" (func $begin (param i32)))
          (import "ui" "end" (func $end))
          (import "ui" "text" (func $text (param i32 i32)))
          (import "ui" "set_f32" (func $set_f32 (param i32 f32)))
          (import "ui" "state_get" (func $state_get (param i32 i32 f64) (result f64)))
          (import "ui" "state_set" (func $state_set (param i32 i32 f64)))
          (memory (export "memory") 1)
          (data (i32.const 0) "count")
          (data (i32.const 16) "hello")
          (func (export "render")
            (call $begin (i32.const 0))
            (call $set_f32 (i32.const 2) (f32.const 12))
            (call $state_set (i32.const 0) (i32.const 5)
              (f64.add
                (call $state_get (i32.const 0) (i32.const 5) (f64.const 0))
                (f64.const 1)))
            (call $text (i32.const 16) (i32.const 5))
            (call $end)))
    "#;

    fn module_file(wat_source: &str) -> NamedTempFile {
        let bytes = wat::parse_str(wat_source).unwrap();
        let mut file = tempfile::Builder::new().suffix(".wasm").tempfile().unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    fn render(
        logic: &dyn RenderLogic,
        state: &mut PersistentState,
    ) -> Result<UiTree, RenderError> {
        let mut ui = TreeBuilder::new();
        let mut frame = FrameContext {
            ui: &mut ui,
            state,
            viewport: Viewport {
                width: 640.0,
                height: 480.0,
            },
            frame: 1,
        };
        logic.render(&mut frame)?;
        ui.finish()
    }

    #[test]
    fn test_counter_module_builds_tree_and_keeps_state() {
        let file = module_file(COUNTER);
        let logic = WasmLogicLoader::new(1_000_000).load(file.path()).unwrap();
        assert_eq!(logic.backend(), "wasm");

        let mut state = PersistentState::new();
        let tree = render(logic.as_ref(), &mut state).unwrap();
        assert_eq!(tree.root().kind, NodeKind::Column);
        assert_eq!(tree.root().attrs.padding, Some(12.0));
        assert_eq!(tree.texts(), vec!["hello"]);

        render(logic.as_ref(), &mut state).unwrap();
        assert_eq!(state.get::<f64>("count").unwrap(), Some(2.0));
    }

    #[test]
    fn test_text_format_is_accepted() {
        let mut file = tempfile::Builder::new().suffix(".wat").tempfile().unwrap();
        file.write_all(COUNTER.as_bytes()).unwrap();
        assert!(WasmLogicLoader::new(1_000_000).load(file.path()).is_ok());
    }

    #[test]
    fn test_unbalanced_scope_surfaces_as_render_error() {
        let file = module_file(
            r#"(module
                 (import "ui" "end" (func $end))
                 (func (export "render") (call $end)))"#,
        );
        let logic = WasmLogicLoader::new(1_000_000).load(file.path()).unwrap();
        let err = render(logic.as_ref(), &mut PersistentState::new()).unwrap_err();
        assert!(err.is_unbalanced_scope(), "{:?}", err);
    }

    #[test]
    fn test_set_after_end_is_rejected() {
        let file = module_file(
            r#"(module
                 (import "ui" "begin" (func $begin (param i32)))
                 (import "ui" "end" (func $end))
                 (import "ui" "set_f32" (func $set_f32 (param i32 f32)))
                 (func (export "render")
                   (call $begin (i32.const 0))
                   (call $end)
                   (call $set_f32 (i32.const 2) (f32.const 4))))"#,
        );
        let logic = WasmLogicLoader::new(1_000_000).load(file.path()).unwrap();
        let err = render(logic.as_ref(), &mut PersistentState::new()).unwrap_err();
        assert_eq!(err, RenderError::NodeFinalized(0));
    }

    #[test]
    fn test_endless_loop_runs_out_of_fuel_and_state_survives() {
        let file = module_file(
            r#"(module
                 (func (export "render") (loop $spin (br $spin))))"#,
        );
        let logic = WasmLogicLoader::new(10_000).load(file.path()).unwrap();

        let mut state = PersistentState::new();
        state.set("kept", 42.0_f64);
        let err = render(logic.as_ref(), &mut state).unwrap_err();

        assert!(matches!(err, RenderError::Trap(ref msg) if msg.contains("fuel")), "{:?}", err);
        assert_eq!(state.get::<f64>("kept").unwrap(), Some(42.0));
    }

    #[test]
    fn test_guest_trap_is_reported() {
        let file = module_file(r#"(module (func (export "render") unreachable))"#);
        let logic = WasmLogicLoader::new(10_000).load(file.path()).unwrap();
        let err = render(logic.as_ref(), &mut PersistentState::new()).unwrap_err();
        assert!(matches!(err, RenderError::Trap(_)));
    }

    #[test]
    fn test_rejects_foreign_imports() {
        let file = module_file(
            r#"(module
                 (import "env" "abort" (func))
                 (func (export "render")))"#,
        );
        let err = WasmLogicLoader::new(10_000).load(file.path()).err().unwrap();
        assert!(
            matches!(err, ReloadError::UnsupportedImport { ref module, ref name, .. } if module == "env" && name == "abort")
        );
    }

    #[test]
    fn test_requires_render_export() {
        let file = module_file(r#"(module (func (export "draw")))"#);
        let err = WasmLogicLoader::new(10_000).load(file.path()).err().unwrap();
        assert!(matches!(err, ReloadError::MissingExport { .. }));

        let file = module_file(r#"(module (func (export "render") (param i32)))"#);
        let err = WasmLogicLoader::new(10_000).load(file.path()).err().unwrap();
        assert!(matches!(err, ReloadError::MissingExport { .. }));
    }

    #[test]
    fn test_invalid_module_is_compile_error() {
        let mut file = tempfile::Builder::new().suffix(".wasm").tempfile().unwrap();
        file.write_all(b"\0asm\x01\0\0\0garbage").unwrap();
        let err = WasmLogicLoader::new(10_000).load(file.path()).err().unwrap();
        assert!(matches!(err, ReloadError::Compile { .. }), "{:?}", err);
    }

    #[test]
    fn test_module_size_validation() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; MAX_MODULE_SIZE + 1]).unwrap();
        let err = WasmLogicLoader::new(10_000).load(file.path()).err().unwrap();
        assert!(matches!(err, ReloadError::TooLarge { .. }));
    }
}
