// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::ast::Program;
use super::interpreter::{Globals, Interpreter};
use super::parser::parse;
use crate::errors::{ReloadError, RenderError};
use crate::traits::{FrameContext, LogicLoader, RenderLogic};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads `.ui` scripts. Every load parses the whole file and runs its `init`
/// block once; nothing from a previous load is reused.
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    max_steps: u64,
}

impl ScriptLoader {
    pub fn new(max_steps: u64) -> Self {
        Self { max_steps }
    }
}

impl LogicLoader for ScriptLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn RenderLogic>, ReloadError> {
        let source = fs::read_to_string(path).map_err(|source| ReloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(ScriptLogic::compile(path, &source, self.max_steps)?))
    }
}

/// A parsed script plus the globals its `init` block produced.
pub struct ScriptLogic {
    path: PathBuf,
    program: Program,
    globals: Globals,
    max_steps: u64,
}

impl ScriptLogic {
    pub fn compile(path: &Path, source: &str, max_steps: u64) -> Result<Self, ReloadError> {
        let program = parse(source).map_err(|err| ReloadError::Syntax {
            path: path.to_path_buf(),
            line: err.line,
            column: err.column,
            message: err.message,
        })?;

        let mut init = Interpreter::for_init(max_steps);
        init.run(&program.init)
            .map_err(|err: RenderError| ReloadError::Init {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        let globals = init.into_globals();

        Ok(Self {
            path: path.to_path_buf(),
            program,
            globals,
            max_steps,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RenderLogic for ScriptLogic {
    /// Runs the body against a fresh copy of the `init` globals, so
    /// assignments never leak from one frame into the next.
    fn render(&self, frame: &mut FrameContext<'_>) -> Result<(), RenderError> {
        Interpreter::for_frame(frame, self.globals.clone(), self.max_steps).run(&self.program.body)
    }

    fn backend(&self) -> &'static str {
        "script"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PersistentState;
    use crate::traits::Viewport;
    use crate::tree::TreeBuilder;
    use std::io::Write;

    fn render(logic: &dyn RenderLogic, state: &mut PersistentState) -> Result<crate::tree::UiTree, RenderError> {
        let mut ui = TreeBuilder::new();
        let mut frame = FrameContext {
            ui: &mut ui,
            state,
            viewport: Viewport {
                width: 320.0,
                height: 240.0,
            },
            frame: 0,
        };
        logic.render(&mut frame)?;
        ui.finish()
    }

    #[test]
    fn test_init_globals_are_fresh_each_frame() {
        let source = "init {\n let count = 10\n}\ncount = count + 1\ncolumn()\ntext(str(count))\nend()";
        let logic = ScriptLogic::compile(Path::new("t.ui"), source, 1000).unwrap();
        let mut state = PersistentState::new();

        for _ in 0..3 {
            let tree = render(&logic, &mut state).unwrap();
            assert_eq!(tree.texts(), vec!["11"]);
        }
    }

    #[test]
    fn test_syntax_error_maps_to_reload_error() {
        let err = ScriptLogic::compile(Path::new("bad.ui"), "column(\n", 1000)
            .err()
            .unwrap();
        assert!(matches!(err, ReloadError::Syntax { line: 2, .. }), "{:?}", err);
    }

    #[test]
    fn test_failing_init_maps_to_reload_error() {
        let err = ScriptLogic::compile(Path::new("bad.ui"), "init {\n fail(\"nope\")\n}", 1000)
            .err()
            .unwrap();
        match err {
            ReloadError::Init { message, .. } => assert!(message.contains("nope")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_loader_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".ui").tempfile().unwrap();
        writeln!(file, "column()\ntext(\"from disk\")\nend()").unwrap();

        let logic = ScriptLoader::new(1000).load(file.path()).unwrap();
        assert_eq!(logic.backend(), "script");

        let mut state = PersistentState::new();
        let tree = render(logic.as_ref(), &mut state).unwrap();
        assert!(tree.contains_text("from disk"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ScriptLoader::new(1000)
            .load(Path::new("/definitely/not/here.ui"))
            .err()
            .unwrap();
        assert!(matches!(err, ReloadError::Io { .. }));
    }

    #[test]
    fn test_bundled_demo_renders() {
        let source = include_str!("../../../ui/app.ui");
        let logic = ScriptLogic::compile(Path::new("ui/app.ui"), source, 100_000).unwrap();
        let mut state = PersistentState::new();

        render(&logic, &mut state).unwrap();
        let tree = render(&logic, &mut state).unwrap();
        assert_eq!(tree.texts()[0], "Ouroboros");
        assert!(tree.contains_text("tick"));
        assert_eq!(state.get::<f64>("taps").unwrap(), Some(2.0));
    }
}
