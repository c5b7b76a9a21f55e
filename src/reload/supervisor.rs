// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ErrorState, ReloadError};
use crate::observability::messages::reload::{
    ModifiedTimeUnavailable, ReloadDetected, ReloadFailed, ReloadSucceeded,
    SupervisorStateChanged,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{LogicLoader, RenderLogic};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// The active unit matches the last observed timestamp.
    Watching,
    /// A changed file is being loaded.
    Reloading,
    /// The last attempt failed; the previous unit, if any, stays active.
    Degraded,
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SupervisorState::Watching => "watching",
            SupervisorState::Reloading => "reloading",
            SupervisorState::Degraded => "degraded",
        };
        f.write_str(name)
    }
}

/// Result of one [`ReloadSupervisor::check_and_reload`] call.
#[derive(Debug)]
pub enum ReloadOutcome {
    Unchanged,
    Reloaded,
    Failed(ReloadError),
}

/// The watched logic file and the unit loaded from it.
///
/// `unit`, `modified` and `version` only change together, in
/// [`ReloadSupervisor`]'s swap; a failed load moves `modified` alone.
pub struct LogicModule {
    path: PathBuf,
    modified: Option<SystemTime>,
    unit: Option<Box<dyn RenderLogic>>,
    version: u64,
}

impl LogicModule {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            modified: None,
            unit: None,
            version: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last load attempt, successful or not.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn unit(&self) -> Option<&dyn RenderLogic> {
        self.unit.as_deref()
    }

    /// Number of successful loads so far; `0` while nothing is loaded.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl fmt::Debug for LogicModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogicModule")
            .field("path", &self.path)
            .field("modified", &self.modified)
            .field("backend", &self.unit.as_ref().map(|unit| unit.backend()))
            .field("version", &self.version)
            .finish()
    }
}

/// Polls the logic file's modification time and swaps in a freshly loaded
/// unit when it changes.
pub struct ReloadSupervisor {
    module: LogicModule,
    loader: Box<dyn LogicLoader>,
    state: SupervisorState,
    error: Option<ErrorState>,
    attempts: u64,
    failures: u64,
}

impl ReloadSupervisor {
    /// Supervisor with nothing loaded yet. The first
    /// [`check_and_reload`](Self::check_and_reload) that can read the file's
    /// timestamp loads it.
    pub fn new(path: impl Into<PathBuf>, loader: Box<dyn LogicLoader>) -> Self {
        Self {
            module: LogicModule::new(path.into()),
            loader,
            state: SupervisorState::Watching,
            error: None,
            attempts: 0,
            failures: 0,
        }
    }

    /// Creates the supervisor and performs the initial load right away.
    ///
    /// A failed initial load is not fatal: the supervisor starts `Degraded`
    /// with no active unit and keeps the error for display.
    pub fn start(path: impl Into<PathBuf>, loader: Box<dyn LogicLoader>) -> Self {
        let mut supervisor = Self::new(path, loader);
        match supervisor.read_modified() {
            Some(modified) => {
                supervisor.attempt(modified);
            }
            None => {
                let error = ReloadError::Io {
                    path: supervisor.module.path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "logic file is not readable",
                    ),
                };
                supervisor.record_failure(&error);
            }
        }
        supervisor
    }

    /// Runs once per frame before the logic executes.
    pub fn check_and_reload(&mut self) -> ReloadOutcome {
        match self.read_modified() {
            Some(modified) if self.module.modified != Some(modified) => self.attempt(modified),
            _ => ReloadOutcome::Unchanged,
        }
    }

    pub fn active(&self) -> Option<&dyn RenderLogic> {
        self.module.unit()
    }

    pub fn module(&self) -> &LogicModule {
        &self.module
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// The failure of the most recent load attempt, cleared by the next
    /// successful one.
    pub fn error_state(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    /// Load attempts so far, including the initial one.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Timestamp read failures are expected while an editor is mid-save, so
    /// they count as "no change".
    fn read_modified(&self) -> Option<SystemTime> {
        match fs::metadata(&self.module.path).and_then(|meta| meta.modified()) {
            Ok(modified) => Some(modified),
            Err(error) => {
                ModifiedTimeUnavailable {
                    path: &self.path_str(),
                    error: &error,
                }
                .log();
                None
            }
        }
    }

    fn attempt(&mut self, modified: SystemTime) -> ReloadOutcome {
        self.attempts += 1;
        ReloadDetected {
            path: &self.path_str(),
            attempt: self.attempts,
        }
        .log();
        self.transition(SupervisorState::Reloading);

        match self.loader.load(&self.module.path) {
            Ok(unit) => {
                self.module.unit = Some(unit);
                self.module.modified = Some(modified);
                self.module.version += 1;
                self.error = None;
                self.transition(SupervisorState::Watching);
                ReloadSucceeded {
                    path: &self.path_str(),
                    backend: self.module.unit.as_ref().map_or("none", |unit| unit.backend()),
                    version: self.module.version,
                }
                .log();
                ReloadOutcome::Reloaded
            }
            Err(error) => {
                // A broken save is attempted once, not on every frame.
                self.module.modified = Some(modified);
                self.record_failure(&error);
                ReloadOutcome::Failed(error)
            }
        }
    }

    fn record_failure(&mut self, error: &ReloadError) {
        self.failures += 1;
        self.error = Some(ErrorState::reload(error));
        self.transition(SupervisorState::Degraded);
        ReloadFailed {
            path: &self.path_str(),
            error,
            keeps_previous: self.module.unit.is_some(),
        }
        .log();
    }

    fn transition(&mut self, to: SupervisorState) {
        if self.state != to {
            SupervisorStateChanged {
                path: &self.path_str(),
                from: &self.state.to_string(),
                to: &to.to_string(),
            }
            .log();
            self.state = to;
        }
    }

    fn path_str(&self) -> String {
        self.module.path.display().to_string()
    }
}

impl fmt::Debug for ReloadSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadSupervisor")
            .field("module", &self.module)
            .field("state", &self.state)
            .field("attempts", &self.attempts)
            .field("failures", &self.failures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RenderError;
    use crate::state::PersistentState;
    use crate::traits::{FnLogic, FrameContext, Viewport};
    use crate::tree::{Attrs, NodeKind, Styled, TreeBuilder, UiTree};
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};

    /// Loads a file whose whole content is the text to show; content starting
    /// with `bad` fails to load.
    struct TextLoader;

    impl LogicLoader for TextLoader {
        fn load(&self, path: &Path) -> Result<Box<dyn RenderLogic>, ReloadError> {
            let content = fs::read_to_string(path).map_err(|source| ReloadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if content.starts_with("bad") {
                return Err(ReloadError::Syntax {
                    path: path.to_path_buf(),
                    line: 1,
                    column: 1,
                    message: content,
                });
            }
            Ok(Box::new(FnLogic::new(move |frame: &mut FrameContext<'_>| {
                frame
                    .ui
                    .leaf(NodeKind::Text, Attrs::new().text(content.clone()))?;
                Ok(())
            })))
        }
    }

    fn write_at(path: &Path, content: &str, secs: u64) {
        fs::write(path, content).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn render(supervisor: &ReloadSupervisor) -> Result<UiTree, RenderError> {
        let mut ui = TreeBuilder::new();
        let mut state = PersistentState::new();
        let mut frame = FrameContext {
            ui: &mut ui,
            state: &mut state,
            viewport: Viewport {
                width: 10.0,
                height: 10.0,
            },
            frame: 0,
        };
        supervisor
            .active()
            .ok_or(RenderError::NoLogic)?
            .render(&mut frame)?;
        ui.finish()
    }

    #[test]
    fn test_unchanged_file_is_not_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic.txt");
        write_at(&path, "v1", 1_000);

        let mut supervisor = ReloadSupervisor::start(&path, Box::new(TextLoader));
        assert_eq!(supervisor.attempts(), 1);
        for _ in 0..100 {
            assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Unchanged));
        }
        assert_eq!(supervisor.attempts(), 1);
        assert_eq!(supervisor.state(), SupervisorState::Watching);
    }

    #[test]
    fn test_failed_reload_keeps_previous_unit_and_records_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic.txt");
        write_at(&path, "v1", 1_000);
        let mut supervisor = ReloadSupervisor::start(&path, Box::new(TextLoader));

        write_at(&path, "bad save", 2_000);
        assert!(matches!(
            supervisor.check_and_reload(),
            ReloadOutcome::Failed(ReloadError::Syntax { .. })
        ));
        assert_eq!(supervisor.state(), SupervisorState::Degraded);
        assert_eq!(supervisor.module().version(), 1);
        assert_eq!(
            supervisor.module().modified(),
            Some(UNIX_EPOCH + Duration::from_secs(2_000))
        );
        assert!(render(&supervisor).unwrap().contains_text("v1"));
        assert!(supervisor.error_state().is_some());

        // same broken file: no second attempt
        assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Unchanged));
        assert_eq!(supervisor.attempts(), 2);
        assert_eq!(supervisor.state(), SupervisorState::Degraded);

        write_at(&path, "v2", 3_000);
        assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Reloaded));
        assert_eq!(supervisor.state(), SupervisorState::Watching);
        assert!(supervisor.error_state().is_none());
        assert_eq!(supervisor.module().version(), 2);
        assert!(render(&supervisor).unwrap().contains_text("v2"));
    }

    #[test]
    fn test_older_timestamp_still_counts_as_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic.txt");
        write_at(&path, "new", 5_000);
        let mut supervisor = ReloadSupervisor::start(&path, Box::new(TextLoader));

        write_at(&path, "restored", 4_000);
        assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Reloaded));
        assert!(render(&supervisor).unwrap().contains_text("restored"));
    }

    #[test]
    fn test_missing_file_is_transient() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic.txt");
        write_at(&path, "v1", 1_000);
        let mut supervisor = ReloadSupervisor::start(&path, Box::new(TextLoader));

        fs::remove_file(&path).unwrap();
        assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Unchanged));
        assert_eq!(supervisor.state(), SupervisorState::Watching);
        assert!(supervisor.active().is_some());
    }

    #[test]
    fn test_initial_failure_starts_degraded_without_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic.txt");
        write_at(&path, "bad from the start", 1_000);

        let mut supervisor = ReloadSupervisor::start(&path, Box::new(TextLoader));
        assert_eq!(supervisor.state(), SupervisorState::Degraded);
        assert!(supervisor.active().is_none());
        assert_eq!(supervisor.module().version(), 0);
        assert!(supervisor
            .error_state()
            .is_some_and(|error| error.detail.contains("bad from the start")));

        write_at(&path, "fixed", 2_000);
        assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Reloaded));
        assert!(supervisor.active().is_some());
    }

    #[test]
    fn test_absent_file_at_start_loads_once_it_appears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logic.txt");

        let mut supervisor = ReloadSupervisor::start(&path, Box::new(TextLoader));
        assert_eq!(supervisor.state(), SupervisorState::Degraded);
        assert_eq!(supervisor.attempts(), 0);

        write_at(&path, "late", 1_000);
        assert!(matches!(supervisor.check_and_reload(), ReloadOutcome::Reloaded));
        assert_eq!(supervisor.module().version(), 1);
    }
}
