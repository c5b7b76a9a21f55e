// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The frame loop that ties reload, logic, crash isolation and the engine
//! together.
//!
//! Each [`Harness::step`] is one iteration:
//!
//! 1. `begin_frame` on the engine
//! 2. `check_and_reload` on the supervisor
//! 3. the active logic runs against a fresh [`TreeBuilder`] inside a failure
//!    boundary, or the crash screen is built instead
//! 4. `end_frame` with whichever tree resulted
//!
//! Only [`EngineError`]s leave the loop. Logic errors, panics, unbalanced
//! scopes and failed reloads all end up on screen.

use crate::backends::LogicLoaderFactory;
use crate::config::Config;
use crate::errors::{EngineError, ErrorState, RenderError};
use crate::isolation::render_error;
use crate::observability::messages::frame::{
    FrameStarted, FrameSummary, RenderFailed, RenderRecovered,
};
use crate::observability::messages::StructuredLog;
use crate::reload::{ReloadOutcome, ReloadSupervisor};
use crate::state::PersistentState;
use crate::traits::{EngineContext, FrameContext, Viewport};
use crate::tree::{TreeBuilder, UiTree};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;


/// What ended up on screen for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The active logic built the tree.
    Rendered,
    /// A reload failed this frame; the crash screen shows the load error.
    ReloadFailed,
    /// The active logic failed; the crash screen shows the render error.
    RenderFailed,
    /// Nothing has loaded successfully yet.
    NoLogic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub outcome: FrameOutcome,
    pub reloaded: bool,
    pub draw_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub reloads: u64,
    pub reload_failures: u64,
    pub render_failures: u64,
}

impl FrameStats {
    pub fn failures(&self) -> u64 {
        self.reload_failures + self.render_failures
    }
}

pub struct Harness<E: EngineContext> {
    engine: E,
    supervisor: ReloadSupervisor,
    state: PersistentState,
    render_error: Option<ErrorState>,
    frame_interval: Option<Duration>,
    log_every: u64,
    stats: FrameStats,
}

impl<E: EngineContext> Harness<E> {
    pub fn new(engine: E, supervisor: ReloadSupervisor) -> Self {
        Self {
            engine,
            supervisor,
            state: PersistentState::new(),
            render_error: None,
            frame_interval: None,
            log_every: 0,
            stats: FrameStats::default(),
        }
    }

    /// Harness for `config.logic`, with the initial load already attempted.
    pub fn from_config(engine: E, config: &Config) -> Self {
        let loader = LogicLoaderFactory::create_loader(&config.logic, config);
        let supervisor = ReloadSupervisor::start(config.logic.clone(), loader);
        Self::new(engine, supervisor)
            .with_frame_interval(config.frame_interval())
            .with_log_every(config.log_every)
    }

    /// Sleep between frames in [`run`](Self::run); `None` runs flat out.
    pub fn with_frame_interval(mut self, interval: Option<Duration>) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Log a frame summary every `frames` frames; `0` disables it.
    pub fn with_log_every(mut self, frames: u64) -> Self {
        self.log_every = frames;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn supervisor(&self) -> &ReloadSupervisor {
        &self.supervisor
    }

    pub fn state(&self) -> &PersistentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PersistentState {
        &mut self.state
    }

    /// Failure of the most recent render, cleared by the next successful frame.
    pub fn render_error_state(&self) -> Option<&ErrorState> {
        self.render_error.as_ref()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Runs frames until the engine asks to stop.
    pub fn run(&mut self) -> Result<FrameStats, EngineError> {
        while self.engine.should_continue() {
            self.step()?;
            if let Some(interval) = self.frame_interval {
                std::thread::sleep(interval);
            }
        }
        Ok(self.stats)
    }

    /// Runs one frame.
    pub fn step(&mut self) -> Result<FrameReport, EngineError> {
        let frame = self.stats.frames;
        let started = FrameStarted { frame };
        let _span = started.span("frame").entered();
        started.log();

        self.engine.begin_frame()?;

        let mut reloaded = false;
        let (tree, outcome) = match self.supervisor.check_and_reload() {
            ReloadOutcome::Failed(error) => {
                self.stats.reload_failures += 1;
                let tree = render_error(
                    &ErrorState::reload(&error),
                    self.engine.width(),
                    self.engine.height(),
                );
                (tree, FrameOutcome::ReloadFailed)
            }
            ReloadOutcome::Reloaded => {
                self.stats.reloads += 1;
                reloaded = true;
                self.render_frame(frame)
            }
            ReloadOutcome::Unchanged => self.render_frame(frame),
        };

        let draw_count = self.engine.end_frame(&tree)?;
        self.stats.frames += 1;

        if self.log_every > 0 && self.stats.frames % self.log_every == 0 {
            FrameSummary {
                frame: self.stats.frames,
                draw_count,
                reloads: self.stats.reloads,
                failures: self.stats.failures(),
            }
            .log();
        }

        Ok(FrameReport {
            frame,
            outcome,
            reloaded,
            draw_count,
        })
    }

    fn render_frame(&mut self, frame: u64) -> (UiTree, FrameOutcome) {
        let (width, height) = (self.engine.width(), self.engine.height());

        let Some(logic) = self.supervisor.active() else {
            let error = self
                .supervisor
                .error_state()
                .cloned()
                .unwrap_or_else(|| ErrorState::render(&RenderError::NoLogic));
            return (render_error(&error, width, height), FrameOutcome::NoLogic);
        };
        let backend = logic.backend();

        let mut ui = TreeBuilder::new();
        let result = {
            let mut context = FrameContext {
                ui: &mut ui,
                state: &mut self.state,
                viewport: Viewport { width, height },
                frame,
            };
            panic::catch_unwind(AssertUnwindSafe(|| logic.render(&mut context)))
                .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(&*payload))))
        };

        let open_scopes = ui.open_scopes();
        match result.and_then(|()| ui.finish()) {
            Ok(tree) => {
                if self.render_error.take().is_some() {
                    RenderRecovered { frame }.log();
                }
                (tree, FrameOutcome::Rendered)
            }
            Err(error) => {
                self.stats.render_failures += 1;
                RenderFailed {
                    frame,
                    backend,
                    error: &error,
                }
                .log();

                let mut captured = ErrorState::render(&error);
                if open_scopes > 0 && !error.is_unbalanced_scope() {
                    captured.detail.push_str(&format!(
                        "\n  also: frame ended with {} unclosed container(s)",
                        open_scopes
                    ));
                }
                let tree = render_error(&captured, width, height);
                self.render_error = Some(captured);
                (tree, FrameOutcome::RenderFailed)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
