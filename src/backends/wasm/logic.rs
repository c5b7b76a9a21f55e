// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::host::HostState;
use crate::errors::RenderError;
use crate::observability::messages::wasm::FuelExhausted;
use crate::observability::messages::StructuredLog;
use crate::traits::{FrameContext, RenderLogic};
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use wasmtime::{Engine, InstancePre, Store, Trap};

/// A compiled and linked WASM logic module.
///
/// Every frame gets a fresh store and instance, so globals and linear memory
/// written by one frame are gone by the next. Values meant to persist go
/// through `state_set`.
pub struct WasmLogic {
    path: PathBuf,
    engine: Engine,
    pre: InstancePre<HostState>,
    fuel: u64,
}

impl WasmLogic {
    pub(crate) fn new(path: &Path, engine: Engine, pre: InstancePre<HostState>, fuel: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            engine,
            pre,
            fuel,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn call_render(&self, store: &mut Store<HostState>) -> Result<(), RenderError> {
        store
            .set_fuel(self.fuel)
            .map_err(|e| RenderError::Trap(e.to_string()))?;
        let instance = self
            .pre
            .instantiate(&mut *store)
            .map_err(|e| self.convert(e, store.data().frame))?;
        let render = instance
            .get_typed_func::<(), ()>(&mut *store, "render")
            .map_err(|e| RenderError::Trap(e.to_string()))?;
        render
            .call(&mut *store, ())
            .map_err(|e| self.convert(e, store.data().frame))
    }

    /// Recovers host-side render errors raised inside the call; anything
    /// else is a trap in the module itself.
    fn convert(&self, err: wasmtime::Error, frame: u64) -> RenderError {
        if let Some(render) = err.downcast_ref::<RenderError>() {
            return render.clone();
        }
        if err.downcast_ref::<Trap>() == Some(&Trap::OutOfFuel) {
            FuelExhausted {
                frame,
                fuel: self.fuel,
            }
            .log();
            return RenderError::Trap(format!("out of fuel after {} units", self.fuel));
        }
        RenderError::Trap(format!("{:#}", err))
    }
}

/// Moves the frame's builder and state into a store for the duration of
/// `call`, then hands them back, even when `call` unwinds.
fn with_store<R>(
    engine: &Engine,
    frame: &mut FrameContext<'_>,
    call: impl FnOnce(&mut Store<HostState>) -> R,
) -> R {
    let host = HostState {
        ui: mem::take(frame.ui),
        state: mem::take(frame.state),
        viewport: frame.viewport,
        frame: frame.frame,
    };
    let mut store = Store::new(engine, host);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(&mut store)));

    let host = store.into_data();
    *frame.ui = host.ui;
    *frame.state = host.state;
    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

impl RenderLogic for WasmLogic {
    fn render(&self, frame: &mut FrameContext<'_>) -> Result<(), RenderError> {
        with_store(&self.engine, frame, |store| self.call_render(store))
    }

    fn backend(&self) -> &'static str {
        "wasm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PersistentState;
    use crate::traits::Viewport;
    use crate::tree::{Attrs, NodeKind, TreeBuilder};

    fn frame_parts() -> (TreeBuilder, PersistentState) {
        let mut ui = TreeBuilder::new();
        ui.begin_container(NodeKind::Column, Attrs::new()).unwrap();
        let mut state = PersistentState::new();
        state.set("clicks", 12_i64);
        (ui, state)
    }

    #[test]
    fn test_store_contents_come_back_after_a_call() {
        let engine = Engine::default();
        let (mut ui, mut state) = frame_parts();
        let mut frame = FrameContext {
            ui: &mut ui,
            state: &mut state,
            viewport: Viewport {
                width: 100.0,
                height: 100.0,
            },
            frame: 4,
        };

        let seen = with_store(&engine, &mut frame, |store| {
            store.data_mut().state.set("clicks", 13_i64);
            store.data().frame
        });

        assert_eq!(seen, 4);
        assert_eq!(state.get::<i64>("clicks").unwrap(), Some(13));
        assert_eq!(ui.len(), 1);
    }

    #[test]
    fn test_panic_during_call_keeps_state_and_builder() {
        let engine = Engine::default();
        let (mut ui, mut state) = frame_parts();
        let mut frame = FrameContext {
            ui: &mut ui,
            state: &mut state,
            viewport: Viewport {
                width: 100.0,
                height: 100.0,
            },
            frame: 0,
        };

        let unwound = panic::catch_unwind(AssertUnwindSafe(|| {
            with_store(&engine, &mut frame, |store| {
                assert!(store.data().state.contains_key("clicks"));
                panic!("host function blew up");
            })
        }));

        assert!(unwound.is_err());
        assert_eq!(state.get::<i64>("clicks").unwrap(), Some(12));
        assert_eq!(ui.len(), 1);
        assert_eq!(ui.open_scopes(), 1);
    }
}
