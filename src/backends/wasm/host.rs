// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Host functions a WASM logic module may import from module `"ui"`.
//!
//! | import      | signature                    | effect                               |
//! |-------------|------------------------------|--------------------------------------|
//! | `begin`     | `(kind: i32)`                | open a container                     |
//! | `leaf`      | `(kind: i32)`                | add an empty leaf                    |
//! | `text`      | `(ptr: i32, len: i32)`       | add a text leaf                      |
//! | `end`       | `()`                         | close the innermost container        |
//! | `set_text`  | `(ptr: i32, len: i32)`       | set the latest node's text           |
//! | `set_f32`   | `(attr: i32, value: f32)`    | set a numeric attribute              |
//! | `set_color` | `(slot: i32, r, g, b, a f32)`| `0` background, `1` foreground       |
//! | `width`     | `() -> f32`                  | viewport width                       |
//! | `height`    | `() -> f32`                  | viewport height                      |
//! | `frame`     | `() -> i64`                  | frame number                         |
//! | `state_get` | `(ptr, len, default f64) -> f64` | persistent number, inserted if absent |
//! | `state_set` | `(ptr, len, value f64)`      | store a persistent number            |
//!
//! Kind codes follow [`NodeKind::ALL`]. Attribute codes: `0` width,
//! `1` height, `2` padding, `3` margin, `4` radius, `5` shadow, `6` grow,
//! `7` font size, `8` value. Strings are UTF-8 in the module's exported
//! `memory`.

use crate::errors::RenderError;
use crate::state::PersistentState;
use crate::traits::Viewport;
use crate::tree::{Attrs, NodeKind, Styled, TreeBuilder};
use wasmtime::{Caller, Engine, Linker};

pub(crate) const HOST_MODULE: &str = "ui";

pub(crate) const HOST_FUNCTIONS: &[&str] = &[
    "begin",
    "leaf",
    "text",
    "end",
    "set_text",
    "set_f32",
    "set_color",
    "width",
    "height",
    "frame",
    "state_get",
    "state_set",
];

/// Store data for one `render` call. The builder and the state are moved in
/// from the frame before the call and moved back afterwards.
pub(crate) struct HostState {
    pub ui: TreeBuilder,
    pub state: PersistentState,
    pub viewport: Viewport,
    pub frame: u64,
}

/// Wraps a render failure so it survives the trip through the guest and can
/// be downcast again after the call.
fn guest_error(err: impl Into<RenderError>) -> wasmtime::Error {
    wasmtime::Error::new(err.into())
}

fn node_kind(code: i32) -> wasmtime::Result<NodeKind> {
    NodeKind::from_code(code)
        .ok_or_else(|| guest_error(RenderError::UnknownKind(format!("kind code {}", code))))
}

fn read_str(caller: &mut Caller<'_, HostState>, ptr: i32, len: i32) -> wasmtime::Result<String> {
    let memory = caller
        .get_export("memory")
        .and_then(|export| export.into_memory())
        .ok_or_else(|| guest_error(RenderError::logic("module does not export 'memory'")))?;

    let bytes = usize::try_from(ptr)
        .ok()
        .zip(usize::try_from(len).ok())
        .and_then(|(start, len)| {
            let end = start.checked_add(len)?;
            memory.data(&*caller).get(start..end)
        })
        .ok_or_else(|| {
            guest_error(RenderError::logic(format!(
                "string at {}+{} is outside linear memory",
                ptr, len
            )))
        })?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

pub(crate) fn link(engine: &Engine) -> wasmtime::Result<Linker<HostState>> {
    let mut linker = Linker::new(engine);

    linker.func_wrap(
        HOST_MODULE,
        "begin",
        |mut caller: Caller<'_, HostState>, kind: i32| -> wasmtime::Result<()> {
            let kind = node_kind(kind)?;
            caller
                .data_mut()
                .ui
                .begin_container(kind, Attrs::new())
                .map_err(guest_error)?;
            Ok(())
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "leaf",
        |mut caller: Caller<'_, HostState>, kind: i32| -> wasmtime::Result<()> {
            let kind = node_kind(kind)?;
            caller
                .data_mut()
                .ui
                .leaf(kind, Attrs::new())
                .map_err(guest_error)?;
            Ok(())
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "text",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32| -> wasmtime::Result<()> {
            let text = read_str(&mut caller, ptr, len)?;
            caller
                .data_mut()
                .ui
                .leaf(NodeKind::Text, Attrs::new().text(text))
                .map_err(guest_error)?;
            Ok(())
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "end",
        |mut caller: Caller<'_, HostState>| -> wasmtime::Result<()> {
            caller.data_mut().ui.end().map_err(guest_error)
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "set_text",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32| -> wasmtime::Result<()> {
            let text = read_str(&mut caller, ptr, len)?;
            caller
                .data_mut()
                .ui
                .configure_last()
                .map_err(guest_error)?
                .text(text);
            Ok(())
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "set_f32",
        |mut caller: Caller<'_, HostState>, attr: i32, value: f32| -> wasmtime::Result<()> {
            let handle = caller
                .data_mut()
                .ui
                .configure_last()
                .map_err(guest_error)?;
            match attr {
                0 => handle.width(value),
                1 => handle.height(value),
                2 => handle.padding(value),
                3 => handle.margin(value),
                4 => handle.radius(value),
                5 => handle.shadow(value),
                6 => handle.grow(value),
                7 => handle.font_size(value),
                8 => handle.value(value),
                other => {
                    return Err(guest_error(RenderError::logic(format!(
                        "unknown attribute code {}",
                        other
                    ))))
                }
            };
            Ok(())
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "set_color",
        |mut caller: Caller<'_, HostState>,
         slot: i32,
         r: f32,
         g: f32,
         b: f32,
         a: f32|
         -> wasmtime::Result<()> {
            let color = crate::tree::Color::rgba(r, g, b, a);
            let handle = caller
                .data_mut()
                .ui
                .configure_last()
                .map_err(guest_error)?;
            match slot {
                0 => handle.bg(color),
                1 => handle.color(color),
                other => {
                    return Err(guest_error(RenderError::logic(format!(
                        "unknown color slot {}",
                        other
                    ))))
                }
            };
            Ok(())
        },
    )?;

    linker.func_wrap(HOST_MODULE, "width", |caller: Caller<'_, HostState>| -> f32 {
        caller.data().viewport.width
    })?;

    linker.func_wrap(HOST_MODULE, "height", |caller: Caller<'_, HostState>| -> f32 {
        caller.data().viewport.height
    })?;

    linker.func_wrap(HOST_MODULE, "frame", |caller: Caller<'_, HostState>| -> i64 {
        i64::try_from(caller.data().frame).unwrap_or(i64::MAX)
    })?;

    linker.func_wrap(
        HOST_MODULE,
        "state_get",
        |mut caller: Caller<'_, HostState>,
         ptr: i32,
         len: i32,
         default: f64|
         -> wasmtime::Result<f64> {
            let key = read_str(&mut caller, ptr, len)?;
            caller
                .data_mut()
                .state
                .get_or_default(&key, default)
                .map_err(guest_error)
        },
    )?;

    linker.func_wrap(
        HOST_MODULE,
        "state_set",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32, value: f64| -> wasmtime::Result<()> {
            let key = read_str(&mut caller, ptr, len)?;
            caller.data_mut().state.set(key, value);
            Ok(())
        },
    )?;

    Ok(linker)
}
