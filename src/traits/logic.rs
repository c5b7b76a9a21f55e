// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ReloadError, RenderError};
use crate::state::PersistentState;
use crate::tree::TreeBuilder;
use std::path::Path;

/// Size of the drawing surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Everything a logic unit may touch while it renders one frame.
pub struct FrameContext<'a> {
    pub ui: &'a mut TreeBuilder,
    pub state: &'a mut PersistentState,
    pub viewport: Viewport,
    pub frame: u64,
}

impl FrameContext<'_> {
    pub fn width(&self) -> f32 {
        self.viewport.width
    }

    pub fn height(&self) -> f32 {
        self.viewport.height
    }
}

/// A loaded, executable unit of UI logic.
///
/// `render` describes the whole tree for the current frame through
/// `frame.ui`. Any value that must outlive a reload belongs in `frame.state`;
/// whatever the unit keeps internally is rebuilt on every load.
pub trait RenderLogic {
    fn render(&self, frame: &mut FrameContext<'_>) -> Result<(), RenderError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Turns a logic source file into an executable unit.
pub trait LogicLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn RenderLogic>, ReloadError>;
}

/// Native Rust closure used as a logic unit.
///
/// ```rust
/// use the_ouroboros::traits::{FnLogic, FrameContext};
/// use the_ouroboros::tree::{Attrs, NodeKind, Styled};
///
/// let logic = FnLogic::new(|frame: &mut FrameContext<'_>| {
///     let width = frame.width();
///     frame.ui.leaf(NodeKind::Text, Attrs::new().text("hi"))?.width(width);
///     Ok(())
/// });
/// # let _ = logic;
/// ```
pub struct FnLogic<F>(F);

impl<F> FnLogic<F>
where
    F: Fn(&mut FrameContext<'_>) -> Result<(), RenderError>,
{
    pub fn new(render: F) -> Self {
        Self(render)
    }
}

impl<F> RenderLogic for FnLogic<F>
where
    F: Fn(&mut FrameContext<'_>) -> Result<(), RenderError>,
{
    fn render(&self, frame: &mut FrameContext<'_>) -> Result<(), RenderError> {
        (self.0)(frame)
    }

    fn backend(&self) -> &'static str {
        "native"
    }
}
