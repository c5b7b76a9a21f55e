// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Immediate-mode UI tree and the stack-based protocol that builds it.
//!
//! A [`TreeBuilder`] lives for exactly one frame. Logic opens containers with
//! [`TreeBuilder::begin_container`], adds leaves with [`TreeBuilder::leaf`] and
//! closes containers with [`TreeBuilder::end`]. [`TreeBuilder::finish`] checks
//! that the scope stack is empty and hands back the finished [`UiTree`].
//!
//! ```rust
//! use the_ouroboros::tree::{Attrs, Color, NodeKind, Styled, TreeBuilder};
//!
//! let mut ui = TreeBuilder::new();
//! ui.begin_container(NodeKind::Column, Attrs::new())?
//!     .padding(20.0)
//!     .bg(Color::rgb(0.06, 0.06, 0.08));
//! ui.leaf(NodeKind::Text, Attrs::new().text("hello"))?.font_size(24.0);
//! ui.end()?;
//!
//! let tree = ui.finish()?;
//! assert_eq!(tree.len(), 2);
//! # Ok::<(), the_ouroboros::errors::RenderError>(())
//! ```

mod builder;
mod node;
mod ui_tree;

pub use builder::{NodeHandle, TreeBuilder};
pub use node::{Align, Attrs, Color, Easing, NodeId, NodeKind, Styled, Transition, UiNode};
pub use ui_tree::UiTree;
