// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fallback tree shown when logic fails.
//!
//! The crash screen is assembled directly on a [`UiTree`] from literal
//! content, so building it cannot fail and never runs user logic.

use crate::errors::ErrorState;
use crate::tree::{Attrs, Color, NodeKind, Styled, UiTree};

pub const BACKGROUND: Color = Color::rgba(0.2, 0.0, 0.0, 1.0);
pub const TITLE_COLOR: Color = Color::rgb(1.0, 0.2, 0.2);
pub const DETAIL_COLOR: Color = Color::rgb(0.9, 0.9, 0.9);

/// Full-bleed dark red column with the error title and its detail text.
pub fn render_error(error: &ErrorState, width: f32, height: f32) -> UiTree {
    let mut tree = UiTree::with_root(
        NodeKind::Column,
        Attrs::new()
            .size(width, height)
            .padding(50.0)
            .bg(BACKGROUND),
    );
    let root = tree.root_id();
    tree.push_child(
        root,
        NodeKind::Text,
        Attrs::new()
            .text(error.title())
            .font_size(40.0)
            .color(TITLE_COLOR),
    );
    tree.push_child(root, NodeKind::Box, Attrs::new().height(20.0));
    tree.push_child(
        root,
        NodeKind::Text,
        Attrs::new()
            .text(error.detail.as_str())
            .font_size(14.0)
            .color(DETAIL_COLOR)
            .grow(1.0),
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RenderError, ScopeViolation};

    #[test]
    fn test_crash_tree_shape() {
        let error = ErrorState::render(&RenderError::UnbalancedScope(
            ScopeViolation::Unclosed { open: 2 },
        ));
        let tree = render_error(&error, 800.0, 600.0);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.root().attrs.width, Some(800.0));
        assert_eq!(tree.root().attrs.bg, Some(BACKGROUND));
        assert_eq!(tree.texts()[0], "Render Error");
        assert!(tree.contains_text("2 unclosed container(s)"));
    }

    #[test]
    fn test_title_follows_origin() {
        let error = ErrorState::reload(&crate::errors::ReloadError::Engine("boom".into()));
        let tree = render_error(&error, 1.0, 1.0);
        assert_eq!(tree.texts(), vec!["Reload Error", "failed to create WASM engine: boom"]);
    }
}
