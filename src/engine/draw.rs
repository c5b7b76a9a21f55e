// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::tree::{Color, NodeKind, UiTree};
use serde::Serialize;

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// One primitive the engine would issue to a GPU backend.
///
/// `depth` is the node's nesting level (root is 1), which is enough for a
/// headless run to check structure without doing layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Fill {
        depth: usize,
        kind: NodeKind,
        color: Color,
        radius: f32,
        shadow: f32,
    },
    Text {
        depth: usize,
        text: String,
        size: f32,
        color: Color,
    },
    Image {
        depth: usize,
        source: String,
    },
    Stroke {
        depth: usize,
        points: Vec<(f32, f32)>,
        color: Color,
    },
    Widget {
        depth: usize,
        kind: NodeKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

/// Flattens `tree` in pre-order: a node's background comes before its own
/// content, which comes before its children.
pub fn flatten(tree: &UiTree) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(tree.len());
    for (depth, node) in tree.walk() {
        let attrs = &node.attrs;
        if let Some(color) = attrs.bg {
            commands.push(DrawCommand::Fill {
                depth,
                kind: node.kind,
                color,
                radius: attrs.radius.unwrap_or(0.0),
                shadow: attrs.shadow.unwrap_or(0.0),
            });
        }
        match node.kind {
            NodeKind::Text => commands.push(DrawCommand::Text {
                depth,
                text: attrs.text.clone().unwrap_or_default(),
                size: attrs.font_size.unwrap_or(DEFAULT_FONT_SIZE),
                color: attrs.color.unwrap_or(Color::WHITE),
            }),
            NodeKind::Image => commands.push(DrawCommand::Image {
                depth,
                source: attrs.text.clone().unwrap_or_default(),
            }),
            NodeKind::Path => commands.push(DrawCommand::Stroke {
                depth,
                points: attrs.points.clone(),
                color: attrs.color.unwrap_or(Color::WHITE),
            }),
            NodeKind::Button
            | NodeKind::Slider
            | NodeKind::Toggle
            | NodeKind::TextInput
            | NodeKind::ColorPicker => commands.push(DrawCommand::Widget {
                depth,
                kind: node.kind,
                value: attrs.value,
                label: attrs.text.clone(),
            }),
            NodeKind::Column | NodeKind::Row | NodeKind::Scroll | NodeKind::Box => {}
        }
    }
    commands
}
