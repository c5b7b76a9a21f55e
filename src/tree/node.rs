// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;

/// Index of a node inside a frame's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The fixed catalog of node kinds the engine knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // containers
    Column,
    Row,
    Scroll,
    // leaves
    Text,
    Box,
    Button,
    Image,
    Path,
    Slider,
    Toggle,
    TextInput,
    ColorPicker,
}

impl NodeKind {
    /// Ordering matches the integer codes used by the WASM host interface.
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Column,
        NodeKind::Row,
        NodeKind::Scroll,
        NodeKind::Text,
        NodeKind::Box,
        NodeKind::Button,
        NodeKind::Image,
        NodeKind::Path,
        NodeKind::Slider,
        NodeKind::Toggle,
        NodeKind::TextInput,
        NodeKind::ColorPicker,
    ];

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Column | NodeKind::Row | NodeKind::Scroll)
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Column => "column",
            NodeKind::Row => "row",
            NodeKind::Scroll => "scroll",
            NodeKind::Text => "text",
            NodeKind::Box => "box",
            NodeKind::Button => "button",
            NodeKind::Image => "image",
            NodeKind::Path => "path",
            NodeKind::Slider => "slider",
            NodeKind::Toggle => "toggle",
            NodeKind::TextInput => "text_input",
            NodeKind::ColorPicker => "color_picker",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// `0xRRGGBB`, fully opaque.
    pub fn from_hex(value: u32) -> Self {
        let channel = |shift: u32| ((value >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |at: usize| {
            u8::from_str_radix(digits.get(at..at + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Cross-axis alignment of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Start,
    Center,
    End,
    Stretch,
}

impl Align {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Align::Start),
            "center" => Some(Align::Center),
            "end" => Some(Align::End),
            "stretch" => Some(Align::Stretch),
            _ => None,
        }
    }
}

/// Easing curve for attribute transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring,
}

impl Easing {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Easing::Linear),
            "ease_in" => Some(Easing::EaseIn),
            "ease_out" => Some(Easing::EaseOut),
            "ease_in_out" => Some(Easing::EaseInOut),
            "spring" => Some(Easing::Spring),
            _ => None,
        }
    }
}

/// How the engine should animate attribute changes on a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

/// Style and content attributes of a node. Unset attributes are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    /// Text content, button label, image source or text-input value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Slider position or toggle state (`0.0`/`1.0`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(f32, f32)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<(f32, f32)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fluent attribute setters shared by [`Attrs`] and node handles.
///
/// Each call overwrites the attribute it names, so the last write wins and
/// the order of calls does not matter otherwise.
pub trait Styled: Sized {
    fn attrs_mut(&mut self) -> &mut Attrs;

    fn width(mut self, value: f32) -> Self {
        self.attrs_mut().width = Some(value);
        self
    }

    fn height(mut self, value: f32) -> Self {
        self.attrs_mut().height = Some(value);
        self
    }

    fn size(self, width: f32, height: f32) -> Self {
        self.width(width).height(height)
    }

    fn padding(mut self, value: f32) -> Self {
        self.attrs_mut().padding = Some(value);
        self
    }

    fn margin(mut self, value: f32) -> Self {
        self.attrs_mut().margin = Some(value);
        self
    }

    fn radius(mut self, value: f32) -> Self {
        self.attrs_mut().radius = Some(value);
        self
    }

    fn shadow(mut self, elevation: f32) -> Self {
        self.attrs_mut().shadow = Some(elevation);
        self
    }

    fn grow(mut self, factor: f32) -> Self {
        self.attrs_mut().grow = Some(factor);
        self
    }

    fn font_size(mut self, value: f32) -> Self {
        self.attrs_mut().font_size = Some(value);
        self
    }

    fn bg(mut self, color: Color) -> Self {
        self.attrs_mut().bg = Some(color);
        self
    }

    fn color(mut self, color: Color) -> Self {
        self.attrs_mut().color = Some(color);
        self
    }

    fn align(mut self, align: Align) -> Self {
        self.attrs_mut().align = Some(align);
        self
    }

    fn clip(mut self, clip: bool) -> Self {
        self.attrs_mut().clip = Some(clip);
        self
    }

    fn transition(mut self, duration_ms: u32, easing: Easing) -> Self {
        self.attrs_mut().transition = Some(Transition {
            duration_ms,
            easing,
        });
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.attrs_mut().text = Some(text.into());
        self
    }

    fn value(mut self, value: f32) -> Self {
        self.attrs_mut().value = Some(value);
        self
    }

    fn range(mut self, min: f32, max: f32) -> Self {
        self.attrs_mut().range = Some((min, max));
        self
    }

    fn points(mut self, points: Vec<(f32, f32)>) -> Self {
        self.attrs_mut().points = points;
        self
    }
}

impl Styled for Attrs {
    fn attrs_mut(&mut self) -> &mut Attrs {
        self
    }
}

/// One node of a frame's tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiNode {
    pub kind: NodeKind,
    pub attrs: Attrs,
    pub children: Vec<NodeId>,
}

impl UiNode {
    pub fn new(kind: NodeKind, attrs: Attrs) -> Self {
        Self {
            kind,
            attrs,
            children: Vec::new(),
        }
    }
}
