// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::tree::NodeKind;
use std::fmt;
use thiserror::Error;

/// How a frame's container nesting went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeViolation {
    /// `end()` was called with no open container.
    EmptyPop,
    /// The frame finished with containers still open.
    Unclosed { open: usize },
    /// A second node was opened at depth zero after the root.
    SecondRoot,
}

impl fmt::Display for ScopeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeViolation::EmptyPop => write!(f, "end() called with no open container"),
            ScopeViolation::Unclosed { open } => {
                write!(f, "frame ended with {} unclosed container(s)", open)
            }
            ScopeViolation::SecondRoot => {
                write!(f, "only one root node is allowed per frame")
            }
        }
    }
}

/// Persistent state access failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state key '{key}' holds a {stored}, requested {requested}")]
    TypeMismatch {
        key: String,
        stored: &'static str,
        requested: &'static str,
    },
}

/// A failure while running the active logic against the tree builder.
///
/// Every variant is routed to the crash screen for the frame it happens in;
/// the next frame retries the same logic from scratch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("unbalanced scope: {0}")]
    UnbalancedScope(ScopeViolation),

    #[error("logic produced no root node")]
    EmptyTree,

    #[error("{kind} cannot be used as a {expected}")]
    KindMismatch {
        kind: NodeKind,
        expected: &'static str,
    },

    #[error("unknown node kind: {0}")]
    UnknownKind(String),

    /// A fluent call targeted a node that a later call already finalized.
    #[error("node {0} is already finalized and can no longer be configured")]
    NodeFinalized(usize),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("script exceeded its step budget of {limit}")]
    StepLimit { limit: u64 },

    #[error("logic module trapped: {0}")]
    Trap(String),

    #[error("logic panicked: {0}")]
    Panicked(String),

    #[error("no logic unit is loaded")]
    NoLogic,

    #[error("{0}")]
    Logic(String),
}

impl RenderError {
    /// Free-form failure raised by native logic.
    pub fn logic(message: impl Into<String>) -> Self {
        RenderError::Logic(message.into())
    }

    pub fn is_unbalanced_scope(&self) -> bool {
        matches!(self, RenderError::UnbalancedScope(_))
    }
}
