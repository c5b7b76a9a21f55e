// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::node::{Attrs, NodeId, NodeKind, Styled, UiNode};
use super::ui_tree::UiTree;
use crate::errors::{RenderError, ScopeViolation};

/// Builds one frame's tree from `begin_container` / `leaf` / `end` calls.
///
/// The builder owns the scope stack explicitly; nothing is global. It also
/// remembers the first protocol violation, so [`TreeBuilder::finish`] reports
/// it even when the caller ignored the error returned at the call site.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<UiNode>,
    stack: Vec<NodeId>,
    max_depth: usize,
    violation: Option<RenderError>,
    /// The node fluent calls may still reach: the latest one, until `end()`.
    configurable: Option<NodeId>,
}

/// Fluent handle to the node created most recently.
///
/// The handle mutably borrows the builder, so the node cannot be configured
/// after the next node is created, `end()` is called or the frame finishes.
#[derive(Debug)]
pub struct NodeHandle<'a> {
    builder: &'a mut TreeBuilder,
    id: NodeId,
}

impl NodeHandle<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.builder.nodes[self.id.0].kind
    }

    pub fn attrs(&self) -> &Attrs {
        &self.builder.nodes[self.id.0].attrs
    }
}

impl Styled for NodeHandle<'_> {
    fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.builder.nodes[self.id.0].attrs
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a container and makes it the insertion parent for later nodes.
    pub fn begin_container(
        &mut self,
        kind: NodeKind,
        attrs: Attrs,
    ) -> Result<NodeHandle<'_>, RenderError> {
        if !kind.is_container() {
            return Err(self.reject(RenderError::KindMismatch {
                kind,
                expected: "container",
            }));
        }
        let id = self.attach(kind, attrs)?;
        self.stack.push(id);
        self.max_depth = self.max_depth.max(self.stack.len());
        Ok(NodeHandle { builder: self, id })
    }

    /// Adds a leaf under the current insertion parent.
    pub fn leaf(&mut self, kind: NodeKind, attrs: Attrs) -> Result<NodeHandle<'_>, RenderError> {
        if kind.is_container() {
            return Err(self.reject(RenderError::KindMismatch {
                kind,
                expected: "leaf",
            }));
        }
        let id = self.attach(kind, attrs)?;
        self.max_depth = self.max_depth.max(self.stack.len() + 1);
        Ok(NodeHandle { builder: self, id })
    }

    /// Closes the innermost open container.
    pub fn end(&mut self) -> Result<(), RenderError> {
        match self.stack.pop() {
            Some(_) => {
                self.configurable = None;
                Ok(())
            }
            None => Err(self.reject(RenderError::UnbalancedScope(ScopeViolation::EmptyPop))),
        }
    }

    /// Opens `kind`, runs `body` inside it and closes it again, so the
    /// begin/end pair is balanced by construction.
    pub fn scoped<F>(&mut self, kind: NodeKind, attrs: Attrs, body: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut TreeBuilder) -> Result<(), RenderError>,
    {
        self.begin_container(kind, attrs)?;
        body(self)?;
        self.end()
    }

    /// Re-acquires the handle of `id`, which is only allowed while it is
    /// still the most recently created node and no `end()` came after it.
    pub fn configure(&mut self, id: NodeId) -> Result<NodeHandle<'_>, RenderError> {
        if self.configurable != Some(id) {
            return Err(RenderError::NodeFinalized(id.0));
        }
        Ok(NodeHandle { builder: self, id })
    }

    /// Handle of the most recently created node, under the same rule as
    /// [`configure`](Self::configure).
    pub fn configure_last(&mut self) -> Result<NodeHandle<'_>, RenderError> {
        let id = self.last_created().ok_or(RenderError::EmptyTree)?;
        self.configure(id)
    }

    pub fn last_created(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(1).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(id.0)
    }

    /// Number of currently open containers.
    pub fn open_scopes(&self) -> usize {
        self.stack.len()
    }

    /// Deepest nesting reached so far, counting the root as level 1.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ends the frame. Fails if any container is still open, if a violation
    /// happened earlier in the frame, or if nothing was built.
    pub fn finish(self) -> Result<UiTree, RenderError> {
        if let Some(violation) = self.violation {
            return Err(violation);
        }
        if !self.stack.is_empty() {
            return Err(RenderError::UnbalancedScope(ScopeViolation::Unclosed {
                open: self.stack.len(),
            }));
        }
        if self.nodes.is_empty() {
            return Err(RenderError::EmptyTree);
        }
        Ok(UiTree::from_nodes(self.nodes))
    }

    fn attach(&mut self, kind: NodeKind, attrs: Attrs) -> Result<NodeId, RenderError> {
        let parent = self.stack.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            return Err(self.reject(RenderError::UnbalancedScope(ScopeViolation::SecondRoot)));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(UiNode::new(kind, attrs));
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.configurable = Some(id);
        Ok(id)
    }

    fn reject(&mut self, error: RenderError) -> RenderError {
        if self.violation.is_none() {
            self.violation = Some(error.clone());
        }
        error
    }
}
