// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::node::{Attrs, NodeId, NodeKind, UiNode};
use serde::Serialize;

/// A finished, rooted tree for one frame.
///
/// Nodes are stored in creation order, so the root is always the first node
/// and a parent always precedes its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiTree {
    nodes: Vec<UiNode>,
}

impl UiTree {
    /// Starts a tree from its root node. Used by callers that compose a tree
    /// without going through the scope protocol and cannot fail.
    pub fn with_root(kind: NodeKind, attrs: Attrs) -> Self {
        Self {
            nodes: vec![UiNode::new(kind, attrs)],
        }
    }

    pub(crate) fn from_nodes(nodes: Vec<UiNode>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    /// Appends a child under `parent`. An out-of-range parent attaches to the root.
    pub fn push_child(&mut self, parent: NodeId, kind: NodeKind, attrs: Attrs) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            self.root_id()
        };
        self.nodes.push(UiNode::new(kind, attrs));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &UiNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &UiNode)> + '_ {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |child| (*child, &self.nodes[child.0]))
    }

    /// Pre-order walk yielding `(depth, node)`, the root at depth 1.
    pub fn walk(&self) -> Vec<(usize, &UiNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![(1usize, self.root_id())];
        while let Some((depth, id)) = pending.pop() {
            let node = &self.nodes[id.0];
            out.push((depth, node));
            for child in node.children.iter().rev() {
                pending.push((depth + 1, *child));
            }
        }
        out
    }

    /// Number of levels in the tree; a lone root has depth 1.
    pub fn depth(&self) -> usize {
        self.walk()
            .into_iter()
            .map(|(depth, _)| depth)
            .max()
            .unwrap_or(0)
    }

    /// Text content of every node that carries some, in pre-order.
    pub fn texts(&self) -> Vec<&str> {
        self.walk()
            .into_iter()
            .filter_map(|(_, node)| node.attrs.text.as_deref())
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Styled;

    #[test]
    fn test_push_child_builds_preorder() {
        let mut tree = UiTree::with_root(NodeKind::Column, Attrs::new());
        let row = tree.push_child(tree.root_id(), NodeKind::Row, Attrs::new());
        tree.push_child(row, NodeKind::Text, Attrs::new().text("a"));
        tree.push_child(tree.root_id(), NodeKind::Text, Attrs::new().text("b"));

        let kinds: Vec<NodeKind> = tree.walk().into_iter().map(|(_, n)| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Column, NodeKind::Row, NodeKind::Text, NodeKind::Text]
        );
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.texts(), vec!["a", "b"]);
        assert_eq!(tree.children(tree.root_id()).count(), 2);
    }

    #[test]
    fn test_push_child_with_unknown_parent_attaches_to_root() {
        let mut tree = UiTree::with_root(NodeKind::Column, Attrs::new());
        tree.push_child(NodeId(42), NodeKind::Box, Attrs::new());
        assert_eq!(tree.root().children, vec![NodeId(1)]);
    }
}
