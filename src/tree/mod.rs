//! Parse tree for content-stream tokens.
//!
//! The tree is an arena of nodes addressed by [`NodeId`]. Each node sits in a
//! circular doubly-linked list of its siblings, anchored by a sentinel node
//! owned by the parent, which gives O(1) append, insert-after and unlink.
//! Sentinels are never returned from any public accessor.
//!
//! Primitive nodes hold a [`Bytes`] handle to the buffer they were lexed from
//! plus an `(offset, len)` pair, so building a tree never copies text.
//!
//! ```text
//! ROOT
//!   OPERATOR "q"
//!   WHITESPACE " "
//!   STRING_LITERAL
//!     STRING_LITERAL_OPEN "("
//!     STRING_LITERAL_DATA "abc"
//!     STRING_LITERAL_CLOSE ")"
//! ```
//!
//! Misusing the mutators (adding children to a leaf, constructing a marker
//! kind) is a bug in the caller. The plain mutators panic; the `try_*`
//! variants return [`Error`](crate::error::Error) instead.

mod node;
mod primitives;

pub use node::NodeId;
pub use primitives::{Children, Primitives};

use crate::error::{Error, Result};
use crate::token::TokenKind;
use bytes::Bytes;
use node::{Node, NodeData};
use std::fmt::Write as _;
use std::ops::Range;

/// Arena-backed tree of content-stream tokens.
#[derive(Debug, Clone)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl Default for ParseTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseTree {
    /// Create a tree holding only a root node.
    pub fn new() -> Self {
        let root = NodeId::new(0);
        Self {
            nodes: vec![Node::detached(
                root,
                TokenKind::Root,
                NodeData::Children { sentinel: None },
            )],
        }
    }

    /// Discard every node and start again from a fresh root.
    ///
    /// Ids handed out before the reset must not be used afterwards.
    pub fn clear(&mut self) {
        log::debug!("Clearing parse tree ({} nodes)", self.nodes.len());
        *self = Self::new();
    }

    /// The root node. It has no parent, no text and no siblings.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Number of arena slots in use, sentinels and removed nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Append a primitive node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a primitive node, if `kind` is not a primitive
    /// kind, or if the slice does not fit in `buffer`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: TokenKind,
        buffer: &Bytes,
        offset: usize,
        len: usize,
    ) -> NodeId {
        self.try_add_child(parent, kind, buffer, offset, len)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Fallible form of [`add_child`](Self::add_child).
    pub fn try_add_child(
        &mut self,
        parent: NodeId,
        kind: TokenKind,
        buffer: &Bytes,
        offset: usize,
        len: usize,
    ) -> Result<NodeId> {
        self.check_parent(parent)?;
        let data = Self::text_data(kind, buffer, offset, len)?;
        let id = self.alloc(kind, data);
        self.link_last(parent, id);
        Ok(id)
    }

    /// Append an empty composite node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a primitive node or `kind` is not a composite kind.
    pub fn add_composite(&mut self, parent: NodeId, kind: TokenKind) -> NodeId {
        self.try_add_composite(parent, kind)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Fallible form of [`add_composite`](Self::add_composite).
    pub fn try_add_composite(&mut self, parent: NodeId, kind: TokenKind) -> Result<NodeId> {
        self.check_parent(parent)?;
        if kind.is_marker() {
            return Err(Error::MarkerKind { kind });
        }
        if !kind.is_composite() {
            return Err(Error::KindMismatch {
                expected: "composite",
                found: kind,
            });
        }
        let id = self.alloc(kind, NodeData::Children { sentinel: None });
        self.link_last(parent, id);
        Ok(id)
    }

    /// Create a primitive node and splice it in right after `node`, under
    /// the same parent.
    ///
    /// # Panics
    ///
    /// Panics if `node` has no parent (the root, or a removed node), if `kind`
    /// is not a primitive kind, or if the slice does not fit in `buffer`.
    pub fn add_next(
        &mut self,
        node: NodeId,
        kind: TokenKind,
        buffer: &Bytes,
        offset: usize,
        len: usize,
    ) -> NodeId {
        self.try_add_next(node, kind, buffer, offset, len)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Fallible form of [`add_next`](Self::add_next).
    pub fn try_add_next(
        &mut self,
        node: NodeId,
        kind: TokenKind,
        buffer: &Bytes,
        offset: usize,
        len: usize,
    ) -> Result<NodeId> {
        let parent = self.node(node).parent.ok_or(Error::DetachedNode)?;
        let data = Self::text_data(kind, buffer, offset, len)?;
        let id = self.alloc(kind, data);
        let after = self.node(node).next;
        self.node_mut(id).parent = Some(parent);
        self.node_mut(id).prev = node;
        self.node_mut(id).next = after;
        self.node_mut(node).next = id;
        self.node_mut(after).prev = id;
        Ok(id)
    }

    /// Unlink `node` from its sibling list and return what was its next
    /// sibling.
    ///
    /// The node and its subtree stay in the arena but are no longer reachable
    /// from the root.
    ///
    /// # Panics
    ///
    /// Panics if `node` is the root or was already removed.
    pub fn remove(&mut self, node: NodeId) -> Option<NodeId> {
        if self.node(node).parent.is_none() {
            panic!("{}", Error::DetachedNode);
        }
        let following = self.next(node);
        let prev = self.node(node).prev;
        let next = self.node(node).next;
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
        let removed = self.node_mut(node);
        removed.parent = None;
        removed.prev = node;
        removed.next = node;
        following
    }

    fn check_parent(&self, parent: NodeId) -> Result<()> {
        let kind = self.node(parent).kind;
        if kind.is_primitive() {
            return Err(Error::PrimitiveParent { kind });
        }
        if kind == TokenKind::Sentinel {
            return Err(Error::MarkerKind { kind });
        }
        Ok(())
    }

    fn text_data(kind: TokenKind, buffer: &Bytes, offset: usize, len: usize) -> Result<NodeData> {
        if kind.is_marker() {
            return Err(Error::MarkerKind { kind });
        }
        if !kind.is_primitive() {
            return Err(Error::KindMismatch {
                expected: "primitive",
                found: kind,
            });
        }
        let end = offset.checked_add(len).unwrap_or(usize::MAX);
        if end > buffer.len() {
            return Err(Error::SliceOutOfBounds {
                offset,
                end,
                len: buffer.len(),
            });
        }
        Ok(NodeData::Text {
            buffer: buffer.clone(),
            offset,
            len,
        })
    }

    fn alloc(&mut self, kind: TokenKind, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::detached(id, kind, data));
        id
    }

    /// Sentinel of `parent`'s child list, created on first use.
    fn sentinel(&mut self, parent: NodeId) -> NodeId {
        if let NodeData::Children {
            sentinel: Some(sentinel),
        } = self.node(parent).data
        {
            return sentinel;
        }
        let sentinel = self.alloc(TokenKind::Sentinel, NodeData::Anchor);
        self.node_mut(sentinel).parent = Some(parent);
        self.node_mut(parent).data = NodeData::Children {
            sentinel: Some(sentinel),
        };
        sentinel
    }

    fn link_last(&mut self, parent: NodeId, id: NodeId) {
        let sentinel = self.sentinel(parent);
        let last = self.node(sentinel).prev;
        self.node_mut(id).parent = Some(parent);
        self.node_mut(id).prev = last;
        self.node_mut(id).next = sentinel;
        self.node_mut(last).next = id;
        self.node_mut(sentinel).prev = id;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Kind of `node`.
    #[inline]
    pub fn kind(&self, node: NodeId) -> TokenKind {
        self.node(node).kind
    }

    /// Parent of `node`, or `None` for the root and removed nodes.
    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn child_sentinel(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node).data {
            NodeData::Children { sentinel } => sentinel,
            _ => None,
        }
    }

    /// First child of `node`.
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        let sentinel = self.child_sentinel(node)?;
        let first = self.node(sentinel).next;
        (first != sentinel).then_some(first)
    }

    /// Last child of `node`.
    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        let sentinel = self.child_sentinel(node)?;
        let last = self.node(sentinel).prev;
        (last != sentinel).then_some(last)
    }

    /// Next sibling of `node`; `None` at the end of the list.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        let next = self.node(node).next;
        (next != node && !self.kind(next).is_marker()).then_some(next)
    }

    /// Previous sibling of `node`; `None` at the start of the list.
    pub fn previous(&self, node: NodeId) -> Option<NodeId> {
        let prev = self.node(node).prev;
        (prev != node && !self.kind(prev).is_marker()).then_some(prev)
    }

    /// Direct children of `node`, in order.
    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children::new(self, self.first_child(node))
    }

    /// Number of ancestors between `node` and the root.
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    // ========================================================================
    // Text access
    // ========================================================================

    /// Text of a primitive node; empty for composites and markers.
    #[inline]
    pub fn text(&self, node: NodeId) -> &[u8] {
        self.node(node).text()
    }

    /// Shared buffer a primitive node was lexed from.
    pub fn buffer(&self, node: NodeId) -> Option<&Bytes> {
        match &self.node(node).data {
            NodeData::Text { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Slice bounds of a primitive node within its buffer.
    pub fn span(&self, node: NodeId) -> Option<Range<usize>> {
        match self.node(node).data {
            NodeData::Text { offset, len, .. } => Some(offset..offset + len),
            _ => None,
        }
    }

    /// Content equality against the node's text. Always false for non-leaves.
    pub fn is(&self, node: NodeId, expected: &[u8]) -> bool {
        self.kind(node).is_primitive() && self.text(node) == expected
    }

    /// Like [`is`](Self::is), and the node must be an operator.
    pub fn is_operator(&self, node: NodeId, expected: &[u8]) -> bool {
        self.kind(node) == TokenKind::Operator && self.text(node) == expected
    }

    /// Start offset of the leftmost primitive under `node` (0 if none).
    ///
    /// Offsets are relative to the buffer that primitive was lexed from.
    pub fn start_offset(&self, node: NodeId) -> usize {
        self.first_primitive(node)
            .and_then(|leaf| self.span(leaf))
            .map_or(0, |span| span.start)
    }

    /// End offset of the rightmost primitive under `node` (0 if none).
    pub fn end_offset(&self, node: NodeId) -> usize {
        self.last_primitive(node)
            .and_then(|leaf| self.span(leaf))
            .map_or(0, |span| span.end)
    }

    /// Every primitive under `node`, in document order.
    pub fn primitives(&self, node: NodeId) -> Primitives<'_> {
        Primitives::new(self, node)
    }

    /// Total text length of the primitives under `node`.
    pub fn length(&self, node: NodeId) -> usize {
        self.primitives(node).map(|leaf| self.text(leaf).len()).sum()
    }

    /// Concatenated text of the primitives under `node`.
    pub fn full_text(&self, node: NodeId) -> Vec<u8> {
        let mut text = Vec::with_capacity(self.length(node));
        for leaf in self.primitives(node) {
            text.extend_from_slice(self.text(leaf));
        }
        text
    }

    /// Leftmost primitive in the subtree of `node`, including `node` itself.
    pub(crate) fn first_primitive(&self, node: NodeId) -> Option<NodeId> {
        if self.kind(node).is_primitive() {
            return Some(node);
        }
        let mut current = self.first_child(node)?;
        loop {
            if self.kind(current).is_primitive() {
                return Some(current);
            }
            if let Some(child) = self.first_child(current) {
                current = child;
                continue;
            }
            // Empty composite: move right, climbing no higher than `node`.
            loop {
                if let Some(next) = self.next(current) {
                    current = next;
                    break;
                }
                let parent = self.parent(current)?;
                if parent == node {
                    return None;
                }
                current = parent;
            }
        }
    }

    /// Rightmost primitive in the subtree of `node`, including `node` itself.
    pub(crate) fn last_primitive(&self, node: NodeId) -> Option<NodeId> {
        if self.kind(node).is_primitive() {
            return Some(node);
        }
        let mut current = self.last_child(node)?;
        loop {
            if self.kind(current).is_primitive() {
                return Some(current);
            }
            if let Some(child) = self.last_child(current) {
                current = child;
                continue;
            }
            loop {
                if let Some(previous) = self.previous(current) {
                    current = previous;
                    break;
                }
                let parent = self.parent(current)?;
                if parent == node {
                    return None;
                }
                current = parent;
            }
        }
    }

    // ========================================================================
    // Debugging
    // ========================================================================

    /// Indented dump of the subtree under `node`, one node per line.
    ///
    /// Text is shown with non-printable bytes escaped.
    pub fn dump(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(node, 0, &mut out);
        out
    }

    fn dump_into(&self, node: NodeId, indent: usize, out: &mut String) {
        let kind = self.kind(node);
        let _ = write!(out, "{:width$}{}", "", kind, width = indent * 2);
        if kind.is_primitive() {
            let _ = write!(out, " \"{}\"", self.text(node).escape_ascii());
        }
        out.push('\n');
        for child in self.children(node) {
            self.dump_into(child, indent + 1, out);
        }
    }
}
