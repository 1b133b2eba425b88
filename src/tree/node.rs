//! Arena node storage.

use crate::token::TokenKind;
use bytes::Bytes;
use std::fmt;

/// Handle to a node inside a [`ParseTree`](super::ParseTree).
///
/// Ids are only meaningful for the tree that produced them. They stay valid
/// until the tree is cleared; removing a node unlinks it but keeps its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// # Panics
    ///
    /// Panics if `index` does not fit in a `u32`.
    pub(crate) fn new(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(index) => NodeId(index),
            Err(_) => panic!("Parse tree cannot hold more than {} nodes", u32::MAX),
        }
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a node, one variant per node category.
#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    /// Sentinel anchoring a child list.
    Anchor,
    /// Root or composite: owns a child list, created on first append.
    Children { sentinel: Option<NodeId> },
    /// Primitive: zero-copy slice of a shared buffer.
    Text {
        buffer: Bytes,
        offset: usize,
        len: usize,
    },
}

/// One slot of the arena.
///
/// `prev` and `next` form a circular list through the sentinel of the
/// parent's child list. The root and detached nodes loop onto themselves.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: TokenKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: NodeId,
    pub(crate) next: NodeId,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn detached(id: NodeId, kind: TokenKind, data: NodeData) -> Self {
        Self {
            kind,
            parent: None,
            prev: id,
            next: id,
            data,
        }
    }

    pub(crate) fn text(&self) -> &[u8] {
        match &self.data {
            NodeData::Text {
                buffer,
                offset,
                len,
            } => &buffer[*offset..*offset + *len],
            _ => &[],
        }
    }
}
