//! Iterators over tree nodes.

use super::{NodeId, ParseTree};
use std::iter::FusedIterator;

/// Lazy, single-pass walk over the primitive descendants of a node.
///
/// Created by [`ParseTree::primitives`]. Composite and marker nodes are
/// never yielded. The walk descends into first children, yields each leaf,
/// then moves to the next sibling, climbing through ancestors when a
/// sibling list runs out, and stops once it climbs back to the start node.
#[derive(Debug, Clone)]
pub struct Primitives<'a> {
    tree: &'a ParseTree,
    scope: NodeId,
    pending: Option<NodeId>,
}

impl<'a> Primitives<'a> {
    pub(super) fn new(tree: &'a ParseTree, scope: NodeId) -> Self {
        Self {
            tree,
            scope,
            pending: tree.first_primitive(scope),
        }
    }

    fn successor(&self, leaf: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        let mut current = leaf;
        loop {
            if current == self.scope {
                return None;
            }
            if let Some(next) = tree.next(current) {
                if let Some(found) = tree.first_primitive(next) {
                    return Some(found);
                }
                // Empty composite, keep going right.
                current = next;
                continue;
            }
            current = tree.parent(current)?;
        }
    }
}

impl Iterator for Primitives<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let leaf = self.pending?;
        self.pending = self.successor(leaf);
        Some(leaf)
    }
}

impl FusedIterator for Primitives<'_> {}

/// Direct children of a node, in order. Created by [`ParseTree::children`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tree: &'a ParseTree,
    pending: Option<NodeId>,
}

impl<'a> Children<'a> {
    pub(super) fn new(tree: &'a ParseTree, first: Option<NodeId>) -> Self {
        Self {
            tree,
            pending: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let child = self.pending?;
        self.pending = self.tree.next(child);
        Some(child)
    }
}

impl FusedIterator for Children<'_> {}
