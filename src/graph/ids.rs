//! Stable handles for nodes and edges of an [`OrderedMultiGraph`](crate::graph::OrderedMultiGraph).
//!
//! Both handles wrap an arena slot index. Slots are allocated monotonically and are never
//! reused after removal, which gives two guarantees the rewrite layer relies on:
//!
//! - A handle to a removed element stays invalid forever; it can never silently alias a
//!   node or edge inserted later.
//! - Ascending handle order is insertion order, so iterating slots in index order is
//!   deterministic for a fixed sequence of mutations.

use std::fmt;

/// A stable identifier for a node within an [`OrderedMultiGraph`](crate::graph::OrderedMultiGraph).
///
/// `NodeId` wraps the index of the node's arena slot. Identifiers are assigned
/// sequentially starting from 0 and are never recycled, so comparing two ids compares
/// their insertion order.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{NodeId, OrderedMultiGraph};
///
/// let mut graph: OrderedMultiGraph<&str, ()> = OrderedMultiGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
///
/// assert!(a < b);
/// assert_eq!(b, NodeId::new(1));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw slot index.
    ///
    /// Intended for tests and for translating ids between graphs; normal code obtains
    /// ids from [`OrderedMultiGraph::add_node`](crate::graph::OrderedMultiGraph::add_node).
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw slot index of this node.
    ///
    /// The index can be used to address per-node side tables sized by
    /// [`GraphBase::node_bound`](crate::graph::GraphBase::node_bound).
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}

/// A stable identifier for an edge within an [`OrderedMultiGraph`](crate::graph::OrderedMultiGraph).
///
/// Parallel edges between the same pair of nodes always have distinct `EdgeId`s, even
/// when they also share connector names. A redirected edge is a *new* edge with a new
/// id; the id of the edge it replaced becomes invalid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates a new `EdgeId` from a raw slot index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw slot index of this edge.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    #[inline]
    fn from(index: usize) -> Self {
        EdgeId(index)
    }
}

impl From<EdgeId> for usize {
    #[inline]
    fn from(edge: EdgeId) -> Self {
        edge.0
    }
}
