//! Trait definitions for graph abstractions.
//!
//! Algorithms in [`crate::graph::algorithms`] are written against these traits rather
//! than against [`OrderedMultiGraph`](crate::graph::OrderedMultiGraph) directly, so that
//! passes can run them over filtered or projected views of the IR.
//!
//! - [`GraphBase`] - Node iteration, membership and the slot bound for side tables
//! - [`Successors`] - Forward adjacency (unique successor nodes)
//! - [`Predecessors`] - Backward adjacency (unique predecessor nodes)
//!
//! Adjacency is reported per *node*, not per edge: parallel edges between the same pair
//! contribute a single neighbour. Iteration order must be deterministic, since the
//! traversal engine promises reproducible output for a fixed graph.

use crate::graph::NodeId;

/// Base trait providing core graph properties.
pub trait GraphBase {
    /// Returns the number of live nodes in the graph.
    fn node_count(&self) -> usize;

    /// Returns an exclusive upper bound on node slot indices.
    ///
    /// Every live node satisfies `node.index() < node_bound()`. Algorithms use this to size
    /// dense per-node tables; removed slots simply stay unused.
    fn node_bound(&self) -> usize;

    /// Returns an iterator over all live node identifiers in insertion order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;

    /// Returns `true` if `node` refers to a live node.
    fn contains_node(&self, node: NodeId) -> bool;
}

/// Trait for graphs that support forward traversal.
pub trait Successors: GraphBase {
    /// Returns the distinct successors of `node`, ordered by their first connecting edge.
    ///
    /// Unknown nodes have no successors.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward traversal.
pub trait Predecessors: GraphBase {
    /// Returns the distinct predecessors of `node`, ordered by their first connecting edge.
    ///
    /// Unknown nodes have no predecessors.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}
