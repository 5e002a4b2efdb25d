//! Ordered directed multigraph infrastructure for dataflow IR rewriting.
//!
//! This module provides the graph ADT every rewrite operates on, together with the
//! traversal algorithms passes use to locate rewrite candidates.
//!
//! # Architecture
//!
//! - **Core Types**: [`NodeId`], [`EdgeId`], [`Edge`] / [`EdgeRef`] and
//!   [`OrderedMultiGraph`] provide the fundamental building blocks
//! - **Selections**: [`Subgraph`] names a set of host nodes and edges for splicing
//! - **Algorithms**: predecessor-gated topological traversal, depth-limited search and
//!   cycle detection in [`algorithms`]
//! - **Traits**: [`GraphBase`], [`Successors`] and [`Predecessors`] let algorithms run
//!   over any graph-like view
//!
//! # Design Principles
//!
//! ## Strongly-Typed Identifiers
//!
//! Node and edge identifiers are newtype wrappers over arena slot indices. Slots are
//! tombstoned on removal and never reused, so a stale handle can never alias a newer
//! element.
//!
//! ## Deterministic Order
//!
//! Nodes, edges and per-node adjacency lists iterate in insertion order. Rewrites built
//! on top of the graph are therefore reproducible for a fixed input.
//!
//! ## Connectors Are Optional
//!
//! An edge may name a connector on either endpoint. Plain graphs and connector-typed
//! dataflow graphs share one representation.
//!
//! # Usage Examples
//!
//! ```rust
//! use dfgraph::graph::{algorithms, node_path_graph, NodeId, OrderedMultiGraph};
//!
//! let graph: OrderedMultiGraph<&str, ()> = node_path_graph(["A", "B", "C"]);
//! let a = NodeId::new(0);
//!
//! let order: Vec<&str> = algorithms::topological_dfs(&graph, Some(vec![a]))
//!     .filter_map(|node| graph.node(node).copied())
//!     .collect();
//! assert_eq!(order, vec!["A", "B", "C"]);
//! ```
//!
//! # Thread Safety
//!
//! All types in this module implement [`Send`] and [`Sync`] when their generic
//! parameters do. Mutation requires `&mut`, so no traversal can observe a graph
//! mid-rewrite.

mod edge;
mod ids;
mod ordered;
mod subgraph;
mod traits;

pub mod algorithms;

pub use edge::{Edge, EdgeRef};
pub use ids::{EdgeId, NodeId};
pub use ordered::OrderedMultiGraph;
pub use subgraph::Subgraph;
pub use traits::{GraphBase, Predecessors, Successors};

/// Builds a plain path graph over `nodes`.
///
/// The nodes are added in input order and every consecutive pair is joined by an edge
/// carrying `E::default()`. An empty input yields an empty graph; a single node yields a
/// graph without edges.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{node_path_graph, NodeId, OrderedMultiGraph};
///
/// let graph: OrderedMultiGraph<char, ()> = node_path_graph(['A', 'B', 'C']);
/// let pairs: Vec<(NodeId, NodeId)> = graph.edges().map(|e| e.endpoints()).collect();
///
/// assert_eq!(
///     pairs,
///     vec![
///         (NodeId::new(0), NodeId::new(1)),
///         (NodeId::new(1), NodeId::new(2)),
///     ]
/// );
/// ```
pub fn node_path_graph<N, E, I>(nodes: I) -> OrderedMultiGraph<N, E>
where
    E: Default,
    I: IntoIterator<Item = N>,
{
    let nodes = nodes.into_iter();
    let (lower, _) = nodes.size_hint();
    let mut graph = OrderedMultiGraph::with_capacity(lower, lower.saturating_sub(1));

    let mut previous = None;
    for data in nodes {
        let node = graph.add_node(data);
        if let Some(prev) = previous {
            graph.link(Edge::plain(prev, node, E::default()));
        }
        previous = Some(node);
    }
    graph
}
