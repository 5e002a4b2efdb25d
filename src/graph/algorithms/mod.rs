//! Graph algorithms used to locate and order rewrite candidates.
//!
//! All algorithms are iterative (explicit stacks, no recursion) and deterministic for a
//! fixed graph and fixed arguments.
//!
//! # Available Algorithms
//!
//! ## Topological Ordering
//!
//! - [`topological_dfs`] - Depth-first order gated on predecessor completeness
//! - [`topological_dfs_filtered`] - The same walk, pruned by a `(parent, child)` condition
//!
//! ## Depth-Limited Search
//!
//! - [`best_in_depth`] - Best-scoring candidate within a depth bound
//! - [`dfs_at_depth`] - Lazy pre-order enumeration within a depth bound
//! - [`SearchNode`] - Capability trait for lazily expanded candidates
//!
//! ## Cycle Detection
//!
//! - [`find_cycle`] - Find a cycle if one exists
//! - [`is_acyclic`] - Check that the graph is a DAG
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | Topological DFS | O(V + E) on DAGs | Producer-before-consumer scope walks |
//! | Depth-limited search | O(b^d) | Optimization exploration |
//! | Cycle detection | O(V + E) | Verifying the acyclicity precondition |
//!
//! # Examples
//!
//! ```rust
//! use dfgraph::graph::{algorithms, node_path_graph, NodeId, OrderedMultiGraph};
//!
//! let graph: OrderedMultiGraph<&str, ()> = node_path_graph(["load", "compute", "store"]);
//! assert!(algorithms::is_acyclic(&graph));
//!
//! let order: Vec<NodeId> = algorithms::topological_dfs(&graph, None).collect();
//! assert_eq!(order, vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]);
//! ```

mod cycles;
mod search;
mod topological;

pub use cycles::{find_cycle, is_acyclic};
pub use search::{best_in_depth, dfs_at_depth, DepthLimitedDfs, SearchNode};
pub use topological::{topological_dfs, topological_dfs_filtered, TopologicalDfs};
