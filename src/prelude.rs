//! # dfgraph Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dfgraph library. Import this module to get quick access to the graph, the
//! reference IR and the rewrites in one line.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dfgraph operations
pub use crate::Error;

/// The result type used throughout dfgraph
pub use crate::Result;

// ================================================================================================
// Graph
// ================================================================================================

/// Graph container, handles and edge records
pub use crate::graph::{Edge, EdgeId, EdgeRef, NodeId, OrderedMultiGraph, Subgraph};

/// Graph capability traits used by the algorithms
pub use crate::graph::{GraphBase, Predecessors, Successors};

/// Path graph constructor
pub use crate::graph::node_path_graph;

// ================================================================================================
// Algorithms
// ================================================================================================

/// Topological ordering
pub use crate::graph::algorithms::{topological_dfs, topological_dfs_filtered};

/// Depth-limited search
pub use crate::graph::algorithms::{best_in_depth, dfs_at_depth, SearchNode};

/// Cycle diagnostics
pub use crate::graph::algorithms::{find_cycle, is_acyclic};

// ================================================================================================
// Reference IR
// ================================================================================================

/// Node model and scope capability
pub use crate::ir::{Node, ScopeNode};

/// Scope descriptors and edge payloads
pub use crate::ir::{Memlet, Range, RangeDim, ScheduleKind, Scope, ScopeFlags, ScopeSide};

// ================================================================================================
// Rewrites
// ================================================================================================

/// Free-standing rewrite operations
pub use crate::rewrite::{merge_scopes, redirect_incoming, redirect_outgoing, replace_subgraph};

/// Rewrite results and fusion inputs
pub use crate::rewrite::{RejectReason, ScopePair, SpliceOutcome};

/// Configuration
pub use crate::rewrite::{ConnectorConvention, FusionConfig, MergePolicy, RewriteConfig};

/// Sessions and their change log
pub use crate::rewrite::{EventKind, EventLog, RewriteSession};
