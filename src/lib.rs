// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

//! # dfgraph
//!
//! Structural rewriting primitives for data-centric dataflow IRs.
//!
//! A dataflow program is modelled as a directed, multi-edge, connector-typed graph:
//! computation, access and scope nodes connected by edges that carry a data-movement
//! descriptor (a memlet) between named connectors. Compiler passes analyze this graph
//! and rewrite it in place. `dfgraph` provides the pieces those passes are built on:
//!
//! - **[`graph`]** - An arena-backed [`OrderedMultiGraph`] with stable [`NodeId`]/[`EdgeId`]
//!   handles and insertion-ordered iteration, plus the algorithms over it
//!   ([`graph::algorithms`]): predecessor-gated topological DFS, depth-limited search
//!   and cycle diagnostics
//! - **[`rewrite`]** - Edge redirection, single-entry/single-exit subgraph splicing and
//!   nested scope fusion, together with a [`RewriteSession`] that records an [`EventLog`]
//! - **[`ir`]** - A minimal reference node model (access nodes, tasklets, scope
//!   entry/exit pairs with a shared [`Scope`] descriptor) and the [`Memlet`] payload
//!
//! The crate never decides *which* rewrite to apply. It only guarantees that a rewrite,
//! once chosen, keeps the graph structurally consistent: no dangling edges, connector
//! names preserved, and all-or-nothing failure for contract violations.
//!
//! ## Quick Start
//!
//! ```rust
//! use dfgraph::prelude::*;
//!
//! let graph: OrderedMultiGraph<&str, ()> = node_path_graph(["A", "B", "C"]);
//! let order: Vec<NodeId> = topological_dfs(&graph, None).collect();
//! let labels: Vec<&str> = order.iter().map(|&n| *graph.node(n).unwrap()).collect();
//! assert_eq!(labels, vec!["A", "B", "C"]);
//! ```
//!
//! ## Fusing two nested scopes
//!
//! ```rust
//! use std::sync::Arc;
//! use dfgraph::prelude::*;
//!
//! # fn main() -> dfgraph::Result<()> {
//! let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
//! let outer = Arc::new(Scope::new("outer", ["i"], Range::from_dims([RangeDim::new("0", "N")])));
//! let inner = Arc::new(Scope::new("inner", ["j"], Range::from_dims([RangeDim::new("0", "M")])));
//!
//! let a = graph.add_node(Node::access("A"));
//! let b = graph.add_node(Node::access("B"));
//! let oe = graph.add_node(Node::scope_entry(outer.clone(), ["IN_0"], ["OUT_0"]));
//! let ie = graph.add_node(Node::scope_entry(inner.clone(), ["IN_0"], ["OUT_0"]));
//! let ix = graph.add_node(Node::scope_exit(inner, ["IN_0"], ["OUT_0"]));
//! let ox = graph.add_node(Node::scope_exit(outer, ["IN_0"], ["OUT_0"]));
//!
//! graph.add_connector_edge(a, None, oe, Some("IN_0"), Memlet::new("A", "0:N, 0:M"))?;
//! graph.add_connector_edge(oe, Some("OUT_0"), ie, Some("IN_0"), Memlet::new("A", "i, 0:M"))?;
//! graph.add_connector_edge(ie, Some("OUT_0"), ix, Some("IN_0"), Memlet::new("A", "i, j"))?;
//! graph.add_connector_edge(ix, Some("OUT_0"), ox, Some("IN_0"), Memlet::new("B", "i, 0:M"))?;
//! graph.add_connector_edge(ox, Some("OUT_0"), b, None, Memlet::new("B", "0:N, 0:M"))?;
//!
//! let merged = merge_scopes(
//!     &mut graph,
//!     ScopePair::new(oe, ox),
//!     ScopePair::new(ie, ix),
//!     &FusionConfig::default(),
//! )?;
//!
//! let scope = graph.node(merged.entry).and_then(|n| n.scope()).unwrap().1;
//! assert_eq!(scope.params(), ["i", "j"]);
//! assert_eq!(graph.node_count(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Contract violations (unknown handles, malformed connector names, unmatched
//! connectors) are reported through [`Error`] before the graph is touched.
//! Precondition failures that a pass is expected to recover from, such as a
//! replacement subgraph without a unique source, are ordinary outcome values
//! ([`rewrite::SpliceOutcome::Rejected`]).

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types.
///
/// ```rust
/// use dfgraph::prelude::*;
///
/// let mut graph: OrderedMultiGraph<&str, ()> = OrderedMultiGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// graph.add_edge(a, b, ())?;
/// assert_eq!(graph.edge_count(), 1);
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub mod prelude;

/// Arena-backed ordered multigraph and the algorithms that operate on it.
///
/// This module provides the graph ADT consumed by every rewrite:
///
/// - [`graph::OrderedMultiGraph`] - Directed multigraph with optional edge connectors
/// - [`graph::Subgraph`] - A selection of nodes and edges of a host graph
/// - [`graph::algorithms`] - Topological DFS, depth-limited search, cycle detection
pub mod graph;

/// Minimal reference IR node model.
///
/// Provides access nodes, tasklets and scope entry/exit pairs sharing a
/// [`ir::Scope`] descriptor, together with the [`ir::Memlet`] edge payload.
pub mod ir;

/// Structural rewrites over an [`OrderedMultiGraph`].
///
/// - [`rewrite::redirect_incoming`] / [`rewrite::redirect_outgoing`] - Bulk edge redirection
/// - [`rewrite::replace_subgraph`] - Single-entry/single-exit subgraph splicing
/// - [`rewrite::merge_scopes`] - Fusion of two immediately nested scopes
/// - [`rewrite::RewriteSession`] - Configured, event-logging wrapper around the above
pub mod rewrite;

pub use error::Error;

/// `dfgraph` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use graph::{node_path_graph, Edge, EdgeId, EdgeRef, NodeId, OrderedMultiGraph, Subgraph};
pub use ir::{Memlet, Node, Range, RangeDim, ScheduleKind, Scope, ScopeFlags, ScopeSide};
pub use rewrite::{
    merge_scopes, redirect_incoming, redirect_outgoing, replace_subgraph, ConnectorConvention,
    Event, EventKind, EventLog, FusionConfig, MergePolicy, RewriteConfig, RewriteSession,
    ScopePair, SpliceOutcome,
};
