//! Single-entry/single-exit subgraph splicing.

use std::{collections::BTreeMap, fmt};

use tracing::{debug, warn};

use crate::{
    graph::{NodeId, OrderedMultiGraph, Subgraph},
    rewrite::redirect::{redirect_incoming, redirect_outgoing},
    Result,
};

/// Translation from replacement-local node ids to host graph ids.
pub type NodeMap = BTreeMap<NodeId, NodeId>;

/// Why a splice was declined.
///
/// Both the selected subgraph and the replacement need exactly one source and one sink,
/// otherwise there is no unambiguous way to reattach the surrounding edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The selected subgraph has this many sources instead of one.
    OldSources(usize),
    /// The selected subgraph has this many sinks instead of one.
    OldSinks(usize),
    /// The replacement has this many sources instead of one.
    NewSources(usize),
    /// The replacement has this many sinks instead of one.
    NewSinks(usize),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (which, what, count) = match self {
            Self::OldSources(n) => ("selected subgraph", "sources", n),
            Self::OldSinks(n) => ("selected subgraph", "sinks", n),
            Self::NewSources(n) => ("replacement", "sources", n),
            Self::NewSinks(n) => ("replacement", "sinks", n),
        };
        write!(f, "{which} has {count} {what}, expected exactly one")
    }
}

/// Result of [`replace_subgraph`].
#[derive(Debug)]
pub enum SpliceOutcome<N, E> {
    /// The replacement was spliced in; maps its local node ids to host ids.
    Applied(NodeMap),
    /// The splice was declined and the host graph is unchanged.
    Rejected {
        /// The failed precondition
        reason: RejectReason,
        /// The unused replacement, handed back to the caller
        replacement: OrderedMultiGraph<N, E>,
    },
}

impl<N, E> SpliceOutcome<N, E> {
    /// Returns `true` if the replacement was spliced in.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, SpliceOutcome::Applied(_))
    }

    /// Returns the node map of an applied splice.
    #[must_use]
    pub fn node_map(&self) -> Option<&NodeMap> {
        match self {
            SpliceOutcome::Applied(map) => Some(map),
            SpliceOutcome::Rejected { .. } => None,
        }
    }
}

/// Replaces the subgraph `old` of `graph` with the standalone graph `new`.
///
/// Both `old` (counted within its own edge set) and `new` must have a unique source and a
/// unique sink. If they do, the splice runs in this order:
///
/// 1. every node and edge of `new` is moved into `graph`;
/// 2. edges entering the old source are redirected onto the new source;
/// 3. edges leaving the old sink are redirected onto the new sink;
/// 4. every node of `old` is removed, together with its remaining edges.
///
/// Redirected edges keep their far endpoint, both connectors and their payload. This is
/// a purely structural splice: nothing checks that the replacement computes the same
/// thing as the selection.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`](crate::Error::NodeNotFound) or
/// [`Error::EdgeNotFound`](crate::Error::EdgeNotFound) if `old` names elements that
/// are not live in `graph`. The graph is unchanged in that case.
///
/// # Returns
///
/// [`SpliceOutcome::Applied`] with the node map on success, or
/// [`SpliceOutcome::Rejected`] with the unused replacement if a uniqueness precondition
/// fails. A rejected splice leaves the graph unchanged.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{node_path_graph, replace_subgraph, OrderedMultiGraph, SpliceOutcome, Subgraph};
///
/// let mut graph: OrderedMultiGraph<&str, ()> = node_path_graph(["in", "a", "b", "out"]);
/// let ids: Vec<_> = graph.node_ids().collect();
/// let old = Subgraph::induced(&graph, [ids[1], ids[2]])?;
///
/// let fused: OrderedMultiGraph<&str, ()> = node_path_graph(["ab"]);
/// let outcome = replace_subgraph(&mut graph, &old, fused)?;
/// assert!(outcome.is_applied());
///
/// let labels: Vec<&str> = graph.nodes().map(|(_, label)| *label).collect();
/// assert_eq!(labels, vec!["in", "out", "ab"]);
/// assert_eq!(graph.edge_count(), 2);
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub fn replace_subgraph<N, E>(
    graph: &mut OrderedMultiGraph<N, E>,
    old: &Subgraph,
    new: OrderedMultiGraph<N, E>,
) -> Result<SpliceOutcome<N, E>> {
    old.validate(graph)?;

    let (old_source, old_sink) = match unique_ends(old.sources(graph), old.sinks(graph)) {
        Ok(ends) => ends,
        Err((sources, sinks)) => {
            let reason = if sources != 1 {
                RejectReason::OldSources(sources)
            } else {
                RejectReason::OldSinks(sinks)
            };
            return Ok(reject(reason, new));
        }
    };

    let new_ends = unique_ends(
        new.entry_nodes().collect(),
        new.exit_nodes().collect(),
    );
    let (new_source, new_sink) = match new_ends {
        Ok(ends) => ends,
        Err((sources, sinks)) => {
            let reason = if sources != 1 {
                RejectReason::NewSources(sources)
            } else {
                RejectReason::NewSinks(sinks)
            };
            return Ok(reject(reason, new));
        }
    };

    let mapping = graph.absorb(new);
    let (Some(&source), Some(&sink)) = (mapping.get(&new_source), mapping.get(&new_sink)) else {
        return Err(malformed_error!("replacement ends missing from node map"));
    };

    redirect_incoming(graph, old_source, source)?;
    redirect_outgoing(graph, old_sink, sink)?;
    graph.remove_nodes(old.nodes().iter().copied())?;

    debug!(
        removed = old.nodes().len(),
        inserted = mapping.len(),
        source = %source,
        sink = %sink,
        "replaced subgraph"
    );
    Ok(SpliceOutcome::Applied(mapping))
}

/// Returns the single source and sink, or the offending counts.
fn unique_ends(
    sources: Vec<NodeId>,
    sinks: Vec<NodeId>,
) -> std::result::Result<(NodeId, NodeId), (usize, usize)> {
    match (sources.as_slice(), sinks.as_slice()) {
        ([source], [sink]) => Ok((*source, *sink)),
        _ => Err((sources.len(), sinks.len())),
    }
}

fn reject<N, E>(reason: RejectReason, replacement: OrderedMultiGraph<N, E>) -> SpliceOutcome<N, E> {
    warn!(%reason, "splice rejected");
    SpliceOutcome::Rejected {
        reason,
        replacement,
    }
}
