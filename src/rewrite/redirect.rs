//! Bulk edge redirection.
//!
//! Redirecting moves every edge attached to one node over to another node while keeping
//! the far endpoint, both connector names and the payload. Edges are never edited in
//! place: each old edge is removed and an equivalent edge is inserted, so the redirected
//! edges get fresh [`EdgeId`]s and land at the end of the insertion order.

use tracing::debug;

use crate::{
    graph::{EdgeId, NodeId, OrderedMultiGraph},
    Error, Result,
};

/// Moves every edge entering `from` so that it enters `to` instead.
///
/// Edges are processed in insertion order. For each, the old edge is removed first and
/// then re-inserted with the same source, source connector, target connector and
/// payload, and with `to` as its target. An edge from `from` to itself becomes an edge
/// from `from` to `to`.
///
/// Redirecting a node without incoming edges is a no-op.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if either node is absent. The check happens before any
/// edge is touched.
///
/// # Returns
///
/// The identifiers of the newly inserted edges, in processing order.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{redirect_incoming, OrderedMultiGraph};
///
/// let mut graph: OrderedMultiGraph<&str, u32> = OrderedMultiGraph::new();
/// let a = graph.add_node("A");
/// let old = graph.add_node("old");
/// let new = graph.add_node("new");
/// graph.add_connector_edge(a, Some("OUT_0"), old, Some("IN_0"), 7)?;
///
/// let moved = redirect_incoming(&mut graph, old, new)?;
/// let edge = graph.edge(moved[0]).unwrap();
/// assert_eq!(edge.endpoints(), (a, new));
/// assert_eq!((edge.source_conn, edge.target_conn, *edge.data), (Some("OUT_0"), Some("IN_0"), 7));
/// assert_eq!(graph.in_degree(old), 0);
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub fn redirect_incoming<N, E>(
    graph: &mut OrderedMultiGraph<N, E>,
    from: NodeId,
    to: NodeId,
) -> Result<Vec<EdgeId>> {
    ensure_nodes(graph, from, to)?;

    let edges: Vec<EdgeId> = graph.in_edges(from).map(|edge| edge.id).collect();
    let mut redirected = Vec::with_capacity(edges.len());
    for id in edges {
        let mut edge = graph.remove_edge(id)?;
        edge.target = to;
        redirected.push(graph.insert_edge(edge)?);
    }

    debug!(from = %from, to = %to, count = redirected.len(), "redirected incoming edges");
    Ok(redirected)
}

/// Moves every edge leaving `from` so that it leaves `to` instead.
///
/// The mirror of [`redirect_incoming`]: targets, both connectors and payloads are kept,
/// and `to` becomes the new source.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if either node is absent, before any mutation.
pub fn redirect_outgoing<N, E>(
    graph: &mut OrderedMultiGraph<N, E>,
    from: NodeId,
    to: NodeId,
) -> Result<Vec<EdgeId>> {
    ensure_nodes(graph, from, to)?;

    let edges: Vec<EdgeId> = graph.out_edges(from).map(|edge| edge.id).collect();
    let mut redirected = Vec::with_capacity(edges.len());
    for id in edges {
        let mut edge = graph.remove_edge(id)?;
        edge.source = to;
        redirected.push(graph.insert_edge(edge)?);
    }

    debug!(from = %from, to = %to, count = redirected.len(), "redirected outgoing edges");
    Ok(redirected)
}

fn ensure_nodes<N, E>(graph: &OrderedMultiGraph<N, E>, from: NodeId, to: NodeId) -> Result<()> {
    for node in [from, to] {
        if !graph.contains_node(node) {
            return Err(Error::NodeNotFound(node));
        }
    }
    Ok(())
}
