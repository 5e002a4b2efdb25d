//! Edge records and borrowed edge views.
//!
//! An edge connects a source node to a target node and carries a payload. Either end may
//! additionally name a *connector*, the attachment point on the node through which the
//! data leaves or enters. Connector-typed dataflow graphs name connectors on their edges
//! and use them to distinguish parallel edges. Plain graphs (paths, control graphs) leave
//! them empty. Both variants share the same representation, so rewrites handle them
//! uniformly: whatever connectors an edge has are carried over verbatim.

use crate::graph::{EdgeId, NodeId};

/// An owned edge record.
///
/// This is what [`OrderedMultiGraph::remove_edge`](crate::graph::OrderedMultiGraph::remove_edge)
/// hands back and what [`OrderedMultiGraph::insert_edge`](crate::graph::OrderedMultiGraph::insert_edge)
/// consumes, which lets rewrites move an edge (and its payload) to new endpoints without
/// copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<E> {
    /// Node the edge originates from
    pub source: NodeId,
    /// Connector on the source node, if any
    pub source_conn: Option<String>,
    /// Node the edge points to
    pub target: NodeId,
    /// Connector on the target node, if any
    pub target_conn: Option<String>,
    /// User-provided edge payload
    pub data: E,
}

impl<E> Edge<E> {
    /// Creates a plain edge without connectors.
    #[must_use]
    pub fn plain(source: NodeId, target: NodeId, data: E) -> Self {
        Edge {
            source,
            source_conn: None,
            target,
            target_conn: None,
            data,
        }
    }

    /// Creates an edge between two (optional) connectors.
    #[must_use]
    pub fn with_connectors(
        source: NodeId,
        source_conn: Option<&str>,
        target: NodeId,
        target_conn: Option<&str>,
        data: E,
    ) -> Self {
        Edge {
            source,
            source_conn: source_conn.map(str::to_string),
            target,
            target_conn: target_conn.map(str::to_string),
            data,
        }
    }

    /// Returns `true` if either end of the edge names a connector.
    #[must_use]
    pub fn has_connectors(&self) -> bool {
        self.source_conn.is_some() || self.target_conn.is_some()
    }
}

/// A borrowed view of a live edge.
///
/// Returned by the graph's edge iterators. The view is `Copy` and borrows the graph
/// immutably, so it cannot outlive a mutation.
#[derive(Debug)]
pub struct EdgeRef<'g, E> {
    /// Identifier of the edge
    pub id: EdgeId,
    /// Node the edge originates from
    pub source: NodeId,
    /// Connector on the source node, if any
    pub source_conn: Option<&'g str>,
    /// Node the edge points to
    pub target: NodeId,
    /// Connector on the target node, if any
    pub target_conn: Option<&'g str>,
    /// The edge payload
    pub data: &'g E,
}

impl<E> Clone for EdgeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeRef<'_, E> {}

impl<'g, E> EdgeRef<'g, E> {
    pub(crate) fn new(id: EdgeId, edge: &'g Edge<E>) -> Self {
        EdgeRef {
            id,
            source: edge.source,
            source_conn: edge.source_conn.as_deref(),
            target: edge.target,
            target_conn: edge.target_conn.as_deref(),
            data: &edge.data,
        }
    }

    /// Returns the `(source, target)` node pair.
    #[must_use]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    /// Returns `true` if either end of the edge names a connector.
    #[must_use]
    pub fn has_connectors(&self) -> bool {
        self.source_conn.is_some() || self.target_conn.is_some()
    }
}
