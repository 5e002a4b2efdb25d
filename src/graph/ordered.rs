//! Arena-backed ordered directed multigraph.
//!
//! This module provides [`OrderedMultiGraph`], the graph ADT every rewrite in this crate
//! operates on. It extends the append-only adjacency-list design used for analysis graphs
//! with removal, which structural rewriting needs:
//!
//! - Nodes and edges live in arena slots addressed by [`NodeId`] / [`EdgeId`]
//! - Removing an element tombstones its slot; handles are never reused
//! - Each node slot owns its incoming and outgoing edge lists, kept in insertion order
//!
//! Iterating slots by ascending index therefore yields nodes and edges in insertion
//! order, which is what makes every traversal over the graph deterministic.

use std::collections::{BTreeMap, HashSet};

use crate::{
    graph::{
        edge::{Edge, EdgeRef},
        ids::{EdgeId, NodeId},
        subgraph::Subgraph,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

/// Per-node arena slot.
#[derive(Debug, Clone)]
struct NodeSlot<N> {
    /// User-provided node payload
    data: N,
    /// Edges leaving this node, in insertion order
    outgoing: Vec<EdgeId>,
    /// Edges entering this node, in insertion order
    incoming: Vec<EdgeId>,
}

/// A directed multigraph with deterministic iteration order and optional edge connectors.
///
/// `OrderedMultiGraph` is the in-memory form of a dataflow state: nodes carry IR payloads
/// (`N`), edges carry data-movement payloads (`E`) and may name a connector on either end.
/// Any number of edges may connect the same ordered pair of nodes; they are told apart by
/// their [`EdgeId`] and, in connector-typed graphs, by their connector names.
///
/// # Ordering
///
/// [`node_ids`](Self::node_ids), [`edges`](Self::edges), [`in_edges`](Self::in_edges) and
/// [`out_edges`](Self::out_edges) all iterate in insertion order. Two graphs built by the
/// same sequence of mutations iterate identically.
///
/// # Removal
///
/// [`remove_node`](Self::remove_node) detaches every incident edge before returning, so
/// adjacency lists never refer to removed elements. [`validate_adjacency`](Self::validate_adjacency)
/// checks this invariant explicitly.
///
/// # Examples
///
/// ```rust
/// use dfgraph::OrderedMultiGraph;
///
/// let mut graph: OrderedMultiGraph<&str, u32> = OrderedMultiGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
///
/// // Two parallel edges, distinguished by connectors
/// graph.add_connector_edge(a, Some("OUT_0"), b, Some("IN_0"), 1)?;
/// graph.add_connector_edge(a, Some("OUT_1"), b, Some("IN_1"), 2)?;
///
/// assert_eq!(graph.edges_between(a, b).count(), 2);
/// assert_eq!(graph.neighbors(a).collect::<Vec<_>>(), vec![b]);
///
/// let removed = graph.remove_node(b)?;
/// assert_eq!(removed, "B");
/// assert_eq!(graph.edge_count(), 0);
/// # Ok::<(), dfgraph::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct OrderedMultiGraph<N, E> {
    /// Node slots; `None` marks a removed node
    nodes: Vec<Option<NodeSlot<N>>>,
    /// Edge slots; `None` marks a removed edge
    edges: Vec<Option<Edge<E>>>,
    /// Number of live nodes
    node_count: usize,
    /// Number of live edges
    edge_count: usize,
}

impl<N, E> Default for OrderedMultiGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> OrderedMultiGraph<N, E> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        OrderedMultiGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_count: 0,
            edge_count: 0,
        }
    }

    /// Creates a new empty graph with pre-allocated slot capacity.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        OrderedMultiGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            node_count: 0,
            edge_count: 0,
        }
    }

    // ─── Nodes ──────────────────────────────────────────────────

    /// Adds a node and returns its identifier.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Some(NodeSlot {
            data,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }));
        self.node_count += 1;
        id
    }

    /// Adds several nodes, returning their identifiers in input order.
    pub fn add_nodes<I>(&mut self, nodes: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = N>,
    {
        nodes.into_iter().map(|data| self.add_node(data)).collect()
    }

    /// Removes a node together with every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `node` is not live.
    pub fn remove_node(&mut self, node: NodeId) -> Result<N> {
        let slot = self
            .nodes
            .get_mut(node.index())
            .and_then(Option::take)
            .ok_or(Error::NodeNotFound(node))?;
        self.node_count -= 1;

        // A self-loop is listed twice; the second lookup finds an empty slot
        for &edge_id in slot.outgoing.iter().chain(slot.incoming.iter()) {
            if let Some(edge) = self.edges[edge_id.index()].take() {
                self.edge_count -= 1;
                self.unlink(edge_id, edge.source, edge.target);
            }
        }

        Ok(slot.data)
    }

    /// Removes several nodes and their incident edges.
    ///
    /// All identifiers are validated before anything is removed; duplicates are removed
    /// once. Payloads are returned in the order of first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] for the first identifier that is not live. The
    /// graph is unchanged in that case.
    pub fn remove_nodes<I>(&mut self, nodes: I) -> Result<Vec<N>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for node in nodes {
            if !self.contains_node(node) {
                return Err(Error::NodeNotFound(node));
            }
            if seen.insert(node) {
                ordered.push(node);
            }
        }

        ordered
            .into_iter()
            .map(|node| self.remove_node(node))
            .collect()
    }

    /// Returns the payload of a node.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.slot(node).map(|slot| &slot.data)
    }

    /// Returns a mutable reference to the payload of a node.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes
            .get_mut(node.index())
            .and_then(Option::as_mut)
            .map(|slot| &mut slot.data)
    }

    /// Returns `true` if `node` refers to a live node.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns `true` if the graph has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Returns an iterator over live node identifiers in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| NodeId::new(i)))
    }

    /// Returns an iterator over live nodes and their payloads in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|slot| (NodeId::new(i), &slot.data)))
    }

    // ─── Edges ──────────────────────────────────────────────────

    /// Adds a plain edge (no connectors) from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either endpoint is not live.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        self.insert_edge(Edge::plain(source, target, data))
    }

    /// Adds an edge between two optional connectors.
    ///
    /// The graph does not check that the connector names are declared on the nodes; that
    /// is a property of the IR, not of the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either endpoint is not live.
    pub fn add_connector_edge(
        &mut self,
        source: NodeId,
        source_conn: Option<&str>,
        target: NodeId,
        target_conn: Option<&str>,
        data: E,
    ) -> Result<EdgeId> {
        self.insert_edge(Edge::with_connectors(
            source,
            source_conn,
            target,
            target_conn,
            data,
        ))
    }

    /// Inserts an owned edge record, taking ownership of its connectors and payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either endpoint is not live.
    pub fn insert_edge(&mut self, edge: Edge<E>) -> Result<EdgeId> {
        if !self.contains_node(edge.source) {
            return Err(Error::NodeNotFound(edge.source));
        }
        if !self.contains_node(edge.target) {
            return Err(Error::NodeNotFound(edge.target));
        }
        Ok(self.link(edge))
    }

    /// Removes an edge and returns its owned record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if `edge` is not live.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<Edge<E>> {
        let record = self
            .edges
            .get_mut(edge.index())
            .and_then(Option::take)
            .ok_or(Error::EdgeNotFound(edge))?;
        self.edge_count -= 1;
        self.unlink(edge, record.source, record.target);
        Ok(record)
    }

    /// Returns a view of a live edge.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<EdgeRef<'_, E>> {
        self.edges
            .get(edge.index())
            .and_then(Option::as_ref)
            .map(|record| EdgeRef::new(edge, record))
    }

    /// Returns a mutable reference to the payload of a live edge.
    pub fn edge_data_mut(&mut self, edge: EdgeId) -> Option<&mut E> {
        self.edges
            .get_mut(edge.index())
            .and_then(Option::as_mut)
            .map(|record| &mut record.data)
    }

    /// Returns `true` if `edge` refers to a live edge.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        matches!(self.edges.get(edge.index()), Some(Some(_)))
    }

    /// Returns the number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns an iterator over live edge identifiers in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| EdgeId::new(i)))
    }

    /// Returns an iterator over all live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|edge| EdgeRef::new(EdgeId::new(i), edge)))
    }

    // ─── Adjacency ──────────────────────────────────────────────

    /// Returns the edges leaving `node`, in insertion order.
    ///
    /// Unknown nodes have no edges.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        let ids = self.slot(node).map_or(&[][..], |slot| slot.outgoing.as_slice());
        ids.iter().filter_map(move |&id| self.edge(id))
    }

    /// Returns the edges entering `node`, in insertion order.
    ///
    /// Unknown nodes have no edges.
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        let ids = self.slot(node).map_or(&[][..], |slot| slot.incoming.as_slice());
        ids.iter().filter_map(move |&id| self.edge(id))
    }

    /// Returns every edge from `source` to `target`, in insertion order.
    pub fn edges_between(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> impl Iterator<Item = EdgeRef<'_, E>> + '_ {
        self.out_edges(source).filter(move |edge| edge.target == target)
    }

    /// Returns the number of edges leaving `node`.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.slot(node).map_or(0, |slot| slot.outgoing.len())
    }

    /// Returns the number of edges entering `node`.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.slot(node).map_or(0, |slot| slot.incoming.len())
    }

    /// Returns the distinct successors of `node`, ordered by their first connecting edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        distinct(self.out_edges(node).map(|edge| edge.target))
    }

    /// Returns the distinct predecessors of `node`, ordered by their first connecting edge.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        distinct(self.in_edges(node).map(|edge| edge.source))
    }

    /// Returns the nodes with no incoming edges, in insertion order.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&node| self.in_degree(node) == 0)
    }

    /// Returns the nodes with no outgoing edges, in insertion order.
    pub fn exit_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&node| self.out_degree(node) == 0)
    }

    // ─── Bulk operations ────────────────────────────────────────

    /// Moves every node and edge of `other` into this graph.
    ///
    /// Nodes and edges keep their relative insertion order. The returned map translates
    /// each node identifier of `other` to its identifier in `self`.
    pub fn absorb(&mut self, other: OrderedMultiGraph<N, E>) -> BTreeMap<NodeId, NodeId> {
        let mut mapping = BTreeMap::new();
        for (index, slot) in other.nodes.into_iter().enumerate() {
            if let Some(slot) = slot {
                mapping.insert(NodeId::new(index), self.add_node(slot.data));
            }
        }

        for edge in other.edges.into_iter().flatten() {
            if let (Some(&source), Some(&target)) =
                (mapping.get(&edge.source), mapping.get(&edge.target))
            {
                self.link(Edge {
                    source,
                    target,
                    ..edge
                });
            }
        }

        mapping
    }

    /// Copies the nodes and edges selected by `subgraph` into a standalone graph.
    ///
    /// Node `i` of the result is the `i`-th node of the selection; edges follow the
    /// selection's edge order.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeNotFound`] / [`Error::EdgeNotFound`] if the selection refers to
    ///   elements that are not live in this graph
    /// - [`Error::Malformed`] if a selected edge has an endpoint outside the selection
    pub fn extract_subgraph(&self, subgraph: &Subgraph) -> Result<OrderedMultiGraph<N, E>>
    where
        N: Clone,
        E: Clone,
    {
        let mut extracted = OrderedMultiGraph::with_capacity(
            subgraph.nodes().len(),
            subgraph.edges().len(),
        );
        let mut mapping = BTreeMap::new();
        for &node in subgraph.nodes() {
            let data = self.node(node).ok_or(Error::NodeNotFound(node))?;
            mapping.insert(node, extracted.add_node(data.clone()));
        }

        for &edge_id in subgraph.edges() {
            let edge = self.edge(edge_id).ok_or(Error::EdgeNotFound(edge_id))?;
            let (Some(&source), Some(&target)) =
                (mapping.get(&edge.source), mapping.get(&edge.target))
            else {
                return Err(malformed_error!(
                    "edge {} leaves the selected subgraph",
                    edge_id
                ));
            };
            extracted.link(Edge::with_connectors(
                source,
                edge.source_conn,
                target,
                edge.target_conn,
                edge.data.clone(),
            ));
        }

        Ok(extracted)
    }

    /// Checks that adjacency lists and edge slots agree.
    ///
    /// Every live edge must be listed exactly once in its source's outgoing list and its
    /// target's incoming list, and no list may mention a removed edge. Rewrites preserve
    /// this invariant; the check exists for tests and debug assertions in passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] describing the first inconsistency found.
    pub fn validate_adjacency(&self) -> Result<()> {
        let mut listed_out = 0;
        let mut listed_in = 0;
        for (node, slot) in self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|slot| (NodeId::new(i), slot)))
        {
            for &edge_id in &slot.outgoing {
                match self.edge(edge_id) {
                    Some(edge) if edge.source == node => listed_out += 1,
                    _ => return Err(malformed_error!("{} lists stale out-edge {}", node, edge_id)),
                }
            }
            for &edge_id in &slot.incoming {
                match self.edge(edge_id) {
                    Some(edge) if edge.target == node => listed_in += 1,
                    _ => return Err(malformed_error!("{} lists stale in-edge {}", node, edge_id)),
                }
            }
        }

        for edge in self.edges() {
            if !self.contains_node(edge.source) || !self.contains_node(edge.target) {
                return Err(malformed_error!("edge {} has a removed endpoint", edge.id));
            }
        }

        if listed_out != self.edge_count || listed_in != self.edge_count {
            return Err(malformed_error!(
                "{} live edges but {} outgoing and {} incoming entries",
                self.edge_count,
                listed_out,
                listed_in
            ));
        }

        Ok(())
    }

    // ─── Internal Helpers ───────────────────────────────────────

    fn slot(&self, node: NodeId) -> Option<&NodeSlot<N>> {
        self.nodes.get(node.index()).and_then(Option::as_ref)
    }

    /// Appends an edge whose endpoints are known to be live.
    pub(crate) fn link(&mut self, edge: Edge<E>) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        let (source, target) = (edge.source, edge.target);
        self.edges.push(Some(edge));
        self.edge_count += 1;

        if let Some(slot) = self.nodes[source.index()].as_mut() {
            slot.outgoing.push(id);
        }
        if let Some(slot) = self.nodes[target.index()].as_mut() {
            slot.incoming.push(id);
        }
        id
    }

    /// Drops `edge` from the adjacency lists of whichever endpoints are still live.
    fn unlink(&mut self, edge: EdgeId, source: NodeId, target: NodeId) {
        if let Some(Some(slot)) = self.nodes.get_mut(source.index()) {
            slot.outgoing.retain(|&id| id != edge);
        }
        if let Some(Some(slot)) = self.nodes.get_mut(target.index()) {
            slot.incoming.retain(|&id| id != edge);
        }
    }
}

/// Yields `nodes` lazily, skipping every repeat of an already yielded node.
fn distinct(nodes: impl Iterator<Item = NodeId>) -> impl Iterator<Item = NodeId> {
    let mut seen = HashSet::new();
    nodes.filter(move |&node| seen.insert(node))
}

impl<N, E> GraphBase for OrderedMultiGraph<N, E> {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        OrderedMultiGraph::node_ids(self)
    }

    fn contains_node(&self, node: NodeId) -> bool {
        OrderedMultiGraph::contains_node(self, node)
    }
}

impl<N, E> Successors for OrderedMultiGraph<N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.neighbors(node)
    }
}

impl<N, E> Predecessors for OrderedMultiGraph<N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        OrderedMultiGraph::predecessors(self, node)
    }
}
