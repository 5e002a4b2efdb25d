//! Subgraph selections over a host graph.

use std::collections::HashSet;

use crate::{
    graph::{EdgeId, NodeId, OrderedMultiGraph},
    Error, Result,
};

/// A selection of host-graph nodes together with the edges that belong to it.
///
/// A `Subgraph` does not own any data; it names elements of an
/// [`OrderedMultiGraph`]. Sources and sinks are computed against the selection's own
/// edge set, not the host graph, so an edge entering the selection from outside does not
/// make its target a non-source.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{node_path_graph, OrderedMultiGraph, Subgraph};
///
/// let graph: OrderedMultiGraph<&str, ()> = node_path_graph(["A", "B", "C", "D"]);
/// let ids: Vec<_> = graph.node_ids().collect();
///
/// let middle = Subgraph::induced(&graph, [ids[1], ids[2]])?;
/// assert_eq!(middle.edges().len(), 1);
/// assert_eq!(middle.sources(&graph), vec![ids[1]]);
/// assert_eq!(middle.sinks(&graph), vec![ids[2]]);
/// # Ok::<(), dfgraph::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

impl Subgraph {
    /// Selects `nodes` together with every host edge whose endpoints are both selected.
    ///
    /// Nodes keep their first-occurrence order; edges follow host insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if a node is not live in `graph`.
    pub fn induced<N, E, I>(graph: &OrderedMultiGraph<N, E>, nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut members = HashSet::new();
        let mut ordered = Vec::new();
        for node in nodes {
            if !graph.contains_node(node) {
                return Err(Error::NodeNotFound(node));
            }
            if members.insert(node) {
                ordered.push(node);
            }
        }

        let edges = graph
            .edges()
            .filter(|edge| members.contains(&edge.source) && members.contains(&edge.target))
            .map(|edge| edge.id)
            .collect();

        Ok(Subgraph {
            nodes: ordered,
            edges,
        })
    }

    /// Builds a selection from an explicit node list and edge set.
    ///
    /// No validation against a host graph happens here; operations that consume the
    /// selection check it before mutating anything.
    pub fn from_parts<I, J>(nodes: I, edges: J) -> Self
    where
        I: IntoIterator<Item = NodeId>,
        J: IntoIterator<Item = EdgeId>,
    {
        let mut seen = HashSet::new();
        let nodes = nodes.into_iter().filter(|node| seen.insert(*node)).collect();
        let mut seen = HashSet::new();
        let edges = edges.into_iter().filter(|edge| seen.insert(*edge)).collect();
        Subgraph { nodes, edges }
    }

    /// Returns the selected nodes.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns the selected edges.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Returns `true` if `node` is part of the selection.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns the selected nodes that no selected edge enters, in selection order.
    #[must_use]
    pub fn sources<N, E>(&self, graph: &OrderedMultiGraph<N, E>) -> Vec<NodeId> {
        let entered: HashSet<NodeId> = self
            .edges
            .iter()
            .filter_map(|&id| graph.edge(id))
            .map(|edge| edge.target)
            .collect();
        self.nodes
            .iter()
            .copied()
            .filter(|node| !entered.contains(node))
            .collect()
    }

    /// Returns the selected nodes that no selected edge leaves, in selection order.
    #[must_use]
    pub fn sinks<N, E>(&self, graph: &OrderedMultiGraph<N, E>) -> Vec<NodeId> {
        let left: HashSet<NodeId> = self
            .edges
            .iter()
            .filter_map(|&id| graph.edge(id))
            .map(|edge| edge.source)
            .collect();
        self.nodes
            .iter()
            .copied()
            .filter(|node| !left.contains(node))
            .collect()
    }

    /// Checks that every selected node and edge is live in `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] or [`Error::EdgeNotFound`] for the first element
    /// that is not live.
    pub fn validate<N, E>(&self, graph: &OrderedMultiGraph<N, E>) -> Result<()> {
        if let Some(&node) = self.nodes.iter().find(|&&node| !graph.contains_node(node)) {
            return Err(Error::NodeNotFound(node));
        }
        if let Some(&edge) = self.edges.iter().find(|&&edge| !graph.contains_edge(edge)) {
            return Err(Error::EdgeNotFound(edge));
        }
        Ok(())
    }
}
