//! Predecessor-gated depth-first topological ordering.
//!
//! Dataflow passes want a topological order that is also depth-first: a scope's body
//! should be visited right after its entry, before unrelated siblings. Kahn's algorithm
//! gives a valid order but interleaves independent branches; a plain DFS stays inside a
//! branch but can reach a node before all of its producers. This module combines the
//! two: the walk is depth-first, and a child is only entered once every predecessor of
//! the child has been visited. Children that are not ready yet are skipped and picked up
//! again later through another parent.
//!
//! # Use Cases
//!
//! - Visiting scope bodies in nesting order
//! - Locating rewrite candidates in producer-before-consumer order
//! - Pruned walks that stop at a boundary (see [`topological_dfs_filtered`])

use crate::graph::{NodeId, Predecessors, Successors};

/// A resumable position in the successor list of one node.
struct Frame {
    node: NodeId,
    successors: Vec<NodeId>,
    pos: usize,
}

/// Lazy iterator produced by [`topological_dfs`] and [`topological_dfs_filtered`].
///
/// The walk keeps an explicit stack of frames instead of recursing, so arbitrarily
/// deep graphs are safe to traverse.
///
/// # Type Parameters
///
/// * `'g` - Lifetime of the graph reference
/// * `G` - Graph type implementing [`Successors`] and [`Predecessors`]
/// * `F` - Pruning condition called as `condition(parent, child)`
pub struct TopologicalDfs<'g, G, F> {
    graph: &'g G,
    condition: F,
    visited: Vec<bool>,
    /// Number of distinct predecessors of each node not yet visited
    pending: Vec<usize>,
    stack: Vec<Frame>,
    /// Explicit start nodes; `None` sweeps the whole graph
    sources: Option<std::vec::IntoIter<NodeId>>,
    /// Node order used by the sweep
    order: Vec<NodeId>,
    cursor: usize,
    progressed: bool,
}

impl<'g, G, F> TopologicalDfs<'g, G, F>
where
    G: Successors + Predecessors,
    F: FnMut(NodeId, NodeId) -> bool,
{
    fn new(graph: &'g G, sources: Option<Vec<NodeId>>, condition: F) -> Self {
        let order = if sources.is_none() {
            graph.node_ids().collect()
        } else {
            Vec::new()
        };

        let mut pending = vec![0; graph.node_bound()];
        for node in graph.node_ids() {
            if let Some(count) = pending.get_mut(node.index()) {
                *count = graph.predecessors(node).count();
            }
        }

        TopologicalDfs {
            graph,
            condition,
            visited: vec![false; graph.node_bound()],
            pending,
            stack: Vec::new(),
            sources: sources.map(Vec::into_iter),
            order,
            cursor: 0,
            progressed: false,
        }
    }

    fn is_visited(&self, node: NodeId) -> bool {
        self.visited.get(node.index()).copied().unwrap_or(false)
    }

    /// Marks `node` visited and releases one pending predecessor of each successor.
    fn mark(&mut self, node: NodeId) {
        match self.visited.get_mut(node.index()) {
            Some(flag) if !*flag => *flag = true,
            _ => return,
        }
        let graph = self.graph;
        for succ in graph.successors(node) {
            if let Some(count) = self.pending.get_mut(succ.index()) {
                *count = count.saturating_sub(1);
            }
        }
    }

    /// Returns `true` once every predecessor of `node` has been visited.
    fn is_ready(&self, node: NodeId) -> bool {
        self.pending.get(node.index()).is_some_and(|&count| count == 0)
    }

    fn push(&mut self, node: NodeId) {
        self.mark(node);
        self.stack.push(Frame {
            node,
            successors: self.graph.successors(node).collect(),
            pos: 0,
        });
    }

    /// Picks the root of the next walk, or `None` once the traversal is complete.
    fn next_start(&mut self) -> Option<NodeId> {
        if let Some(sources) = self.sources.as_mut() {
            for node in sources.by_ref() {
                let live = self.graph.contains_node(node);
                if live && !self.visited.get(node.index()).copied().unwrap_or(false) {
                    return Some(node);
                }
            }
            return None;
        }

        loop {
            while self.cursor < self.order.len() {
                let node = self.order[self.cursor];
                self.cursor += 1;
                if !self.is_visited(node) && self.is_ready(node) {
                    self.progressed = true;
                    return Some(node);
                }
            }

            // A full sweep found no ready node; rescan if the previous one made progress
            self.cursor = 0;
            if std::mem::take(&mut self.progressed) {
                continue;
            }

            // Only a cycle blocks every leftover node; break it at the first one
            let leftover = self
                .order
                .iter()
                .copied()
                .find(|&node| !self.is_visited(node))?;
            self.progressed = true;
            return Some(leftover);
        }
    }
}

impl<G, F> Iterator for TopologicalDfs<'_, G, F>
where
    G: Successors + Predecessors,
    F: FnMut(NodeId, NodeId) -> bool,
{
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                let start = self.next_start()?;
                self.push(start);
                return Some(start);
            };

            if frame.pos >= frame.successors.len() {
                self.stack.pop();
                continue;
            }

            let parent = frame.node;
            let child = frame.successors[frame.pos];
            frame.pos += 1;

            if self.is_visited(child) || !self.is_ready(child) {
                continue;
            }

            if (self.condition)(parent, child) {
                self.push(child);
                return Some(child);
            }
            // Pruned: visited, but neither emitted nor descended
            self.mark(child);
        }
    }
}

/// Returns the nodes of `graph` in depth-first topological order.
///
/// With `sources = Some(..)`, each not-yet-visited source starts a walk in the given
/// order and is emitted unconditionally; only nodes reachable from the sources are
/// produced. With `sources = None` the whole graph is covered: a node becomes a walk root
/// once all of its predecessors have been visited, which makes the order valid across
/// disconnected components too.
///
/// On acyclic input, every emitted node other than an explicit source is preceded by all
/// of its predecessors. Cyclic input is accepted; the order is then unspecified, but
/// every node is emitted at most once and the iterator terminates.
///
/// # Arguments
///
/// * `graph` - The graph to traverse
/// * `sources` - Optional explicit walk roots
///
/// # Complexity
///
/// - Time: O(V + E) for the walk itself. Readiness is a counter lookup, so a node with
///   many predecessors costs nothing extra per parent. With `sources = None`, each
///   additional start sweep adds O(V)
/// - Space: O(V) for the visited set, the pending-predecessor counters and the stack
///
/// # Examples
///
/// ```rust
/// use dfgraph::{graph::algorithms::topological_dfs, OrderedMultiGraph};
///
/// // A -> B -> D, A -> C -> D, with C inserted before B
/// let mut graph: OrderedMultiGraph<&str, ()> = OrderedMultiGraph::new();
/// let a = graph.add_node("A");
/// let c = graph.add_node("C");
/// let b = graph.add_node("B");
/// let d = graph.add_node("D");
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(a, c, ())?;
/// graph.add_edge(b, d, ())?;
/// graph.add_edge(c, d, ())?;
///
/// // D is reached from B first, but must wait for C
/// let order: Vec<_> = topological_dfs(&graph, None).collect();
/// assert_eq!(order, vec![a, b, c, d]);
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub fn topological_dfs<G>(
    graph: &G,
    sources: Option<Vec<NodeId>>,
) -> TopologicalDfs<'_, G, fn(NodeId, NodeId) -> bool>
where
    G: Successors + Predecessors,
{
    let condition: fn(NodeId, NodeId) -> bool = |_, _| true;
    TopologicalDfs::new(graph, sources, condition)
}

/// Like [`topological_dfs`], but prunes the walk with `condition(parent, child)`.
///
/// When the condition returns `false` the child is marked visited but is neither emitted
/// nor descended into. A pruned node still counts as visited for the readiness check, so
/// its dependents can be entered through another parent or, with `sources = None`,
/// become walk roots of their own.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{graph::algorithms::topological_dfs_filtered, node_path_graph, NodeId};
/// use dfgraph::OrderedMultiGraph;
///
/// let graph: OrderedMultiGraph<u8, ()> = node_path_graph(0..4);
/// let stop = NodeId::new(2);
///
/// let order: Vec<_> =
///     topological_dfs_filtered(&graph, Some(vec![NodeId::new(0)]), |_, child| child != stop)
///         .collect();
/// assert_eq!(order, vec![NodeId::new(0), NodeId::new(1)]);
/// ```
pub fn topological_dfs_filtered<G, F>(
    graph: &G,
    sources: Option<Vec<NodeId>>,
    condition: F,
) -> TopologicalDfs<'_, G, F>
where
    G: Successors + Predecessors,
    F: FnMut(NodeId, NodeId) -> bool,
{
    TopologicalDfs::new(graph, sources, condition)
}
