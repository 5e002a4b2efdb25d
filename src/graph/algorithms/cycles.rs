//! Cycle detection for directed graphs.
//!
//! Rewrites assume acyclic dataflow states, but the graph ADT itself permits cycles.
//! These functions let a caller check the assumption explicitly, for example before a
//! traversal whose ordering guarantee only holds on DAGs.

use crate::graph::{NodeId, Successors};

/// Visit state of a node during the search.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet discovered
    White,
    /// On the current DFS path
    Grey,
    /// Fully explored
    Black,
}

/// Finds a cycle anywhere in `graph`, if one exists.
///
/// Runs an iterative three-colour depth-first search from every undiscovered node in
/// node order. The first back edge found closes the cycle that is returned.
///
/// # Arguments
///
/// * `graph` - The graph to search for cycles
///
/// # Returns
///
/// `Some(nodes)` listing the nodes of one cycle in walk order, starting at the node the
/// back edge points to; the closing edge leads from the last node back to the first.
/// A self-loop yields a single node. `None` if the graph is acyclic.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
///
/// # Examples
///
/// ```rust
/// use dfgraph::{graph::algorithms::find_cycle, OrderedMultiGraph};
///
/// let mut graph: OrderedMultiGraph<char, ()> = OrderedMultiGraph::new();
/// let a = graph.add_node('A');
/// let b = graph.add_node('B');
/// let c = graph.add_node('C');
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(b, c, ())?;
/// assert!(find_cycle(&graph).is_none());
///
/// graph.add_edge(c, b, ())?;
/// assert_eq!(find_cycle(&graph), Some(vec![b, c]));
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub fn find_cycle<G: Successors>(graph: &G) -> Option<Vec<NodeId>> {
    let mut color = vec![Color::White; graph.node_bound()];
    // Current DFS path: node, its successors, and the resume position
    let mut path: Vec<(NodeId, Vec<NodeId>, usize)> = Vec::new();

    for root in graph.node_ids() {
        if color[root.index()] != Color::White {
            continue;
        }

        color[root.index()] = Color::Grey;
        path.push((root, graph.successors(root).collect(), 0));

        while let Some((node, successors, pos)) = path.last_mut() {
            let node = *node;
            let Some(&next) = successors.get(*pos) else {
                color[node.index()] = Color::Black;
                path.pop();
                continue;
            };
            *pos += 1;

            match color.get(next.index()).copied() {
                Some(Color::White) => {
                    color[next.index()] = Color::Grey;
                    path.push((next, graph.successors(next).collect(), 0));
                }
                Some(Color::Grey) => {
                    let start = path.iter().position(|(n, _, _)| *n == next)?;
                    return Some(path[start..].iter().map(|(n, _, _)| *n).collect());
                }
                _ => {}
            }
        }
    }

    None
}

/// Returns `true` if `graph` contains no cycle.
///
/// Convenience wrapper around [`find_cycle`].
pub fn is_acyclic<G: Successors>(graph: &G) -> bool {
    find_cycle(graph).is_none()
}
