#![no_main]

use std::collections::HashSet;

use dfgraph::{
    graph::algorithms::{find_cycle, topological_dfs},
    redirect_incoming, redirect_outgoing, EdgeId, NodeId, OrderedMultiGraph,
};
use libfuzzer_sys::fuzz_target;

// Every three input bytes are one mutation; handles are picked modulo the ids issued so far,
// so stale handles are exercised as well.
fuzz_target!(|data: &[u8]| {
    let mut graph: OrderedMultiGraph<u8, u8> = OrderedMultiGraph::new();
    let mut nodes_issued = 0usize;
    let mut edges_issued = 0usize;

    for chunk in data.chunks_exact(3) {
        let (op, x, y) = (chunk[0] % 6, chunk[1] as usize, chunk[2] as usize);
        let issued = nodes_issued.max(1);
        let pick = move |v: usize| NodeId::new(v % issued);
        match op {
            0 => {
                graph.add_node(chunk[1]);
                nodes_issued += 1;
            }
            1 => {
                if graph.add_edge(pick(x), pick(y), chunk[2]).is_ok() {
                    edges_issued += 1;
                }
            }
            2 => {
                let _ = graph.remove_node(pick(x));
            }
            3 => {
                let _ = graph.remove_edge(EdgeId::new(x % edges_issued.max(1)));
            }
            4 => {
                if let Ok(moved) = redirect_incoming(&mut graph, pick(x), pick(y)) {
                    edges_issued += moved.len();
                }
            }
            _ => {
                if let Ok(moved) = redirect_outgoing(&mut graph, pick(x), pick(y)) {
                    edges_issued += moved.len();
                }
            }
        }
    }

    assert!(graph.validate_adjacency().is_ok());

    let order: Vec<NodeId> = topological_dfs(&graph, None).collect();
    let unique: HashSet<NodeId> = order.iter().copied().collect();
    assert_eq!(unique.len(), order.len());
    assert_eq!(order.len(), graph.node_count());

    if let Some(cycle) = find_cycle(&graph) {
        assert!(cycle.iter().all(|&n| graph.contains_node(n)));
    }
});
