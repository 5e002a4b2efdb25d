//! Structural rewrite integration tests.
//!
//! These tests drive the rewrites through the public API only:
//! 1. Splice a replacement into a host graph and splice the original back
//! 2. Check which edges a splice preserves and which it retargets
//! 3. Fuse pass-through and deeply nested scopes
//! 4. Run a pass through a `RewriteSession` and inspect its log

use std::sync::Arc;

use dfgraph::{
    merge_scopes, node_path_graph, replace_subgraph, EventKind, FusionConfig, Memlet,
    MergePolicy, Node, NodeId, OrderedMultiGraph, Range, RangeDim, RewriteConfig,
    RewriteSession, Scope, ScopePair, SpliceOutcome, Subgraph,
};
use dfgraph::ir::ScopeNode;

type Labeled = OrderedMultiGraph<&'static str, u32>;

/// Sorted `(source label, target label, payload)` triples of every edge.
fn connectivity(graph: &Labeled) -> Vec<(&'static str, &'static str, u32)> {
    let mut edges: Vec<_> = graph
        .edges()
        .map(|e| {
            (
                *graph.node(e.source).unwrap(),
                *graph.node(e.target).unwrap(),
                *e.data,
            )
        })
        .collect();
    edges.sort_unstable();
    edges
}

/// `x -> a -> b -> y` with a bypass `x -> y`.
fn host() -> (Labeled, [NodeId; 4]) {
    let mut graph = OrderedMultiGraph::new();
    let x = graph.add_node("x");
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let y = graph.add_node("y");
    graph.add_connector_edge(x, Some("o"), a, Some("i"), 1).unwrap();
    graph.add_edge(a, b, 2).unwrap();
    graph.add_connector_edge(b, Some("o"), y, Some("i"), 3).unwrap();
    graph.add_edge(x, y, 4).unwrap();
    (graph, [x, a, b, y])
}

#[test]
fn test_splice_round_trip_restores_connectivity() {
    let (mut graph, [_, a, b, _]) = host();
    let original = connectivity(&graph);

    let old = Subgraph::induced(&graph, [a, b]).unwrap();
    let saved = graph.extract_subgraph(&old).unwrap();

    let mut replacement: Labeled = OrderedMultiGraph::new();
    let p = replacement.add_node("p");
    let q = replacement.add_node("q");
    let r = replacement.add_node("r");
    replacement.add_edge(p, q, 10).unwrap();
    replacement.add_edge(p, r, 11).unwrap();
    replacement.add_edge(q, r, 12).unwrap();

    let outcome = replace_subgraph(&mut graph, &old, replacement).unwrap();
    let map = outcome.node_map().cloned().unwrap();
    assert_ne!(connectivity(&graph), original);

    let spliced = Subgraph::induced(&graph, map.values().copied()).unwrap();
    let back = replace_subgraph(&mut graph, &spliced, saved).unwrap();
    assert!(back.is_applied());

    assert_eq!(connectivity(&graph), original);
    assert!(graph.validate_adjacency().is_ok());
}

#[test]
fn test_splice_preserves_unrelated_edges_and_boundary_connectors() {
    let (mut graph, [x, a, b, y]) = host();
    let bypass = graph.edges_between(x, y).next().unwrap().id;

    let old = Subgraph::induced(&graph, [a, b]).unwrap();
    let outcome = replace_subgraph(&mut graph, &old, node_path_graph(["m"])).unwrap();
    let m = outcome.node_map().unwrap()[&NodeId::new(0)];

    let bypass_edge = graph.edge(bypass).expect("bypass edge untouched");
    assert_eq!(bypass_edge.endpoints(), (x, y));
    assert_eq!(*bypass_edge.data, 4);

    let into_m: Vec<_> = graph.in_edges(m).collect();
    assert_eq!(into_m.len(), 1);
    assert_eq!(into_m[0].source, x);
    assert_eq!((into_m[0].source_conn, into_m[0].target_conn), (Some("o"), Some("i")));
    assert_eq!(*into_m[0].data, 1);

    let out_of_m: Vec<_> = graph.out_edges(m).collect();
    assert_eq!(out_of_m.len(), 1);
    assert_eq!(out_of_m[0].target, y);
    assert_eq!(*out_of_m[0].data, 3);

    assert!(!graph.contains_node(a) && !graph.contains_node(b));
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_rejected_splice_leaves_graph_identical() {
    let (mut graph, [x, a, b, y]) = host();
    let before: Vec<_> = graph
        .edges()
        .map(|e| (e.id, e.source, e.target, *e.data))
        .collect();

    // Without its edges the selection has four sources
    let old = Subgraph::from_parts([x, a, b, y], []);
    let outcome = replace_subgraph(&mut graph, &old, node_path_graph(["m"])).unwrap();
    assert!(matches!(outcome, SpliceOutcome::Rejected { .. }));

    let after: Vec<_> = graph
        .edges()
        .map(|e| (e.id, e.source, e.target, *e.data))
        .collect();
    assert_eq!(before, after);
    assert_eq!(graph.node_count(), 4);
}

fn scope(label: &str, param: &str, end: &str) -> Arc<Scope> {
    Arc::new(Scope::new(
        label,
        [param],
        Range::from_dims([RangeDim::new("0", end)]),
    ))
}

/// Adds a scope pair with one `IN_0`/`OUT_0` connector pair on each side.
fn add_scope(graph: &mut OrderedMultiGraph<Node, Memlet>, scope: &Arc<Scope>) -> ScopePair {
    let entry = graph.add_node(Node::scope_entry(Arc::clone(scope), ["IN_0"], ["OUT_0"]));
    let exit = graph.add_node(Node::scope_exit(Arc::clone(scope), ["IN_0"], ["OUT_0"]));
    ScopePair::new(entry, exit)
}

fn connect(graph: &mut OrderedMultiGraph<Node, Memlet>, from: NodeId, to: NodeId, subset: &str) {
    graph
        .add_connector_edge(from, Some("OUT_0"), to, Some("IN_0"), Memlet::new("A", subset))
        .unwrap();
}

#[test]
fn test_fuse_pass_through_scopes() {
    let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
    let a = graph.add_node(Node::access("A"));
    let outer = add_scope(&mut graph, &scope("outer", "i", "N"));
    let inner = add_scope(&mut graph, &scope("inner", "j", "M"));
    let b = graph.add_node(Node::access("B"));

    graph
        .add_connector_edge(a, None, outer.entry, Some("IN_0"), Memlet::new("A", "0:N, 0:M"))
        .unwrap();
    connect(&mut graph, outer.entry, inner.entry, "i, 0:M");
    connect(&mut graph, inner.entry, inner.exit, "i, j");
    connect(&mut graph, inner.exit, outer.exit, "i, 0:M");
    graph
        .add_connector_edge(outer.exit, Some("OUT_0"), b, None, Memlet::new("A", "0:N, 0:M"))
        .unwrap();

    let merged = merge_scopes(&mut graph, outer, inner, &FusionConfig::default()).unwrap();

    let (_, fused) = graph.node(merged.entry).and_then(|n| n.scope()).unwrap();
    assert_eq!(fused.params(), ["i", "j"]);
    assert_eq!(fused.range().to_string(), "0:N, 0:M");

    let through: Vec<_> = graph.edges_between(merged.entry, merged.exit).collect();
    assert_eq!(through.len(), 1);
    assert_eq!(through[0].source_conn, Some("OUT_0"));
    assert_eq!(through[0].target_conn, Some("IN_0"));

    for removed in [outer.entry, outer.exit, inner.entry, inner.exit] {
        assert!(!graph.contains_node(removed));
    }
    for edge in graph.edges() {
        assert!(graph.contains_node(edge.source) && graph.contains_node(edge.target));
    }
    assert_eq!(graph.node_count(), 4);
    assert!(graph.validate_adjacency().is_ok());
}

#[test]
fn test_fuse_three_levels_in_sequence() {
    let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
    let l1 = add_scope(&mut graph, &scope("a", "i", "N"));
    let l2 = add_scope(&mut graph, &scope("b", "j", "M"));
    let l3 = add_scope(&mut graph, &scope("c", "k", "K"));
    let t = graph.add_node(Node::tasklet("t", "x = x"));

    connect(&mut graph, l1.entry, l2.entry, "i");
    connect(&mut graph, l2.entry, l3.entry, "i, j");
    graph
        .add_connector_edge(l3.entry, Some("OUT_0"), t, Some("x"), Memlet::new("A", "i, j, k"))
        .unwrap();
    graph
        .add_connector_edge(t, Some("x"), l3.exit, Some("IN_0"), Memlet::new("A", "i, j, k"))
        .unwrap();
    connect(&mut graph, l3.exit, l2.exit, "i, j");
    connect(&mut graph, l2.exit, l1.exit, "i");

    let config = FusionConfig::default();
    let first = merge_scopes(&mut graph, l1, l2, &config).unwrap();
    let all = merge_scopes(&mut graph, first, l3, &config).unwrap();

    let (_, fused) = graph.node(all.entry).and_then(|n| n.scope()).unwrap();
    assert_eq!(fused.label(), "_merged__merged_a_b_c");
    assert_eq!(fused.params(), ["i", "j", "k"]);
    assert_eq!(graph.node_count(), 3);

    let into_t: Vec<_> = graph.in_edges(t).collect();
    assert_eq!(into_t.len(), 1);
    assert_eq!(into_t[0].source, all.entry);
    assert_eq!(into_t[0].data.subset, "i, j, k");
    assert_eq!(graph.edges_between(t, all.exit).count(), 1);
}

#[test]
fn test_session_pass_collects_events() {
    let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
    let outer = add_scope(&mut graph, &scope("o", "i", "N"));
    let inner = add_scope(&mut graph, &scope("n", "j", "M"));
    connect(&mut graph, outer.entry, inner.entry, "i");
    connect(&mut graph, inner.entry, inner.exit, "i, j");
    connect(&mut graph, inner.exit, outer.exit, "i");

    let config = RewriteConfig::new()
        .with_verify_acyclic(true)
        .with_fusion(FusionConfig::new().with_policy(
            MergePolicy::new().with_param_merge(|outer, inner| {
                outer.iter().chain(inner).map(|p| p.to_uppercase()).collect()
            }),
        ));
    let mut session = RewriteSession::with_config(&mut graph, config).with_pass("map-fusion");

    // An entry/exit mix-up is a contract violation and gets logged
    let mixed = ScopePair::new(inner.exit, inner.entry);
    assert!(session.merge_scopes(outer, mixed).is_err());
    let merged = session.merge_scopes(outer, inner).unwrap();
    let order = session.topological_order(None).unwrap();
    assert_eq!(order, vec![merged.entry, merged.exit]);

    let events = session.into_events();
    assert_eq!(events.count_kind(EventKind::ScopesMerged), 1);
    assert_eq!(events.errors().count(), 1);
    assert!(events.has(EventKind::OrderComputed));
    assert!(events.iter().all(|e| e.pass.as_deref() == Some("map-fusion")));

    let (_, fused) = graph.node(merged.entry).and_then(|n| n.scope()).unwrap();
    assert_eq!(fused.params(), ["I", "J"]);
}
