//! Benchmarks for traversal and rewriting.
//!
//! Measures the hot paths of a rewriting pass:
//! - Topological DFS over long chains, wide fan-in and layered DAGs
//! - Cycle detection on the same inputs
//! - Scope fusion on a wide nest
//! - Subgraph splicing in the middle of a chain

extern crate dfgraph;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dfgraph::{
    graph::algorithms::{find_cycle, topological_dfs},
    merge_scopes, node_path_graph, replace_subgraph, FusionConfig, Memlet, Node, NodeId,
    OrderedMultiGraph, Range, RangeDim, Scope, ScopePair, Subgraph,
};
use std::{hint::black_box, sync::Arc};

/// Build a DAG of `layers` layers with `width` nodes each, fully connected between
/// consecutive layers.
fn layered_dag(layers: usize, width: usize) -> OrderedMultiGraph<usize, ()> {
    let mut graph = OrderedMultiGraph::new();
    let mut previous: Vec<NodeId> = Vec::new();
    for layer in 0..layers {
        let current = graph.add_nodes((0..width).map(|i| layer * width + i));
        for &from in &previous {
            for &to in &current {
                graph.add_edge(from, to, ()).unwrap();
            }
        }
        previous = current;
    }
    graph
}

/// Benchmark topological DFS on a single long chain.
fn bench_topological_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("topological_chain");
    for size in [1_000usize, 10_000, 100_000] {
        let graph: OrderedMultiGraph<usize, ()> = node_path_graph(0..size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| topological_dfs(black_box(graph), None).count());
        });
    }
    group.finish();
}

/// Benchmark topological DFS and cycle detection on dense layered DAGs.
fn bench_layered_dag(c: &mut Criterion) {
    let graph = layered_dag(50, 20);

    c.bench_function("topological_layered_50x20", |b| {
        b.iter(|| topological_dfs(black_box(&graph), None).count());
    });
    c.bench_function("find_cycle_layered_50x20", |b| {
        b.iter(|| black_box(find_cycle(black_box(&graph))));
    });
}

/// Benchmark topological DFS on a star where every source feeds one sink.
fn bench_topological_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("topological_fan_in");
    for size in [1_000usize, 4_000, 16_000] {
        let mut graph: OrderedMultiGraph<usize, ()> = OrderedMultiGraph::new();
        let sources = graph.add_nodes(0..size);
        let sink = graph.add_node(size);
        for &source in &sources {
            graph.add_edge(source, sink, ()).unwrap();
        }
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| topological_dfs(black_box(graph), None).count());
        });
    }
    group.finish();
}

/// Build an outer/inner nest whose boundaries carry `width` connector pairs.
fn wide_nest(width: usize) -> (OrderedMultiGraph<Node, Memlet>, ScopePair, ScopePair) {
    let outer = Arc::new(Scope::new("o", ["i"], Range::from_dims([RangeDim::new("0", "N")])));
    let inner = Arc::new(Scope::new("n", ["j"], Range::from_dims([RangeDim::new("0", "M")])));
    let ins: Vec<String> = (0..width).map(|k| format!("IN_{k}")).collect();
    let outs: Vec<String> = (0..width).map(|k| format!("OUT_{k}")).collect();

    let mut graph = OrderedMultiGraph::new();
    let oe = graph.add_node(Node::scope_entry(Arc::clone(&outer), ins.clone(), outs.clone()));
    let ie = graph.add_node(Node::scope_entry(Arc::clone(&inner), ins.clone(), outs.clone()));
    let ix = graph.add_node(Node::scope_exit(inner, ins.clone(), outs.clone()));
    let ox = graph.add_node(Node::scope_exit(outer, ins.clone(), outs.clone()));

    for k in 0..width {
        let t = graph.add_node(Node::tasklet(format!("t{k}"), ""));
        let (i, o) = (ins[k].as_str(), outs[k].as_str());
        graph
            .add_connector_edge(oe, Some(o), ie, Some(i), Memlet::new("A", "i"))
            .unwrap();
        graph
            .add_connector_edge(ie, Some(o), t, Some("x"), Memlet::new("A", "i, j"))
            .unwrap();
        graph
            .add_connector_edge(t, Some("y"), ix, Some(i), Memlet::new("B", "i, j"))
            .unwrap();
        graph
            .add_connector_edge(ix, Some(o), ox, Some(i), Memlet::new("B", "i"))
            .unwrap();
    }

    (graph, ScopePair::new(oe, ox), ScopePair::new(ie, ix))
}

/// Benchmark fusion of a nest with many connector pairs.
fn bench_merge_scopes(c: &mut Criterion) {
    let config = FusionConfig::default();
    let (graph, outer, inner) = wide_nest(64);

    c.bench_function("merge_scopes_64_connectors", |b| {
        b.iter_batched(
            || graph.clone(),
            |mut graph| {
                let merged = merge_scopes(&mut graph, outer, inner, &config).unwrap();
                black_box(merged)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark splicing a short path into the middle of a long chain.
fn bench_replace_subgraph(c: &mut Criterion) {
    let graph: OrderedMultiGraph<usize, ()> = node_path_graph(0..10_000);
    let middle: Vec<NodeId> = graph.node_ids().skip(4_000).take(2_000).collect();
    let old = Subgraph::induced(&graph, middle).unwrap();

    c.bench_function("replace_subgraph_2000_in_10000", |b| {
        b.iter_batched(
            || (graph.clone(), node_path_graph(0..16)),
            |(mut graph, new)| {
                let outcome = replace_subgraph(&mut graph, &old, new).unwrap();
                black_box(outcome.is_applied())
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_topological_chain,
    bench_topological_fan_in,
    bench_layered_dag,
    bench_merge_scopes,
    bench_replace_subgraph
);
criterion_main!(benches);
