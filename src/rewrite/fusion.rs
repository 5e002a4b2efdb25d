//! Fusion of two perfectly nested scopes into one.
//!
//! An outer scope `(outer.entry, outer.exit)` immediately encloses an inner scope
//! `(inner.entry, inner.exit)`. Fusion replaces the four boundary nodes with a single
//! merged pair whose descriptor combines both parameter lists and ranges. Data routed
//! through both entries (or both exits) is rewired to pass through the merged node once,
//! pairing connectors by name: an edge reaching the inner entry on `IN_k` continues on the
//! inner entry's `OUT_k` edges, and an edge leaving the inner exit on `OUT_k` is fed by the
//! inner exit's `IN_k` edges.
//!
//! Fusion is all-or-nothing. Every precondition is checked on the unmodified graph, so an
//! error leaves the graph exactly as it was.

use std::{collections::BTreeSet, sync::Arc};

use tracing::debug;

use crate::{
    graph::{Edge, EdgeId, NodeId, OrderedMultiGraph},
    ir::{Scope, ScopeNode, ScopeSide},
    rewrite::{
        config::{ConnectorConvention, FusionConfig},
        redirect::{redirect_incoming, redirect_outgoing},
    },
    Error, Result,
};

/// The entry and exit node of one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopePair {
    /// The scope entry node
    pub entry: NodeId,
    /// The scope exit node
    pub exit: NodeId,
}

impl ScopePair {
    /// Pairs an entry with its exit.
    #[must_use]
    pub fn new(entry: NodeId, exit: NodeId) -> Self {
        ScopePair { entry, exit }
    }
}

/// One `outer.entry -> inner.entry` edge and the inner edges that continue it.
struct EntryRoute {
    boundary: EdgeId,
    continuations: Vec<EdgeId>,
}

/// One `inner.exit -> outer.exit` edge and the inner connector that feeds it.
struct ExitRoute {
    boundary: EdgeId,
    feeder: String,
}

/// Everything fusion needs, computed without touching the graph.
struct FusionPlan {
    merged: Scope,
    entry_connectors: (BTreeSet<String>, BTreeSet<String>),
    exit_connectors: (BTreeSet<String>, BTreeSet<String>),
    entry_routes: Vec<EntryRoute>,
    exit_routes: Vec<ExitRoute>,
}

/// Fuses the scope `inner`, nested immediately inside `outer`, into a single scope.
///
/// The merged descriptor is labelled `_merged_<outer>_<inner>`; its parameters and range
/// come from the configured [`MergePolicy`](crate::rewrite::MergePolicy) and its schedule,
/// flags and debug info are inherited from the outer scope. The merged entry copies the
/// connector sets of the outer entry, and the merged exit those of the outer exit.
///
/// The rewrite proceeds as follows:
///
/// 1. each `outer.entry -> inner.entry` edge arriving on `IN_k` is joined with every
///    inner-entry edge leaving on `OUT_k`: both are removed and an edge from the merged
///    entry (on the boundary edge's source connector) to the inner edge's target (on its
///    target connector, carrying its payload) is added;
/// 2. each `inner.exit -> outer.exit` edge leaving on `OUT_k` is joined with every
///    inner-exit edge arriving on `IN_k`: an edge from that producer (on its source
///    connector, carrying its payload) to the merged exit (on the boundary edge's target
///    connector) replaces them;
/// 3. edges entering the outer entry now enter the merged entry, and edges leaving the
///    outer exit now leave the merged exit;
/// 4. any other edge still attached to one of the four boundary nodes is moved to the
///    merged node on the same side;
/// 5. the four old boundary nodes are removed.
///
/// Step 2 looks up producers on the graph as left by step 1, so a pass-through edge from
/// the inner entry straight to the inner exit ends up as a merged-entry to merged-exit
/// edge.
///
/// # Errors
///
/// Nothing is modified when any of these is returned:
///
/// - [`Error::NodeNotFound`] if one of the four nodes is absent;
/// - [`Error::NotAScopeNode`] if an entry is not a scope entry or an exit is not a scope
///   exit;
/// - [`Error::MissingConnector`] if a boundary edge lacks the connector used for pairing;
/// - [`Error::Malformed`] if a boundary connector lacks the convention's prefix, if the
///   four nodes are not distinct, or if two boundary edges claim the same connector;
/// - [`Error::UnmatchedConnector`] if a boundary connector has no partner edge.
///
/// # Returns
///
/// The merged entry and exit.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dfgraph::prelude::*;
///
/// let outer = Arc::new(Scope::new("outer", ["i"], Range::from_dims([RangeDim::new("0", "N")])));
/// let inner = Arc::new(Scope::new("inner", ["j"], Range::from_dims([RangeDim::new("0", "M")])));
///
/// let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
/// let a = graph.add_node(Node::access("A"));
/// let oe = graph.add_node(Node::scope_entry(Arc::clone(&outer), ["IN_A"], ["OUT_A"]));
/// let ie = graph.add_node(Node::scope_entry(Arc::clone(&inner), ["IN_A"], ["OUT_A"]));
/// let t = graph.add_node(Node::tasklet("t", "b = a"));
/// let ix = graph.add_node(Node::scope_exit(Arc::clone(&inner), ["IN_B"], ["OUT_B"]));
/// let ox = graph.add_node(Node::scope_exit(Arc::clone(&outer), ["IN_B"], ["OUT_B"]));
/// let b = graph.add_node(Node::access("B"));
///
/// graph.add_connector_edge(a, None, oe, Some("IN_A"), Memlet::new("A", "0:N, 0:M"))?;
/// graph.add_connector_edge(oe, Some("OUT_A"), ie, Some("IN_A"), Memlet::new("A", "i, 0:M"))?;
/// graph.add_connector_edge(ie, Some("OUT_A"), t, Some("a"), Memlet::new("A", "i, j"))?;
/// graph.add_connector_edge(t, Some("b"), ix, Some("IN_B"), Memlet::new("B", "i, j"))?;
/// graph.add_connector_edge(ix, Some("OUT_B"), ox, Some("IN_B"), Memlet::new("B", "i, 0:M"))?;
/// graph.add_connector_edge(ox, Some("OUT_B"), b, None, Memlet::new("B", "0:N, 0:M"))?;
///
/// let merged = merge_scopes(
///     &mut graph,
///     ScopePair::new(oe, ox),
///     ScopePair::new(ie, ix),
///     &FusionConfig::default(),
/// )?;
///
/// let (_, scope) = graph.node(merged.entry).and_then(|n| n.scope()).unwrap();
/// assert_eq!(scope.label(), "_merged_outer_inner");
/// assert_eq!(scope.params(), ["i", "j"]);
/// assert_eq!(graph.node_count(), 5);
/// assert_eq!(graph.neighbors(merged.entry).collect::<Vec<_>>(), vec![t]);
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub fn merge_scopes<N, E>(
    graph: &mut OrderedMultiGraph<N, E>,
    outer: ScopePair,
    inner: ScopePair,
    config: &FusionConfig,
) -> Result<ScopePair>
where
    N: ScopeNode,
{
    let plan = plan_fusion(graph, outer, inner, config)?;
    let merged_label = plan.merged.label().to_string();
    let merged_scope = Arc::new(plan.merged);

    let (entry_in, entry_out) = plan.entry_connectors;
    let (exit_in, exit_out) = plan.exit_connectors;
    let merged_entry = graph.add_node(N::new_scope_node(
        ScopeSide::Entry,
        Arc::clone(&merged_scope),
        entry_in,
        entry_out,
    ));
    let merged_exit = graph.add_node(N::new_scope_node(
        ScopeSide::Exit,
        merged_scope,
        exit_in,
        exit_out,
    ));

    // Data entering the nest
    for route in plan.entry_routes {
        let boundary = graph.remove_edge(route.boundary)?;
        for id in route.continuations {
            let continuation = graph.remove_edge(id)?;
            graph.insert_edge(Edge {
                source: merged_entry,
                source_conn: boundary.source_conn.clone(),
                target: continuation.target,
                target_conn: continuation.target_conn,
                data: continuation.data,
            })?;
        }
    }

    // Data leaving the nest, matched against the graph as rewired above
    for route in plan.exit_routes {
        let producers: Vec<EdgeId> = graph
            .in_edges(inner.exit)
            .filter(|edge| edge.target_conn == Some(route.feeder.as_str()))
            .map(|edge| edge.id)
            .collect();
        let boundary = graph.remove_edge(route.boundary)?;
        for id in producers {
            let producer = graph.remove_edge(id)?;
            graph.insert_edge(Edge {
                source: producer.source,
                source_conn: producer.source_conn,
                target: merged_exit,
                target_conn: boundary.target_conn.clone(),
                data: producer.data,
            })?;
        }
    }

    redirect_incoming(graph, outer.entry, merged_entry)?;
    redirect_outgoing(graph, outer.exit, merged_exit)?;

    let mut carried = 0;
    carried += redirect_outgoing(graph, outer.entry, merged_entry)?.len();
    carried += redirect_incoming(graph, inner.entry, merged_entry)?.len();
    carried += redirect_outgoing(graph, inner.entry, merged_entry)?.len();
    carried += redirect_incoming(graph, outer.exit, merged_exit)?.len();
    carried += redirect_incoming(graph, inner.exit, merged_exit)?.len();
    carried += redirect_outgoing(graph, inner.exit, merged_exit)?.len();

    graph.remove_nodes([outer.entry, inner.entry, inner.exit, outer.exit])?;

    debug!(
        scope = %merged_label,
        entry = %merged_entry,
        exit = %merged_exit,
        carried,
        "merged scopes"
    );
    Ok(ScopePair::new(merged_entry, merged_exit))
}

fn plan_fusion<N, E>(
    graph: &OrderedMultiGraph<N, E>,
    outer: ScopePair,
    inner: ScopePair,
    config: &FusionConfig,
) -> Result<FusionPlan>
where
    N: ScopeNode,
{
    let nodes = [outer.entry, inner.entry, inner.exit, outer.exit];
    for node in nodes {
        if !graph.contains_node(node) {
            return Err(Error::NodeNotFound(node));
        }
    }
    if nodes.iter().collect::<BTreeSet<_>>().len() != nodes.len() {
        return Err(malformed_error!(
            "scope boundary nodes must be distinct: outer ({}, {}), inner ({}, {})",
            outer.entry,
            outer.exit,
            inner.entry,
            inner.exit
        ));
    }

    let outer_scope = scope_of(graph, outer.entry, ScopeSide::Entry)?;
    let inner_scope = scope_of(graph, inner.entry, ScopeSide::Entry)?;
    scope_of(graph, outer.exit, ScopeSide::Exit)?;
    scope_of(graph, inner.exit, ScopeSide::Exit)?;

    let conv = &config.connectors;
    let entry_routes = plan_entry_routes(graph, outer, inner, conv)?;
    let exit_routes = plan_exit_routes(graph, outer, inner, conv)?;

    let policy = &config.policy;
    let mut merged = Scope::new(
        format!("_merged_{}_{}", outer_scope.label(), inner_scope.label()),
        policy.merge_params(outer_scope.params(), inner_scope.params()),
        policy.merge_ranges(outer_scope.range(), inner_scope.range()),
    )
    .with_schedule(outer_scope.schedule())
    .with_flags(outer_scope.flags());
    if let Some(info) = outer_scope.debuginfo() {
        merged = merged.with_debuginfo(info.clone());
    }

    Ok(FusionPlan {
        merged,
        entry_connectors: connector_sets(graph, outer.entry),
        exit_connectors: connector_sets(graph, outer.exit),
        entry_routes,
        exit_routes,
    })
}

fn plan_entry_routes<N, E>(
    graph: &OrderedMultiGraph<N, E>,
    outer: ScopePair,
    inner: ScopePair,
    conv: &ConnectorConvention,
) -> Result<Vec<EntryRoute>> {
    let mut claimed = BTreeSet::new();
    let mut routes = Vec::new();

    for edge in graph.edges_between(outer.entry, inner.entry) {
        let connector = edge
            .target_conn
            .ok_or(Error::MissingConnector { edge: edge.id })?;
        let paired = conv.output_for(connector).ok_or_else(|| {
            malformed_error!(
                "connector {} on {} lacks input prefix {}",
                connector,
                inner.entry,
                conv.input_prefix
            )
        })?;
        if !claimed.insert(connector) {
            return Err(malformed_error!(
                "connector {} on {} carries more than one boundary edge",
                connector,
                inner.entry
            ));
        }

        let continuations: Vec<EdgeId> = graph
            .out_edges(inner.entry)
            .filter(|out| out.source_conn == Some(paired.as_str()))
            .map(|out| out.id)
            .collect();
        if continuations.is_empty() {
            return Err(Error::UnmatchedConnector {
                node: inner.entry,
                connector: paired,
            });
        }

        routes.push(EntryRoute {
            boundary: edge.id,
            continuations,
        });
    }

    Ok(routes)
}

fn plan_exit_routes<N, E>(
    graph: &OrderedMultiGraph<N, E>,
    outer: ScopePair,
    inner: ScopePair,
    conv: &ConnectorConvention,
) -> Result<Vec<ExitRoute>> {
    let mut claimed = BTreeSet::new();
    let mut routes = Vec::new();

    for edge in graph.edges_between(inner.exit, outer.exit) {
        let connector = edge
            .source_conn
            .ok_or(Error::MissingConnector { edge: edge.id })?;
        let feeder = conv.input_for(connector).ok_or_else(|| {
            malformed_error!(
                "connector {} on {} lacks output prefix {}",
                connector,
                inner.exit,
                conv.output_prefix
            )
        })?;
        if !claimed.insert(connector) {
            return Err(malformed_error!(
                "connector {} on {} carries more than one boundary edge",
                connector,
                inner.exit
            ));
        }

        // Target connectors survive the entry rewiring, so the unmodified graph answers
        // whether a feeder will exist
        let fed = graph
            .in_edges(inner.exit)
            .any(|input| input.target_conn == Some(feeder.as_str()));
        if !fed {
            return Err(Error::UnmatchedConnector {
                node: inner.exit,
                connector: feeder,
            });
        }

        routes.push(ExitRoute {
            boundary: edge.id,
            feeder,
        });
    }

    Ok(routes)
}

fn scope_of<N: ScopeNode, E>(
    graph: &OrderedMultiGraph<N, E>,
    node: NodeId,
    expected: ScopeSide,
) -> Result<&Arc<Scope>> {
    let data = graph.node(node).ok_or(Error::NodeNotFound(node))?;
    match data.scope() {
        Some((side, scope)) if side == expected => Ok(scope),
        _ => Err(Error::NotAScopeNode { node, expected }),
    }
}

fn connector_sets<N: ScopeNode, E>(
    graph: &OrderedMultiGraph<N, E>,
    node: NodeId,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let data = graph.node(node);
    (
        data.and_then(N::in_connectors)
            .cloned()
            .unwrap_or_default(),
        data.and_then(N::out_connectors)
            .cloned()
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{Memlet, Node, Range, RangeDim, ScheduleKind, ScopeFlags},
        rewrite::config::MergePolicy,
    };

    struct Nest {
        graph: OrderedMultiGraph<Node, Memlet>,
        a: NodeId,
        t: NodeId,
        b: NodeId,
        outer: ScopePair,
        inner: ScopePair,
    }

    fn scopes() -> (Arc<Scope>, Arc<Scope>) {
        let outer = Scope::new("outer", ["i"], Range::from_dims([RangeDim::new("0", "N")]))
            .with_schedule(ScheduleKind::CpuMulticore)
            .with_flags(ScopeFlags::UNROLL);
        let inner = Scope::new("inner", ["j"], Range::from_dims([RangeDim::new("0", "M")]));
        (Arc::new(outer), Arc::new(inner))
    }

    /// `A -> outer.entry -> inner.entry -> T -> inner.exit -> outer.exit -> B`
    fn nest() -> Nest {
        let (outer, inner) = scopes();
        let mut graph = OrderedMultiGraph::new();
        let a = graph.add_node(Node::access("A"));
        let oe = graph.add_node(Node::scope_entry(Arc::clone(&outer), ["IN_A"], ["OUT_A"]));
        let ie = graph.add_node(Node::scope_entry(Arc::clone(&inner), ["IN_A"], ["OUT_A"]));
        let t = graph.add_node(Node::tasklet("t", "b = a"));
        let ix = graph.add_node(Node::scope_exit(Arc::clone(&inner), ["IN_B"], ["OUT_B"]));
        let ox = graph.add_node(Node::scope_exit(outer, ["IN_B"], ["OUT_B"]));
        let b = graph.add_node(Node::access("B"));

        graph
            .add_connector_edge(a, None, oe, Some("IN_A"), Memlet::new("A", "0:N, 0:M"))
            .unwrap();
        graph
            .add_connector_edge(oe, Some("OUT_A"), ie, Some("IN_A"), Memlet::new("A", "i, 0:M"))
            .unwrap();
        graph
            .add_connector_edge(ie, Some("OUT_A"), t, Some("a"), Memlet::new("A", "i, j"))
            .unwrap();
        graph
            .add_connector_edge(t, Some("b"), ix, Some("IN_B"), Memlet::new("B", "i, j"))
            .unwrap();
        graph
            .add_connector_edge(ix, Some("OUT_B"), ox, Some("IN_B"), Memlet::new("B", "i, 0:M"))
            .unwrap();
        graph
            .add_connector_edge(ox, Some("OUT_B"), b, None, Memlet::new("B", "0:N, 0:M"))
            .unwrap();

        Nest {
            graph,
            a,
            t,
            b,
            outer: ScopePair::new(oe, ox),
            inner: ScopePair::new(ie, ix),
        }
    }

    fn merged_scope(graph: &OrderedMultiGraph<Node, Memlet>, node: NodeId) -> Arc<Scope> {
        let (_, scope) = graph.node(node).and_then(|n| n.scope()).unwrap();
        Arc::clone(scope)
    }

    fn snapshot(graph: &OrderedMultiGraph<Node, Memlet>) -> Vec<String> {
        graph
            .edges()
            .map(|e| {
                format!(
                    "{}:{:?}->{}:{:?} {}",
                    e.source, e.source_conn, e.target, e.target_conn, e.data
                )
            })
            .collect()
    }

    #[test]
    fn test_merge_simple_nest() {
        let mut n = nest();
        let merged =
            merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default()).unwrap();

        assert_eq!(n.graph.node_count(), 5);
        assert_eq!(n.graph.edge_count(), 4);
        for old in [n.outer.entry, n.outer.exit, n.inner.entry, n.inner.exit] {
            assert!(!n.graph.contains_node(old));
        }

        let scope = merged_scope(&n.graph, merged.entry);
        assert_eq!(scope.label(), "_merged_outer_inner");
        assert_eq!(scope.params(), ["i", "j"]);
        assert_eq!(scope.range().to_string(), "0:N, 0:M");
        assert_eq!(scope.schedule(), ScheduleKind::CpuMulticore);
        assert_eq!(scope.flags(), ScopeFlags::UNROLL);
        assert!(Arc::ptr_eq(&scope, &merged_scope(&n.graph, merged.exit)));

        // A -> merged.entry keeps the outer memlet
        let into_entry: Vec<_> = n.graph.in_edges(merged.entry).collect();
        assert_eq!(into_entry.len(), 1);
        assert_eq!(into_entry[0].source, n.a);
        assert_eq!(into_entry[0].target_conn, Some("IN_A"));
        assert_eq!(into_entry[0].data.subset, "0:N, 0:M");

        // merged.entry -> T carries the inner memlet on the outer connector
        let to_tasklet: Vec<_> = n.graph.edges_between(merged.entry, n.t).collect();
        assert_eq!(to_tasklet.len(), 1);
        assert_eq!(to_tasklet[0].source_conn, Some("OUT_A"));
        assert_eq!(to_tasklet[0].target_conn, Some("a"));
        assert_eq!(to_tasklet[0].data.subset, "i, j");

        // T -> merged.exit lands on the outer exit's input connector
        let from_tasklet: Vec<_> = n.graph.edges_between(n.t, merged.exit).collect();
        assert_eq!(from_tasklet.len(), 1);
        assert_eq!(from_tasklet[0].source_conn, Some("b"));
        assert_eq!(from_tasklet[0].target_conn, Some("IN_B"));
        assert_eq!(from_tasklet[0].data.subset, "i, j");

        let out_of_exit: Vec<_> = n.graph.edges_between(merged.exit, n.b).collect();
        assert_eq!(out_of_exit.len(), 1);
        assert_eq!(out_of_exit[0].source_conn, Some("OUT_B"));

        let entry = n.graph.node(merged.entry).unwrap();
        assert!(entry.in_connectors().unwrap().contains("IN_A"));
        assert!(entry.out_connectors().unwrap().contains("OUT_A"));
        assert!(n.graph.validate_adjacency().is_ok());
    }

    #[test]
    fn test_merge_fans_out_to_every_consumer() {
        let mut n = nest();
        let t2 = n.graph.add_node(Node::tasklet("t2", "c = a"));
        n.graph
            .add_connector_edge(n.inner.entry, Some("OUT_A"), t2, Some("a"), Memlet::new("A", "i, j"))
            .unwrap();
        n.graph
            .add_connector_edge(t2, Some("c"), n.inner.exit, Some("IN_B"), Memlet::new("B", "i, j"))
            .unwrap();

        let merged =
            merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default()).unwrap();

        let consumers: Vec<NodeId> = n.graph.neighbors(merged.entry).collect();
        assert_eq!(consumers, vec![n.t, t2]);
        let producers: Vec<NodeId> = n.graph.predecessors(merged.exit).collect();
        assert_eq!(producers, vec![n.t, t2]);
    }

    #[test]
    fn test_pass_through_edge_links_merged_nodes() {
        let (outer, inner) = scopes();
        let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
        let oe = graph.add_node(Node::scope_entry(Arc::clone(&outer), ["IN_X"], ["OUT_X"]));
        let ie = graph.add_node(Node::scope_entry(Arc::clone(&inner), ["IN_X"], ["OUT_X"]));
        let ix = graph.add_node(Node::scope_exit(Arc::clone(&inner), ["IN_Y"], ["OUT_Y"]));
        let ox = graph.add_node(Node::scope_exit(outer, ["IN_Y"], ["OUT_Y"]));

        graph
            .add_connector_edge(oe, Some("OUT_X"), ie, Some("IN_X"), Memlet::new("X", "i"))
            .unwrap();
        graph
            .add_connector_edge(ie, Some("OUT_X"), ix, Some("IN_Y"), Memlet::new("X", "i, j"))
            .unwrap();
        graph
            .add_connector_edge(ix, Some("OUT_Y"), ox, Some("IN_Y"), Memlet::new("X", "i"))
            .unwrap();

        let merged = merge_scopes(
            &mut graph,
            ScopePair::new(oe, ox),
            ScopePair::new(ie, ix),
            &FusionConfig::default(),
        )
        .unwrap();

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].endpoints(), (merged.entry, merged.exit));
        assert_eq!(edges[0].source_conn, Some("OUT_X"));
        assert_eq!(edges[0].target_conn, Some("IN_Y"));
        assert_eq!(edges[0].data.subset, "i, j");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_leftover_edges_move_to_merged_nodes() {
        let mut n = nest();
        let init = n.graph.add_node(Node::tasklet("init", ""));
        let side = n.graph.add_node(Node::access("S"));
        // Ordering edge into the inner entry and a side output of the inner exit
        n.graph
            .add_edge(init, n.inner.entry, Memlet::empty())
            .unwrap();
        n.graph
            .add_edge(n.inner.exit, side, Memlet::empty())
            .unwrap();

        let merged =
            merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default()).unwrap();

        assert_eq!(n.graph.edges_between(init, merged.entry).count(), 1);
        assert_eq!(n.graph.edges_between(merged.exit, side).count(), 1);
        assert!(n.graph.validate_adjacency().is_ok());
    }

    #[test]
    fn test_custom_policy_and_connectors() {
        let (outer, inner) = scopes();
        let mut graph: OrderedMultiGraph<Node, Memlet> = OrderedMultiGraph::new();
        let a = graph.add_node(Node::access("A"));
        let oe = graph.add_node(Node::scope_entry(Arc::clone(&outer), ["in_a"], ["out_a"]));
        let ie = graph.add_node(Node::scope_entry(Arc::clone(&inner), ["in_a"], ["out_a"]));
        let ix = graph.add_node(Node::scope_exit(Arc::clone(&inner), Vec::<String>::new(), Vec::<String>::new()));
        let ox = graph.add_node(Node::scope_exit(outer, Vec::<String>::new(), Vec::<String>::new()));
        let t = graph.add_node(Node::tasklet("t", ""));
        graph
            .add_connector_edge(a, None, oe, Some("in_a"), Memlet::new("A", "0:N"))
            .unwrap();
        graph
            .add_connector_edge(oe, Some("out_a"), ie, Some("in_a"), Memlet::new("A", "i"))
            .unwrap();
        graph
            .add_connector_edge(ie, Some("out_a"), t, Some("x"), Memlet::new("A", "i"))
            .unwrap();
        graph.add_edge(t, ix, Memlet::empty()).unwrap();

        let config = FusionConfig::new()
            .with_connectors(ConnectorConvention::new("in_", "out_"))
            .with_policy(
                MergePolicy::new()
                    .with_param_merge(|outer, inner| vec![format!("{}{}", outer[0], inner[0])])
                    .with_range_merge(|outer, _| outer.clone()),
            );
        let merged = merge_scopes(
            &mut graph,
            ScopePair::new(oe, ox),
            ScopePair::new(ie, ix),
            &config,
        )
        .unwrap();

        let scope = merged_scope(&graph, merged.entry);
        assert_eq!(scope.params(), ["ij"]);
        assert_eq!(scope.range().to_string(), "0:N");
        assert_eq!(graph.neighbors(merged.entry).collect::<Vec<_>>(), vec![t]);
        assert_eq!(graph.edges_between(t, merged.exit).count(), 1);
    }

    #[test]
    fn test_unknown_node_is_rejected_untouched() {
        let mut n = nest();
        let before = snapshot(&n.graph);
        let ghost = NodeId::new(99);
        let result = merge_scopes(
            &mut n.graph,
            ScopePair::new(n.outer.entry, ghost),
            n.inner,
            &FusionConfig::default(),
        );
        assert!(matches!(result, Err(Error::NodeNotFound(node)) if node == ghost));
        assert_eq!(snapshot(&n.graph), before);
    }

    #[test]
    fn test_wrong_side_is_rejected() {
        let mut n = nest();
        let swapped = ScopePair::new(n.inner.exit, n.inner.entry);
        let result = merge_scopes(&mut n.graph, n.outer, swapped, &FusionConfig::default());
        assert!(matches!(
            result,
            Err(Error::NotAScopeNode { node, expected: ScopeSide::Entry }) if node == n.inner.exit
        ));

        let not_scope = ScopePair::new(n.outer.entry, n.t);
        let result = merge_scopes(&mut n.graph, not_scope, n.inner, &FusionConfig::default());
        assert!(matches!(
            result,
            Err(Error::NotAScopeNode { expected: ScopeSide::Exit, .. })
        ));
        assert_eq!(n.graph.node_count(), 7);
    }

    #[test]
    fn test_missing_connector_is_rejected() {
        let mut n = nest();
        let edge = n
            .graph
            .add_edge(n.outer.entry, n.inner.entry, Memlet::empty())
            .unwrap();
        let before = snapshot(&n.graph);

        let result = merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default());
        assert!(matches!(result, Err(Error::MissingConnector { edge: e }) if e == edge));
        assert_eq!(snapshot(&n.graph), before);
    }

    #[test]
    fn test_unmatched_connector_is_rejected() {
        let mut n = nest();
        n.graph
            .add_connector_edge(
                n.outer.entry,
                Some("OUT_C"),
                n.inner.entry,
                Some("IN_C"),
                Memlet::new("C", "i"),
            )
            .unwrap();
        let before = snapshot(&n.graph);

        let result = merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default());
        match result {
            Err(Error::UnmatchedConnector { node, connector }) => {
                assert_eq!(node, n.inner.entry);
                assert_eq!(connector, "OUT_C");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(snapshot(&n.graph), before);
    }

    #[test]
    fn test_unmatched_exit_connector_is_rejected() {
        let mut n = nest();
        n.graph
            .add_connector_edge(
                n.inner.exit,
                Some("OUT_D"),
                n.outer.exit,
                Some("IN_D"),
                Memlet::new("D", "i"),
            )
            .unwrap();
        let before = snapshot(&n.graph);
        let nodes_before: Vec<NodeId> = n.graph.node_ids().collect();

        let result = merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default());
        assert!(matches!(
            result,
            Err(Error::UnmatchedConnector { node, ref connector }) if node == n.inner.exit && connector == "IN_D"
        ));
        assert_eq!(snapshot(&n.graph), before);
        assert_eq!(n.graph.node_ids().collect::<Vec<_>>(), nodes_before);
    }

    #[test]
    fn test_prefix_mismatch_is_malformed() {
        let mut n = nest();
        n.graph
            .add_connector_edge(
                n.outer.entry,
                Some("OUT_A"),
                n.inner.entry,
                Some("data"),
                Memlet::new("A", "i"),
            )
            .unwrap();
        let before = snapshot(&n.graph);

        let result = merge_scopes(&mut n.graph, n.outer, n.inner, &FusionConfig::default());
        assert!(matches!(result, Err(Error::Malformed { .. })));
        assert_eq!(snapshot(&n.graph), before);
    }

    #[test]
    fn test_overlapping_pairs_are_malformed() {
        let mut n = nest();
        let result = merge_scopes(&mut n.graph, n.outer, n.outer, &FusionConfig::default());
        assert!(matches!(result, Err(Error::Malformed { .. })));
        assert_eq!(n.graph.node_count(), 7);
    }
}
