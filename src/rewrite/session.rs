//! Configured rewrite sessions with an event log.

use tracing::warn;

use crate::{
    graph::{
        algorithms::{find_cycle, topological_dfs},
        EdgeId, NodeId, OrderedMultiGraph, Subgraph,
    },
    ir::ScopeNode,
    rewrite::{
        config::RewriteConfig,
        events::{EventBuilder, EventKind, EventLog},
        fusion::{self, ScopePair},
        redirect,
        replace::{self, SpliceOutcome},
    },
    Error, Result,
};

/// A pass's handle for rewriting one graph.
///
/// The session borrows the graph mutably for its lifetime, applies rewrites with the
/// configured settings and records every outcome in an [`EventLog`]: applied rewrites as
/// transformation events, declined splices as warnings and contract violations as errors.
/// Return values are exactly those of the free functions in [`crate::rewrite`].
///
/// # Examples
///
/// ```rust
/// use dfgraph::{node_path_graph, EventKind, OrderedMultiGraph, RewriteSession, Subgraph};
///
/// let mut graph: OrderedMultiGraph<&str, ()> = node_path_graph(["in", "a", "out"]);
/// let ids: Vec<_> = graph.node_ids().collect();
///
/// let mut session = RewriteSession::new(&mut graph).with_pass("inline");
/// let old = Subgraph::induced(session.graph(), [ids[1]])?;
/// session.replace_subgraph(&old, node_path_graph(["b", "c"]))?;
///
/// let order = session.topological_order(None)?;
/// assert_eq!(order.len(), 4);
///
/// let events = session.into_events();
/// assert!(events.has(EventKind::SubgraphReplaced));
/// assert_eq!(events.iter().next().and_then(|e| e.pass.as_deref()), Some("inline"));
/// # Ok::<(), dfgraph::Error>(())
/// ```
pub struct RewriteSession<'g, N, E> {
    graph: &'g mut OrderedMultiGraph<N, E>,
    config: RewriteConfig,
    events: EventLog,
    pass: Option<String>,
}

impl<'g, N, E> RewriteSession<'g, N, E> {
    /// Opens a session with the default configuration.
    pub fn new(graph: &'g mut OrderedMultiGraph<N, E>) -> Self {
        Self::with_config(graph, RewriteConfig::default())
    }

    /// Opens a session with an explicit configuration.
    pub fn with_config(graph: &'g mut OrderedMultiGraph<N, E>, config: RewriteConfig) -> Self {
        RewriteSession {
            graph,
            config,
            events: EventLog::new(),
            pass: None,
        }
    }

    /// Tags every event recorded from now on with `pass`.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }

    /// Returns the graph being rewritten.
    pub fn graph(&self) -> &OrderedMultiGraph<N, E> {
        self.graph
    }

    /// Returns the graph for edits the session does not track.
    pub fn graph_mut(&mut self) -> &mut OrderedMultiGraph<N, E> {
        self.graph
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Closes the session and hands back its log.
    pub fn into_events(self) -> EventLog {
        self.events
    }

    /// See [`redirect_incoming`](crate::rewrite::redirect_incoming).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either node is absent.
    pub fn redirect_incoming(&mut self, from: NodeId, to: NodeId) -> Result<Vec<EdgeId>> {
        let result = redirect::redirect_incoming(self.graph, from, to);
        let moved = self.track(result)?;
        self.record(EventKind::IncomingRedirected)
            .node(to)
            .message(format!("{} edges moved from {from}", moved.len()));
        Ok(moved)
    }

    /// See [`redirect_outgoing`](crate::rewrite::redirect_outgoing).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if either node is absent.
    pub fn redirect_outgoing(&mut self, from: NodeId, to: NodeId) -> Result<Vec<EdgeId>> {
        let result = redirect::redirect_outgoing(self.graph, from, to);
        let moved = self.track(result)?;
        self.record(EventKind::OutgoingRedirected)
            .node(to)
            .message(format!("{} edges moved from {from}", moved.len()));
        Ok(moved)
    }

    /// See [`replace_subgraph`](crate::rewrite::replace_subgraph).
    ///
    /// An applied splice is logged as [`EventKind::SubgraphReplaced`] anchored at the
    /// first inserted node; a declined one as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] or [`Error::EdgeNotFound`] for a stale selection.
    pub fn replace_subgraph(
        &mut self,
        old: &Subgraph,
        new: OrderedMultiGraph<N, E>,
    ) -> Result<SpliceOutcome<N, E>> {
        let result = replace::replace_subgraph(self.graph, old, new);
        let outcome = self.track(result)?;
        match &outcome {
            SpliceOutcome::Applied(map) => {
                let mut builder = self.record(EventKind::SubgraphReplaced).message(format!(
                    "{} nodes replaced by {}",
                    old.nodes().len(),
                    map.len()
                ));
                if let Some(&first) = map.values().next() {
                    builder = builder.node(first);
                }
                drop(builder);
            }
            SpliceOutcome::Rejected { reason, .. } => {
                self.record(EventKind::Warning)
                    .message(format!("splice rejected: {reason}"));
            }
        }
        Ok(outcome)
    }

    /// Computes a topological order of the graph.
    ///
    /// With `verify_acyclic` set, the graph is first checked for cycles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicGraph`] with the offending cycle when `verify_acyclic` is
    /// set and the graph is cyclic.
    pub fn topological_order(&mut self, sources: Option<Vec<NodeId>>) -> Result<Vec<NodeId>> {
        if self.config.verify_acyclic {
            if let Some(cycle) = find_cycle(&*self.graph) {
                warn!(length = cycle.len(), "cycle found while ordering graph");
                return self.track(Err(Error::CyclicGraph(cycle)));
            }
        }

        let order: Vec<NodeId> = topological_dfs(&*self.graph, sources).collect();
        self.record(EventKind::OrderComputed)
            .message(format!("{} of {} nodes ordered", order.len(), self.graph.node_count()));
        Ok(order)
    }

    fn record(&self, kind: EventKind) -> EventBuilder<'_> {
        let builder = self.events.record(kind);
        match &self.pass {
            Some(pass) => builder.pass(pass.clone()),
            None => builder,
        }
    }

    fn track<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.record(EventKind::Error).message(err.to_string());
        }
        result
    }
}

impl<N: ScopeNode, E> RewriteSession<'_, N, E> {
    /// See [`merge_scopes`](crate::rewrite::merge_scopes); uses the session's fusion
    /// settings.
    ///
    /// # Errors
    ///
    /// The contract errors of [`merge_scopes`](crate::rewrite::merge_scopes).
    pub fn merge_scopes(&mut self, outer: ScopePair, inner: ScopePair) -> Result<ScopePair> {
        let result = fusion::merge_scopes(self.graph, outer, inner, &self.config.fusion);
        let merged = self.track(result)?;

        let label = self
            .graph
            .node(merged.entry)
            .and_then(N::scope)
            .map(|(_, scope)| scope.label().to_string())
            .unwrap_or_default();
        self.record(EventKind::ScopesMerged)
            .node(merged.entry)
            .message(label);
        Ok(merged)
    }
}
