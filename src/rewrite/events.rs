//! Change log for structural rewrites.
//!
//! Every rewrite applied through a [`RewriteSession`](crate::rewrite::RewriteSession)
//! leaves an [`Event`] behind: which rewrite ran, which node anchored it, and a short
//! description. Passes inspect the log to decide whether they reached a fixpoint, and
//! tests use it to assert what happened without diffing whole graphs.
//!
//! # Architecture
//!
//! - [`Event`] - A single recorded rewrite or diagnostic
//! - [`EventLog`] - Append-only collection with query and summary helpers
//! - [`EventBuilder`] - Fluent builder that records its event when dropped
//!
//! The log is backed by a `boxcar::Vec`, so recording only needs `&self` and several
//! rewrite workers can share one log.
//!
//! # Example
//!
//! ```rust
//! use dfgraph::{EventKind, EventLog, NodeId};
//!
//! let log = EventLog::new();
//! log.record(EventKind::ScopesMerged)
//!     .node(NodeId::new(4))
//!     .message("outer + inner");
//! log.warn("splice rejected: 2 sources");
//!
//! assert!(log.has(EventKind::ScopesMerged));
//! assert_eq!(log.warnings().count(), 1);
//! assert_eq!(log.summary(), "1 scopes merged");
//! ```

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::graph::NodeId;

/// Categories of events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Incoming edges of a node were moved to another node.
    IncomingRedirected,
    /// Outgoing edges of a node were moved to another node.
    OutgoingRedirected,
    /// A subgraph was spliced out and replaced.
    SubgraphReplaced,
    /// Two nested scopes were fused into one.
    ScopesMerged,

    /// A topological order was computed for a pass.
    OrderComputed,

    /// Informational message.
    Info,
    /// Warning (a rewrite was declined, the graph is unchanged).
    Warning,
    /// Error (a rewrite failed a contract check, the graph is unchanged).
    Error,
}

impl EventKind {
    /// Returns a human-readable description of this event kind.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::IncomingRedirected => "incoming edges redirected",
            Self::OutgoingRedirected => "outgoing edges redirected",
            Self::SubgraphReplaced => "subgraph replaced",
            Self::ScopesMerged => "scopes merged",
            Self::OrderComputed => "order computed",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Returns true if this event represents a graph mutation.
    #[must_use]
    pub fn is_transformation(&self) -> bool {
        matches!(
            self,
            Self::IncomingRedirected
                | Self::OutgoingRedirected
                | Self::SubgraphReplaced
                | Self::ScopesMerged
        )
    }

    /// Returns true if this is a diagnostic event (info/warning/error).
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Info | Self::Warning | Self::Error)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The type of event.
    pub kind: EventKind,
    /// The node anchoring the rewrite, if any (e.g. the merged scope entry).
    pub node: Option<NodeId>,
    /// Human-readable description.
    pub message: String,
    /// Name of the pass that requested the rewrite, if known.
    pub pass: Option<String>,
}

impl Event {
    fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            node: None,
            message: message.into(),
            pass: None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "[{}] {}: {}", self.kind, node, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Builder for creating events with a fluent API.
///
/// Created by [`EventLog::record`]. The event is added to the log when the builder is
/// dropped, so a bare `log.record(kind);` statement is enough.
pub struct EventBuilder<'a> {
    log: &'a EventLog,
    kind: EventKind,
    node: Option<NodeId>,
    message: Option<String>,
    pass: Option<String>,
}

impl<'a> EventBuilder<'a> {
    fn new(log: &'a EventLog, kind: EventKind) -> Self {
        Self {
            log,
            kind,
            node: None,
            message: None,
            pass: None,
        }
    }

    /// Sets the node that anchors the event.
    pub fn node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    /// Sets a custom message describing the event.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Associates this event with a specific pass.
    pub fn pass(mut self, pass_name: impl Into<String>) -> Self {
        self.pass = Some(pass_name.into());
        self
    }
}

impl Drop for EventBuilder<'_> {
    fn drop(&mut self) {
        let message = self
            .message
            .take()
            .unwrap_or_else(|| self.kind.description().to_string());

        self.log.events.push(Event {
            kind: self.kind,
            node: self.node,
            message,
            pass: self.pass.take(),
        });
    }
}

/// Append-only log of rewrite events.
///
/// Statistics are derived from the recorded events rather than tracked separately.
/// The log is thread-safe: events can be appended through shared references.
#[derive(Debug)]
pub struct EventLog {
    events: boxcar::Vec<Event>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            events: boxcar::Vec::new(),
        }
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl EventLog {
    /// Creates an empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no events have been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.count() == 0
    }

    /// Returns the total number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.count()
    }

    /// Starts building a new event of the given kind.
    pub fn record(&self, kind: EventKind) -> EventBuilder<'_> {
        EventBuilder::new(self, kind)
    }

    /// Records an informational message.
    pub fn info(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Info, message));
    }

    /// Records a warning message.
    pub fn warn(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Warning, message));
    }

    /// Records an error message.
    pub fn error(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Error, message));
    }

    /// Appends copies of every event of `other`.
    pub fn merge(&self, other: &EventLog) {
        for event in other {
            self.events.push(event.clone());
        }
    }

    /// Returns true if any event of the given kind exists.
    #[must_use]
    pub fn has(&self, kind: EventKind) -> bool {
        self.iter().any(|e| e.kind == kind)
    }

    /// Counts events of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.filter_kind(kind).count()
    }

    /// Returns an iterator over all events in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, e)| e)
    }

    /// Returns an iterator over events of a specific kind.
    pub fn filter_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(move |e| e.kind == kind)
    }

    /// Returns an iterator over events anchored at `node`.
    pub fn filter_node(&self, node: NodeId) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(move |e| e.node == Some(node))
    }

    /// Returns an iterator over graph mutations only.
    pub fn transformations(&self) -> impl Iterator<Item = &Event> + '_ {
        self.iter().filter(|e| e.kind.is_transformation())
    }

    /// Returns an iterator over warning events.
    pub fn warnings(&self) -> impl Iterator<Item = &Event> + '_ {
        self.filter_kind(EventKind::Warning)
    }

    /// Returns an iterator over error events.
    pub fn errors(&self) -> impl Iterator<Item = &Event> + '_ {
        self.filter_kind(EventKind::Error)
    }

    /// Counts events grouped by kind.
    #[must_use]
    pub fn count_by_kind(&self) -> HashMap<EventKind, usize> {
        let mut counts = HashMap::new();
        for event in self {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the number of distinct nodes that anchored a mutation.
    #[must_use]
    pub fn nodes_affected(&self) -> usize {
        self.transformations()
            .filter_map(|e| e.node)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Generates a one-line summary of the mutations in the log.
    ///
    /// Diagnostics are not itemized; a log without mutations reports its event count.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "no events".to_string();
        }

        let mut parts: Vec<String> = self
            .count_by_kind()
            .into_iter()
            .filter(|(kind, _)| kind.is_transformation())
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect();

        if parts.is_empty() {
            return format!("{} events", self.len());
        }

        parts.sort();
        parts.join(", ")
    }
}

/// Iterator over the events of an [`EventLog`].
pub struct EventLogIter<'a> {
    inner: boxcar::Iter<'a, Event>,
}

impl<'a> Iterator for EventLogIter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, e)| e)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = EventLogIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        EventLogIter {
            inner: self.events.iter(),
        }
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        let log = Self::new();
        for event in iter {
            log.events.push(event);
        }
        log
    }
}
