//! Reference IR node model and the scope capability trait.

use std::{collections::BTreeSet, fmt, sync::Arc};

use crate::ir::{Scope, ScopeSide};

/// Capability trait for node payloads that can represent scope boundaries.
///
/// Scope fusion is written against this trait rather than a concrete node type, so a
/// pass with its own node taxonomy can still use [`crate::rewrite::merge_scopes`].
pub trait ScopeNode: Sized {
    /// Returns the side and shared descriptor if this node is a scope boundary.
    fn scope(&self) -> Option<(ScopeSide, &Arc<Scope>)>;

    /// Returns the declared input connectors, if this node declares any.
    fn in_connectors(&self) -> Option<&BTreeSet<String>>;

    /// Returns the declared output connectors, if this node declares any.
    fn out_connectors(&self) -> Option<&BTreeSet<String>>;

    /// Builds a scope boundary node.
    fn new_scope_node(
        side: ScopeSide,
        scope: Arc<Scope>,
        in_connectors: BTreeSet<String>,
        out_connectors: BTreeSet<String>,
    ) -> Self;
}

/// A scope entry or exit: the shared descriptor plus this node's connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeBoundary {
    /// Descriptor shared with the matching boundary node
    pub scope: Arc<Scope>,
    /// Declared input connectors
    pub in_connectors: BTreeSet<String>,
    /// Declared output connectors
    pub out_connectors: BTreeSet<String>,
}

/// Node payload of the reference dataflow IR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Access to a named data container
    Access {
        /// Container name
        data: String,
    },
    /// A fine-grained computation
    Tasklet {
        /// Label
        label: String,
        /// Opaque code body
        code: String,
    },
    /// Opens a scope
    ScopeEntry(ScopeBoundary),
    /// Closes a scope
    ScopeExit(ScopeBoundary),
}

impl Node {
    /// Creates an access node.
    pub fn access(data: impl Into<String>) -> Self {
        Node::Access { data: data.into() }
    }

    /// Creates a tasklet.
    pub fn tasklet(label: impl Into<String>, code: impl Into<String>) -> Self {
        Node::Tasklet {
            label: label.into(),
            code: code.into(),
        }
    }

    /// Creates a scope entry with the given connector names.
    pub fn scope_entry<I, O>(scope: Arc<Scope>, in_connectors: I, out_connectors: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Node::ScopeEntry(ScopeBoundary {
            scope,
            in_connectors: in_connectors.into_iter().map(Into::into).collect(),
            out_connectors: out_connectors.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a scope exit with the given connector names.
    pub fn scope_exit<I, O>(scope: Arc<Scope>, in_connectors: I, out_connectors: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Node::ScopeExit(ScopeBoundary {
            scope,
            in_connectors: in_connectors.into_iter().map(Into::into).collect(),
            out_connectors: out_connectors.into_iter().map(Into::into).collect(),
        })
    }

    /// Returns the node's display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Node::Access { data } => data.as_str(),
            Node::Tasklet { label, .. } => label.as_str(),
            Node::ScopeEntry(boundary) | Node::ScopeExit(boundary) => boundary.scope.label(),
        }
    }

    fn boundary(&self) -> Option<&ScopeBoundary> {
        match self {
            Node::ScopeEntry(boundary) | Node::ScopeExit(boundary) => Some(boundary),
            _ => None,
        }
    }
}

impl ScopeNode for Node {
    fn scope(&self) -> Option<(ScopeSide, &Arc<Scope>)> {
        match self {
            Node::ScopeEntry(boundary) => Some((ScopeSide::Entry, &boundary.scope)),
            Node::ScopeExit(boundary) => Some((ScopeSide::Exit, &boundary.scope)),
            _ => None,
        }
    }

    fn in_connectors(&self) -> Option<&BTreeSet<String>> {
        self.boundary().map(|b| &b.in_connectors)
    }

    fn out_connectors(&self) -> Option<&BTreeSet<String>> {
        self.boundary().map(|b| &b.out_connectors)
    }

    fn new_scope_node(
        side: ScopeSide,
        scope: Arc<Scope>,
        in_connectors: BTreeSet<String>,
        out_connectors: BTreeSet<String>,
    ) -> Self {
        let boundary = ScopeBoundary {
            scope,
            in_connectors,
            out_connectors,
        };
        match side {
            ScopeSide::Entry => Node::ScopeEntry(boundary),
            ScopeSide::Exit => Node::ScopeExit(boundary),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Access { data } => write!(f, "{data}"),
            Node::Tasklet { label, .. } => write!(f, "{label}()"),
            Node::ScopeEntry(b) => write!(f, "{} [entry]", b.scope),
            Node::ScopeExit(b) => write!(f, "{} [exit]", b.scope),
        }
    }
}
