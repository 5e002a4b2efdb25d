//! Structural rewrites over an [`OrderedMultiGraph`](crate::graph::OrderedMultiGraph).
//!
//! The rewrites here are the building blocks of compiler passes. Each one either applies
//! completely or reports why it could not, and none of them ever leaves a dangling edge
//! behind.
//!
//! # Key Components
//!
//! - [`redirect_incoming`] / [`redirect_outgoing`] - Move every edge of one node to another
//! - [`replace_subgraph`] - Splice a standalone graph in place of a single-entry,
//!   single-exit selection
//! - [`merge_scopes`] - Fuse two immediately nested scopes into one
//! - [`RewriteSession`] - Applies the above with a [`RewriteConfig`] and records an
//!   [`EventLog`]
//!
//! # Failure Model
//!
//! Contract violations (unknown handles, non-scope nodes, malformed or unmatched
//! connectors) are returned as [`Error`](crate::Error) and are detected before the graph
//! is modified. A splice whose source/sink precondition fails is not an error: it comes
//! back as [`SpliceOutcome::Rejected`] together with the unused replacement.

mod config;
mod events;
mod fusion;
mod redirect;
mod replace;
mod session;

pub use config::{
    ConnectorConvention, FusionConfig, MergePolicy, ParamMergeFn, RangeMergeFn, RewriteConfig,
};
pub use events::{Event, EventBuilder, EventKind, EventLog, EventLogIter};
pub use fusion::{merge_scopes, ScopePair};
pub use redirect::{redirect_incoming, redirect_outgoing};
pub use replace::{replace_subgraph, NodeMap, RejectReason, SpliceOutcome};
pub use session::RewriteSession;
