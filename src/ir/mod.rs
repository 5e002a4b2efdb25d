//! # Key Components
//!
//! - [`Node`] - Access, tasklet and scope boundary nodes
//! - [`ScopeNode`] - Capability trait scope fusion is written against
//! - [`Scope`] - Descriptor shared by a scope's entry and exit
//! - [`Memlet`] - Edge payload describing data movement

mod memlet;
mod node;
mod scope;

pub use memlet::Memlet;
pub use node::{Node, ScopeBoundary, ScopeNode};
pub use scope::{DebugInfo, Range, RangeDim, ScheduleKind, Scope, ScopeFlags, ScopeSide};
