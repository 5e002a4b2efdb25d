use thiserror::Error;

use crate::{
    graph::{EdgeId, NodeId},
    ir::ScopeSide,
};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant describes a *contract violation*: the caller asked for a rewrite on input
/// that cannot support it. Operations detect these conditions before mutating the graph,
/// so an `Err` always leaves the graph exactly as it was. Recoverable precondition failures
/// (for example a replacement without a unique source) are not errors; see
/// [`crate::rewrite::SpliceOutcome`].
///
/// # Error Categories
///
/// ## Graph Handle Errors
/// - [`Error::NodeNotFound`] - A `NodeId` does not refer to a live node
/// - [`Error::EdgeNotFound`] - An `EdgeId` does not refer to a live edge
///
/// ## Scope Fusion Errors
/// - [`Error::NotAScopeNode`] - A node passed as a scope boundary is not one
/// - [`Error::MissingConnector`] - A boundary edge carries no connector name
/// - [`Error::UnmatchedConnector`] - No inner edge pairs with a boundary connector
/// - [`Error::Malformed`] - A connector name violates the pairing convention
///
/// ## Traversal Errors
/// - [`Error::CyclicGraph`] - Acyclicity was required but a cycle exists
///
/// # Examples
///
/// ```rust
/// use dfgraph::{Error, NodeId, OrderedMultiGraph};
///
/// let mut graph: OrderedMultiGraph<&str, ()> = OrderedMultiGraph::new();
/// let a = graph.add_node("A");
///
/// match graph.add_edge(a, NodeId::new(7), ()) {
///     Err(Error::NodeNotFound(node)) => assert_eq!(node, NodeId::new(7)),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The referenced node does not exist in the graph.
    ///
    /// Either the handle was never issued by this graph, or the node has already
    /// been removed. Handles are never reused, so a stale handle stays invalid.
    #[error("Node {0} does not exist in the graph")]
    NodeNotFound(NodeId),

    /// The referenced edge does not exist in the graph.
    #[error("Edge {0} does not exist in the graph")]
    EdgeNotFound(EdgeId),

    /// A node passed as a scope boundary is not a scope node of the expected side.
    ///
    /// Scope fusion requires the outer and inner entries to be scope entries and the
    /// outer and inner exits to be scope exits.
    #[error("Node {node} is not a scope {expected}")]
    NotAScopeNode {
        /// The offending node
        node: NodeId,
        /// The side the node was expected to be
        expected: ScopeSide,
    },

    /// A scope boundary edge has no connector on the side that must be paired.
    #[error("Boundary edge {edge} carries no connector to pair")]
    MissingConnector {
        /// The boundary edge without a connector
        edge: EdgeId,
    },

    /// No inner edge pairs with a boundary connector.
    ///
    /// During scope fusion every boundary connector `IN_k` on the inner entry needs an
    /// outgoing `OUT_k` edge (and symmetrically for the inner exit). A missing partner
    /// would leave a dangling connector on the fused scope.
    #[error("Node {node} has no edge on connector {connector}")]
    UnmatchedConnector {
        /// The inner scope node that lacks the edge
        node: NodeId,
        /// The connector name that was looked up
        connector: String,
    },

    /// The graph contains a cycle where an acyclic graph was required.
    ///
    /// The associated nodes form the detected cycle in traversal order.
    #[error("Graph contains a cycle through {} nodes", .0.len())]
    CyclicGraph(Vec<NodeId>),

    /// Input violates a structural naming or layout convention.
    ///
    /// The error includes the source location where the problem was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
