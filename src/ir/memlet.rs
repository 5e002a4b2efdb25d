//! Data-movement descriptors carried on dataflow edges.

use std::fmt;

/// Describes which part of which data container an edge moves.
///
/// Rewrites never inspect a memlet; they move it between edges unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Memlet {
    /// Name of the accessed data container
    pub data: String,
    /// Symbolic subset of the container, e.g. `"i, 0:M"`
    pub subset: String,
}

impl Memlet {
    /// Creates a memlet moving `subset` of `data`.
    pub fn new(data: impl Into<String>, subset: impl Into<String>) -> Self {
        Memlet {
            data: data.into(),
            subset: subset.into(),
        }
    }

    /// Creates the empty memlet of a pure ordering edge.
    #[must_use]
    pub fn empty() -> Self {
        Memlet::default()
    }

    /// Returns `true` for the empty memlet used on pure ordering edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for Memlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("(empty)")
        } else {
            write!(f, "{}[{}]", self.data, self.subset)
        }
    }
}
