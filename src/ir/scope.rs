//! Scope descriptors shared by scope entry/exit pairs.
//!
//! A scope (a "map" in data-centric terms) is a parallel iteration region delimited by an
//! entry node and an exit node. Both nodes point at the same [`Scope`] through an `Arc`,
//! which carries the iteration parameters, their range, and scheduling attributes.
//!
//! # Key Types
//! - [`Scope`]: The shared descriptor
//! - [`Range`] / [`RangeDim`]: Symbolic iteration range, one dimension per parameter
//! - [`ScheduleKind`]: Where and how the scope's iterations execute
//! - [`ScopeFlags`]: Boolean scheduling attributes
//! - [`ScopeSide`]: Whether a node opens or closes its scope

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString};

/// The side of a scope a boundary node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ScopeSide {
    /// The node opening the scope
    Entry,
    /// The node closing the scope
    Exit,
}

/// Execution schedule of a scope.
///
/// The schedule is opaque to structural rewrites; fusion simply inherits the outer
/// scope's schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ScheduleKind {
    /// Let code generation pick a schedule
    #[default]
    Default,
    /// Plain sequential loop
    Sequential,
    /// Distributed across processes
    Mpi,
    /// Shared-memory multicore loop
    CpuMulticore,
    /// Fully unrolled at compile time
    Unrolled,
    /// GPU kernel grid
    GpuDevice,
    /// GPU thread block
    GpuThreadBlock,
    /// FPGA processing element
    FpgaDevice,
}

bitflags! {
    /// Boolean scheduling attributes of a scope
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScopeFlags: u8 {
        /// Unroll the iteration space
        const UNROLL = 0x01;
        /// Iterations may run asynchronously
        const ASYNC = 0x02;
        /// Collapse the iteration space into one dimension
        const FLATTEN = 0x04;
    }
}

/// One dimension of a symbolic iteration range, `start:end:step`.
///
/// Bounds are kept as symbolic expressions; the crate never evaluates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeDim {
    /// Inclusive lower bound
    pub start: String,
    /// Upper bound
    pub end: String,
    /// Stride
    pub step: String,
}

impl RangeDim {
    /// Creates a unit-stride dimension `start:end`.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        RangeDim {
            start: start.into(),
            end: end.into(),
            step: "1".to_string(),
        }
    }

    /// Sets the stride.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = step.into();
        self
    }
}

impl fmt::Display for RangeDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == "1" {
            write!(f, "{}:{}", self.start, self.end)
        } else {
            write!(f, "{}:{}:{}", self.start, self.end, self.step)
        }
    }
}

/// A multi-dimensional symbolic iteration range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Range {
    dims: Vec<RangeDim>,
}

impl Range {
    /// Builds a range from its dimensions.
    pub fn from_dims<I: IntoIterator<Item = RangeDim>>(dims: I) -> Self {
        Range {
            dims: dims.into_iter().collect(),
        }
    }

    /// Returns the dimensions in order.
    #[must_use]
    pub fn dims(&self) -> &[RangeDim] {
        &self.dims
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Returns `true` for a zero-dimensional range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Returns a range with the dimensions of `self` followed by those of `other`.
    #[must_use]
    pub fn concat(&self, other: &Range) -> Range {
        Range {
            dims: self.dims.iter().chain(other.dims.iter()).cloned().collect(),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}")?;
        }
        Ok(())
    }
}

/// Source location a scope was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebugInfo {
    /// Source file name
    pub file: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

/// Descriptor shared by the entry and exit node of one scope.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{Range, RangeDim, ScheduleKind, Scope, ScopeFlags};
///
/// let scope = Scope::new(
///     "tile",
///     ["i", "j"],
///     Range::from_dims([RangeDim::new("0", "N"), RangeDim::new("0", "M").with_step("2")]),
/// )
/// .with_schedule(ScheduleKind::CpuMulticore)
/// .with_flags(ScopeFlags::UNROLL);
///
/// assert_eq!(scope.params(), ["i", "j"]);
/// assert_eq!(scope.range().to_string(), "0:N, 0:M:2");
/// assert_eq!(scope.schedule().to_string(), "cpu_multicore");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    label: String,
    params: Vec<String>,
    range: Range,
    schedule: ScheduleKind,
    flags: ScopeFlags,
    debuginfo: Option<DebugInfo>,
}

impl Scope {
    /// Creates a scope with the default schedule and no flags.
    pub fn new<P, S>(label: impl Into<String>, params: P, range: Range) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope {
            label: label.into(),
            params: params.into_iter().map(Into::into).collect(),
            range,
            schedule: ScheduleKind::default(),
            flags: ScopeFlags::empty(),
            debuginfo: None,
        }
    }

    /// Sets the schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: ScheduleKind) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ScopeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_debuginfo(mut self, debuginfo: DebugInfo) -> Self {
        self.debuginfo = Some(debuginfo);
        self
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the iteration parameters in order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Returns the iteration range.
    #[must_use]
    pub fn range(&self) -> &Range {
        &self.range
    }

    /// Returns the schedule.
    #[must_use]
    pub fn schedule(&self) -> ScheduleKind {
        self.schedule
    }

    /// Returns the flags.
    #[must_use]
    pub fn flags(&self) -> ScopeFlags {
        self.flags
    }

    /// Returns the source location, if known.
    #[must_use]
    pub fn debuginfo(&self) -> Option<&DebugInfo> {
        self.debuginfo.as_ref()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}={}]", self.label, self.params.join(", "), self.range)
    }
}
