//! Configuration for structural rewrites.
//!
//! This module provides the knobs a pass can turn when it applies rewrites: how scope
//! fusion merges parameters and ranges, which connector naming convention pairs the
//! inputs and outputs of a scope node, and whether a session verifies acyclicity before
//! computing orders.

use std::{fmt, sync::Arc};

use crate::ir::Range;

/// Merges the parameter lists of an outer and an inner scope.
pub type ParamMergeFn = dyn Fn(&[String], &[String]) -> Vec<String> + Send + Sync;

/// Merges the ranges of an outer and an inner scope.
pub type RangeMergeFn = dyn Fn(&Range, &Range) -> Range + Send + Sync;

/// How scope fusion combines the parameters and ranges of two nested scopes.
///
/// Both functions default to concatenation, outer first. Symbolic range algebra (for
/// example, collapsing dimensions) lives outside this crate and plugs in here.
///
/// # Examples
///
/// ```rust
/// use dfgraph::{MergePolicy, Range, RangeDim};
///
/// // Keep only the inner parameters
/// let policy = MergePolicy::default().with_param_merge(|_, inner| inner.to_vec());
///
/// let outer = vec!["i".to_string()];
/// let inner = vec!["j".to_string()];
/// assert_eq!(policy.merge_params(&outer, &inner), vec!["j".to_string()]);
///
/// let merged = policy.merge_ranges(
///     &Range::from_dims([RangeDim::new("0", "N")]),
///     &Range::from_dims([RangeDim::new("0", "M")]),
/// );
/// assert_eq!(merged.len(), 2);
/// ```
#[derive(Clone)]
pub struct MergePolicy {
    param_merge: Arc<ParamMergeFn>,
    range_merge: Arc<RangeMergeFn>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            param_merge: Arc::new(|outer, inner| outer.iter().chain(inner).cloned().collect()),
            range_merge: Arc::new(|outer, inner| outer.concat(inner)),
        }
    }
}

impl fmt::Debug for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergePolicy").finish_non_exhaustive()
    }
}

impl MergePolicy {
    /// Creates the concatenating default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the parameter merge function.
    #[must_use]
    pub fn with_param_merge<F>(mut self, merge: F) -> Self
    where
        F: Fn(&[String], &[String]) -> Vec<String> + Send + Sync + 'static,
    {
        self.param_merge = Arc::new(merge);
        self
    }

    /// Replaces the range merge function.
    #[must_use]
    pub fn with_range_merge<F>(mut self, merge: F) -> Self
    where
        F: Fn(&Range, &Range) -> Range + Send + Sync + 'static,
    {
        self.range_merge = Arc::new(merge);
        self
    }

    /// Applies the parameter merge function.
    #[must_use]
    pub fn merge_params(&self, outer: &[String], inner: &[String]) -> Vec<String> {
        (self.param_merge)(outer, inner)
    }

    /// Applies the range merge function.
    #[must_use]
    pub fn merge_ranges(&self, outer: &Range, inner: &Range) -> Range {
        (self.range_merge)(outer, inner)
    }
}

/// Naming convention that pairs the input and output connectors of a scope node.
///
/// Data entering a scope node on input connector `<input_prefix><k>` leaves it on output
/// connector `<output_prefix><k>`. The default is `IN_k` / `OUT_k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConvention {
    /// Prefix of input connectors (default `IN_`).
    pub input_prefix: String,
    /// Prefix of output connectors (default `OUT_`).
    pub output_prefix: String,
}

impl Default for ConnectorConvention {
    fn default() -> Self {
        ConnectorConvention {
            input_prefix: "IN_".to_string(),
            output_prefix: "OUT_".to_string(),
        }
    }
}

impl ConnectorConvention {
    /// Creates a convention with custom prefixes.
    pub fn new(input_prefix: impl Into<String>, output_prefix: impl Into<String>) -> Self {
        ConnectorConvention {
            input_prefix: input_prefix.into(),
            output_prefix: output_prefix.into(),
        }
    }

    /// Returns the pairing suffix of an input connector.
    #[must_use]
    pub fn input_suffix<'c>(&self, connector: &'c str) -> Option<&'c str> {
        connector.strip_prefix(self.input_prefix.as_str())
    }

    /// Returns the pairing suffix of an output connector.
    #[must_use]
    pub fn output_suffix<'c>(&self, connector: &'c str) -> Option<&'c str> {
        connector.strip_prefix(self.output_prefix.as_str())
    }

    /// Returns the output connector paired with `input`.
    #[must_use]
    pub fn output_for(&self, input: &str) -> Option<String> {
        self.input_suffix(input)
            .map(|suffix| format!("{}{}", self.output_prefix, suffix))
    }

    /// Returns the input connector paired with `output`.
    #[must_use]
    pub fn input_for(&self, output: &str) -> Option<String> {
        self.output_suffix(output)
            .map(|suffix| format!("{}{}", self.input_prefix, suffix))
    }
}

/// Configuration for scope fusion.
#[derive(Debug, Clone, Default)]
pub struct FusionConfig {
    /// How parameters and ranges are combined.
    pub policy: MergePolicy,
    /// How boundary connectors are paired.
    pub connectors: ConnectorConvention,
}

impl FusionConfig {
    /// Creates a configuration with concatenating merges and `IN_`/`OUT_` connectors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the merge policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the connector convention.
    #[must_use]
    pub fn with_connectors(mut self, connectors: ConnectorConvention) -> Self {
        self.connectors = connectors;
        self
    }
}

/// Configuration for a [`RewriteSession`](crate::rewrite::RewriteSession).
///
/// # Examples
///
/// ```rust
/// use dfgraph::{ConnectorConvention, FusionConfig, RewriteConfig};
///
/// let config = RewriteConfig::new()
///     .with_verify_acyclic(true)
///     .with_fusion(FusionConfig::new().with_connectors(ConnectorConvention::new("in_", "out_")));
///
/// assert!(config.verify_acyclic);
/// assert_eq!(config.fusion.connectors.output_for("in_3").as_deref(), Some("out_3"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RewriteConfig {
    /// Scope fusion settings used by `merge_scopes`.
    pub fusion: FusionConfig,

    /// Check for cycles before computing a topological order (default: false).
    ///
    /// When enabled, a cyclic graph makes the order computation fail with
    /// [`Error::CyclicGraph`](crate::Error::CyclicGraph) instead of producing an order
    /// with no ordering guarantee.
    pub verify_acyclic: bool,
}

impl RewriteConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fusion configuration.
    #[must_use]
    pub fn with_fusion(mut self, fusion: FusionConfig) -> Self {
        self.fusion = fusion;
        self
    }

    /// Enables or disables the acyclicity check.
    #[must_use]
    pub fn with_verify_acyclic(mut self, verify: bool) -> Self {
        self.verify_acyclic = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RangeDim;

    #[test]
    fn test_default_policy_concatenates() {
        let policy = MergePolicy::default();
        let params = policy.merge_params(&["i".to_string()], &["j".to_string(), "k".to_string()]);
        assert_eq!(params, ["i", "j", "k"]);

        let range = policy.merge_ranges(
            &Range::from_dims([RangeDim::new("0", "N")]),
            &Range::from_dims([RangeDim::new("0", "M")]),
        );
        assert_eq!(range.to_string(), "0:N, 0:M");
    }

    #[test]
    fn test_custom_range_merge() {
        let policy = MergePolicy::new().with_range_merge(|outer, _| outer.clone());
        let outer = Range::from_dims([RangeDim::new("0", "N")]);
        let inner = Range::from_dims([RangeDim::new("0", "M")]);
        assert_eq!(policy.merge_ranges(&outer, &inner), outer);
        assert_eq!(format!("{policy:?}"), "MergePolicy { .. }");
    }

    #[test]
    fn test_connector_convention_pairs_by_suffix() {
        let conv = ConnectorConvention::default();
        assert_eq!(conv.output_for("IN_A").as_deref(), Some("OUT_A"));
        assert_eq!(conv.input_for("OUT_12").as_deref(), Some("IN_12"));
        assert_eq!(conv.output_for("OUT_1"), None);
        assert_eq!(conv.input_suffix("IN_"), Some(""));
    }

    #[test]
    fn test_rewrite_config_defaults() {
        let config = RewriteConfig::default();
        assert!(!config.verify_acyclic);
        assert_eq!(config.fusion.connectors, ConnectorConvention::default());
    }
}
