//! Depth-limited search over lazily expanded candidate trees.
//!
//! Optimization exploration (for example, trying transformation sequences) describes its
//! search space as a tree of candidates that is expanded on demand. This module walks
//! such trees to a bounded depth without recursion: every level keeps a native iterator
//! over the children of its node on an explicit stack.

/// A candidate in a lazily expanded search tree.
///
/// Implementors produce their children by value, so a search can keep the best candidate
/// without cloning.
///
/// # Examples
///
/// ```rust
/// use dfgraph::graph::algorithms::{best_in_depth, SearchNode};
///
/// // Integers whose children are `2n` and `2n + 1`, scored by value modulo 7
/// #[derive(Debug, PartialEq)]
/// struct Num(u32);
///
/// impl SearchNode for Num {
///     type Score = u32;
///     type Children = std::vec::IntoIter<Num>;
///
///     fn evaluate(&self) -> u32 {
///         self.0 % 7
///     }
///
///     fn children(&self) -> Self::Children {
///         vec![Num(2 * self.0), Num(2 * self.0 + 1)].into_iter()
///     }
/// }
///
/// let (best, score) = best_in_depth(Num(1), 2);
/// assert_eq!((best, score), (Num(6), 6));
/// ```
pub trait SearchNode: Sized {
    /// Score type; larger is better.
    type Score: PartialOrd + Copy;

    /// Iterator over the children of a node.
    type Children: Iterator<Item = Self>;

    /// Scores this candidate.
    fn evaluate(&self) -> Self::Score;

    /// Expands this candidate into its children.
    fn children(&self) -> Self::Children;
}

/// Finds the best-scoring candidate within `depth` levels below `source`.
///
/// `depth == 0` considers `source` alone. Every produced node is evaluated exactly once.
/// Ties keep the candidate seen first: only a strictly greater score replaces it, so
/// `source` wins over equally-scored descendants. Scores that compare as unordered
/// (`NaN`) never replace the current candidate.
///
/// # Arguments
///
/// * `source` - Root of the search
/// * `depth` - Number of levels to expand below the root
///
/// # Returns
///
/// The best candidate together with its score.
pub fn best_in_depth<S: SearchNode>(source: S, depth: usize) -> (S, S::Score) {
    let value = source.evaluate();
    if depth == 0 {
        return (source, value);
    }

    let mut stack: Vec<(usize, S::Children)> = vec![(0, source.children())];
    let mut candidate = source;
    let mut candidate_value = value;

    while let Some((level, children)) = stack.last_mut() {
        let level = *level;
        let Some(child) = children.next() else {
            stack.pop();
            continue;
        };

        let child_value = child.evaluate();
        if level + 1 < depth {
            stack.push((level + 1, child.children()));
        }
        if child_value > candidate_value {
            candidate = child;
            candidate_value = child_value;
        }
    }

    (candidate, candidate_value)
}

/// Lazy iterator produced by [`dfs_at_depth`].
pub struct DepthLimitedDfs<S: SearchNode> {
    /// Root to yield when the depth is zero
    root: Option<S>,
    stack: Vec<(usize, S::Children)>,
    depth: usize,
}

impl<S: SearchNode> Iterator for DepthLimitedDfs<S> {
    type Item = S;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            return Some(root);
        }

        loop {
            let (level, children) = self.stack.last_mut()?;
            let level = *level;
            match children.next() {
                Some(child) => {
                    if level + 1 < self.depth {
                        self.stack.push((level + 1, child.children()));
                    }
                    return Some(child);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Enumerates the search tree below `source` in depth-first pre-order.
///
/// With `depth == 0` only `source` is yielded. Otherwise every node produced by
/// expansion within `depth` levels below `source` is yielded, and `source` itself is
/// not. The iterator consumes `source`; to restart, call this function again.
///
/// # Examples
///
/// ```rust
/// use dfgraph::graph::algorithms::{dfs_at_depth, SearchNode};
///
/// #[derive(Clone)]
/// struct Level(u8);
///
/// impl SearchNode for Level {
///     type Score = u8;
///     type Children = std::iter::Take<std::iter::Repeat<Level>>;
///
///     fn evaluate(&self) -> u8 {
///         self.0
///     }
///
///     fn children(&self) -> Self::Children {
///         std::iter::repeat(Level(self.0 + 1)).take(2)
///     }
/// }
///
/// let levels: Vec<u8> = dfs_at_depth(Level(0), 2).map(|n| n.0).collect();
/// assert_eq!(levels, vec![1, 2, 2, 1, 2, 2]);
/// ```
pub fn dfs_at_depth<S: SearchNode>(source: S, depth: usize) -> DepthLimitedDfs<S> {
    if depth == 0 {
        return DepthLimitedDfs {
            root: Some(source),
            stack: Vec::new(),
            depth,
        };
    }

    DepthLimitedDfs {
        root: None,
        stack: vec![(0, source.children())],
        depth,
    }
}
