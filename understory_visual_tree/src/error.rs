// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`TreeWalker`](crate::TreeWalker).
//!
//! A search that finds nothing is not an error: it returns `Ok(None)` or an
//! empty vector. [`WalkError`] is reserved for misuse (a starting node the
//! tree does not know) and for trees that break the acyclic contract.

/// Failure of a traversal before or while it runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum WalkError {
    /// The starting node is not part of the tree (removed, or from another tree).
    #[error("traversal started from a node that is not part of the tree")]
    StaleNode,
    /// A node was reached twice while walking descendants.
    ///
    /// This covers both a child that lists one of its ancestors and a child
    /// shared by two parents. `depth` is the breadth-first level
    /// (1 = children of the container) at which the repeated node was found.
    #[error("node reached twice at depth {depth} while walking descendants")]
    Revisit {
        /// Level at which the repeat was detected.
        depth: usize,
    },
    /// The parent chain loops back onto itself.
    #[error("parent chain loops after {steps} steps")]
    AncestorCycle {
        /// Number of parent links followed before the loop was detected.
        steps: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_location() {
        assert_eq!(
            WalkError::Revisit { depth: 3 }.to_string(),
            "node reached twice at depth 3 while walking descendants"
        );
        assert_eq!(
            WalkError::AncestorCycle { steps: 2 }.to_string(),
            "parent chain loops after 2 steps"
        );
    }

    #[test]
    fn is_core_error() {
        fn assert_error<E: core::error::Error>(_: &E) {}
        assert_error(&WalkError::StaleNode);
    }
}
