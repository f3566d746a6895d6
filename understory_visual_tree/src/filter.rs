// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node filters used by descendant and ascendant searches.

use crate::access::TreeAccess;

/// Selects which nodes a search reports.
///
/// `N` is the node handle and `T` the type tag of the [`TreeAccess`] the filter
/// is applied to. The walker treats every variant the same way: as a
/// `(node) -> bool` test evaluated once per visited node.
pub enum Filter<'a, N, T> {
    /// Node is an instance of the tag, per [`TreeAccess::is_instance_of`].
    Type(T),
    /// Node has a name and it equals this string exactly (case-sensitive).
    ///
    /// Nodes for which [`TreeAccess::name_of`] returns `None` never match,
    /// and an empty string never matches anything.
    Named(&'a str),
    /// Node satisfies a caller-supplied predicate.
    ///
    /// Panics raised by the predicate propagate to the caller unchanged.
    Predicate(&'a dyn Fn(N) -> bool),
}

impl<N, T> Filter<'_, N, T> {
    /// Test `node` against this filter.
    pub fn matches<A>(&self, tree: &A, node: N) -> bool
    where
        A: TreeAccess<Node = N, TypeTag = T> + ?Sized,
        N: Copy,
    {
        match self {
            Self::Type(tag) => tree.is_instance_of(node, tag),
            Self::Named(name) => !name.is_empty() && tree.name_of(node) == Some(*name),
            Self::Predicate(pred) => pred(node),
        }
    }
}

impl<N, T: core::fmt::Debug> core::fmt::Debug for Filter<'_, N, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Type(tag) => f.debug_tuple("Type").field(tag).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Predicate(_) => f.debug_tuple("Predicate").finish_non_exhaustive(),
        }
    }
}
