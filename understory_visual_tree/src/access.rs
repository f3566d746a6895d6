// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree-access capability consumed by [`TreeWalker`](crate::TreeWalker).
//!
//! Hosts implement [`TreeAccess`] over whatever representation their UI
//! framework uses. The walker never touches the tree any other way, so a small
//! in-memory mock is enough to exercise it.

use alloc::vec::Vec;
use core::hash::Hash;

/// Read-only view of a hierarchical element tree.
///
/// ## Contract
///
/// - `child_count` is `0` for leaves.
/// - `child_at` is only called for `index < child_count(node)`. It may return
///   `None` when the host representation has an empty slot; the walker skips it.
/// - `parent_of` returns `None` at a root.
/// - Handles are identity-comparable: two handles are equal iff they refer to
///   the same node.
///
/// The tree must not change while a single walker call is running.
pub trait TreeAccess {
    /// Opaque, cheap handle to one node.
    type Node: Copy + Eq + Hash;

    /// Type tag used by [`Filter::Type`](crate::Filter::Type).
    type TypeTag;

    /// Whether `node` is a live member of this tree.
    ///
    /// Walkers check this on the starting node only. The default accepts every
    /// handle, which suits hosts whose handles cannot go stale.
    fn contains(&self, node: Self::Node) -> bool {
        let _ = node;
        true
    }

    /// Number of child slots of `node`.
    fn child_count(&self, node: Self::Node) -> usize;

    /// Child of `node` at `index`, or `None` for an empty slot.
    fn child_at(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// Parent of `node`, or `None` at a root.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Name of `node`, or `None` when it is unnamed or the node kind has no name.
    fn name_of(&self, node: Self::Node) -> Option<&str> {
        let _ = node;
        None
    }

    /// Whether `node` is an instance of the type identified by `tag`.
    fn is_instance_of(&self, node: Self::Node, tag: &Self::TypeTag) -> bool;

    /// Overlays (popups, flyouts) currently open over `root`, in host order.
    fn open_overlays(&self, root: Self::Node) -> Vec<Self::Node> {
        let _ = root;
        Vec::new()
    }
}
