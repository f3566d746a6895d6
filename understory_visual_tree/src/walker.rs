// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree walker: descendant, ascendant, and overlay queries.
//!
//! ## Overview
//!
//! [`TreeWalker`] borrows a [`TreeAccess`] and answers read-only questions
//! about it. It keeps no state between calls.
//!
//! - Descendant searches run breadth-first from a container: its children,
//!   then their children, and so on. Sibling order from the tree is kept
//!   within each level.
//! - Ascendant searches follow the single parent chain upward.
//! - The starting node is never reported as a match.
//!
//! Every descendant search is built on [`TreeWalker::walk_descendants`] and
//! every ascendant search on [`TreeWalker::walk_ancestors`]; use those
//! directly when a [`Filter`] is not expressive enough.
//!
//! ## Results and errors
//!
//! Not finding anything is a normal outcome: `Ok(None)` or an empty vector.
//! [`WalkError`] is returned only when the starting node is not part of the
//! tree, or when the tree loops (see [`CycleGuard`]).

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::access::TreeAccess;
use crate::error::WalkError;
use crate::filter::Filter;

/// Visit result controlling whether a walk goes on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep walking.
    Continue,
    /// Stop now; the walk reports the node that was just visited.
    Stop,
}

impl Outcome {
    fn stop_when(hit: bool) -> Self {
        if hit { Self::Stop } else { Self::Continue }
    }
}

/// How a walker treats nodes that are reached more than once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CycleGuard {
    /// Track visited nodes and fail with [`WalkError::Revisit`] or
    /// [`WalkError::AncestorCycle`] on a repeat.
    #[default]
    Detect,
    /// Assume the tree is acyclic and skip the bookkeeping.
    ///
    /// A walk over a cyclic tree does not terminate in this mode.
    Trust,
}

/// Stateless traversal over a borrowed [`TreeAccess`].
///
/// ## Example
///
/// ```rust
/// use understory_visual_tree::{ElementKind, ElementTree, Filter, TreeWalker};
///
/// let mut tree = ElementTree::new();
/// let window = tree.insert(None, ElementKind::PANEL);
/// let toolbar = tree.insert(Some(window), ElementKind::PANEL);
/// let save = tree.insert_named(Some(toolbar), ElementKind::BUTTON, "save");
/// let status = tree.insert(Some(window), ElementKind::TEXT_BLOCK);
///
/// let walker = TreeWalker::new(&tree);
/// // Breadth-first: the toolbar (level 1) comes before the button (level 2).
/// assert_eq!(
///     walker.find_all(window, &Filter::Type(ElementKind::VISUAL)).unwrap(),
///     vec![toolbar, status, save],
/// );
/// assert_eq!(walker.find_by_name(window, "save").unwrap(), Some(save));
/// assert_eq!(
///     walker.find_parent_of_type(save, ElementKind::PANEL).unwrap(),
///     Some(toolbar),
/// );
/// ```
pub struct TreeWalker<'t, A: TreeAccess + ?Sized> {
    tree: &'t A,
    cycle_guard: CycleGuard,
}

impl<A: TreeAccess + ?Sized> core::fmt::Debug for TreeWalker<'_, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("cycle_guard", &self.cycle_guard)
            .finish_non_exhaustive()
    }
}

impl<A: TreeAccess + ?Sized> Clone for TreeWalker<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: TreeAccess + ?Sized> Copy for TreeWalker<'_, A> {}

impl<'t, A: TreeAccess + ?Sized> TreeWalker<'t, A> {
    /// Create a walker over `tree` with default settings.
    pub fn new(tree: &'t A) -> Self {
        Self {
            tree,
            cycle_guard: CycleGuard::default(),
        }
    }

    /// Return this walker with a different [`CycleGuard`].
    pub fn with_cycle_guard(mut self, guard: CycleGuard) -> Self {
        self.cycle_guard = guard;
        self
    }

    /// Set the [`CycleGuard`] used by subsequent walks.
    pub fn set_cycle_guard(&mut self, guard: CycleGuard) {
        self.cycle_guard = guard;
    }

    /// The current [`CycleGuard`].
    pub fn cycle_guard(&self) -> CycleGuard {
        self.cycle_guard
    }

    /// The tree this walker reads.
    pub fn tree(&self) -> &'t A {
        self.tree
    }

    // --- descendants ---

    /// Visit the descendants of `container` breadth-first.
    ///
    /// `visit` is called once per descendant, level by level, siblings in tree
    /// order. `container` itself is never visited. Empty child slots are
    /// skipped. Returns the node at which `visit` returned [`Outcome::Stop`],
    /// or `None` if every descendant was visited.
    pub fn walk_descendants<F>(
        &self,
        container: A::Node,
        mut visit: F,
    ) -> Result<Option<A::Node>, WalkError>
    where
        F: FnMut(A::Node) -> Outcome,
    {
        self.check_start(container)?;
        let mut seen = self.visited_set();
        if let Some(seen) = seen.as_mut() {
            seen.insert(container);
        }

        let mut queue = VecDeque::new();
        self.enqueue_children(container, 1, &mut queue, &mut seen)?;

        let mut visited = 0_usize;
        while let Some((node, depth)) = queue.pop_front() {
            visited += 1;
            if visit(node) == Outcome::Stop {
                log::trace!("descendant walk stopped after {visited} nodes at depth {depth}");
                return Ok(Some(node));
            }
            self.enqueue_children(node, depth + 1, &mut queue, &mut seen)?;
        }
        log::trace!("descendant walk visited {visited} nodes");
        Ok(None)
    }

    /// First descendant of `container` matching `filter`, in breadth-first order.
    pub fn find_first(
        &self,
        container: A::Node,
        filter: &Filter<'_, A::Node, A::TypeTag>,
    ) -> Result<Option<A::Node>, WalkError> {
        self.walk_descendants(container, |node| {
            Outcome::stop_when(filter.matches(self.tree, node))
        })
    }

    /// Every descendant of `container` matching `filter`, in breadth-first order.
    pub fn find_all(
        &self,
        container: A::Node,
        filter: &Filter<'_, A::Node, A::TypeTag>,
    ) -> Result<Vec<A::Node>, WalkError> {
        let mut found = Vec::new();
        self.walk_descendants(container, |node| {
            if filter.matches(self.tree, node) {
                found.push(node);
            }
            Outcome::Continue
        })?;
        Ok(found)
    }

    /// First descendant of `container` that is an instance of `tag`.
    pub fn find_first_of_type(
        &self,
        container: A::Node,
        tag: A::TypeTag,
    ) -> Result<Option<A::Node>, WalkError> {
        self.find_first(container, &Filter::Type(tag))
    }

    /// Every descendant of `container` that is an instance of `tag`.
    pub fn find_all_of_type(
        &self,
        container: A::Node,
        tag: A::TypeTag,
    ) -> Result<Vec<A::Node>, WalkError> {
        self.find_all(container, &Filter::Type(tag))
    }

    /// First descendant of `container` whose name is exactly `name`.
    ///
    /// An empty `name` returns `Ok(None)` without touching the tree.
    pub fn find_by_name(
        &self,
        container: A::Node,
        name: &str,
    ) -> Result<Option<A::Node>, WalkError> {
        if name.is_empty() {
            return Ok(None);
        }
        self.find_first(container, &Filter::Named(name))
    }

    // --- ascendants ---

    /// Visit the ancestors of `child`, nearest first.
    ///
    /// `child` itself is never visited. Returns the ancestor at which `visit`
    /// returned [`Outcome::Stop`], or `None` once a root has been visited.
    pub fn walk_ancestors<F>(
        &self,
        child: A::Node,
        mut visit: F,
    ) -> Result<Option<A::Node>, WalkError>
    where
        F: FnMut(A::Node) -> Outcome,
    {
        self.check_start(child)?;
        let mut seen = self.visited_set();
        if let Some(seen) = seen.as_mut() {
            seen.insert(child);
        }

        let mut steps = 0_usize;
        let mut current = child;
        while let Some(parent) = self.tree.parent_of(current) {
            steps += 1;
            if let Some(seen) = seen.as_mut()
                && !seen.insert(parent)
            {
                log::debug!("parent chain loops after {steps} steps");
                return Err(WalkError::AncestorCycle { steps });
            }
            if visit(parent) == Outcome::Stop {
                log::trace!("ancestor walk stopped after {steps} steps");
                return Ok(Some(parent));
            }
            current = parent;
        }
        log::trace!("ancestor walk reached a root after {steps} steps");
        Ok(None)
    }

    /// Nearest ancestor of `child` matching `filter`.
    pub fn find_parent(
        &self,
        child: A::Node,
        filter: &Filter<'_, A::Node, A::TypeTag>,
    ) -> Result<Option<A::Node>, WalkError> {
        self.walk_ancestors(child, |node| {
            Outcome::stop_when(filter.matches(self.tree, node))
        })
    }

    /// Nearest ancestor of `child` that is an instance of `tag`.
    pub fn find_parent_of_type(
        &self,
        child: A::Node,
        tag: A::TypeTag,
    ) -> Result<Option<A::Node>, WalkError> {
        self.find_parent(child, &Filter::Type(tag))
    }

    /// Nearest ancestor of `child` whose name is exactly `name`.
    ///
    /// An empty `name` returns `Ok(None)` without touching the tree.
    pub fn find_parent_by_name(
        &self,
        child: A::Node,
        name: &str,
    ) -> Result<Option<A::Node>, WalkError> {
        if name.is_empty() {
            return Ok(None);
        }
        self.find_parent(child, &Filter::Named(name))
    }

    // --- overlays ---

    /// Overlays currently open over `root`, exactly as the tree reports them.
    pub fn open_overlays(&self, root: A::Node) -> Vec<A::Node> {
        self.tree.open_overlays(root)
    }

    // --- internals ---

    fn check_start(&self, node: A::Node) -> Result<(), WalkError> {
        if self.tree.contains(node) {
            Ok(())
        } else {
            log::debug!("walk started from a node that is not part of the tree");
            Err(WalkError::StaleNode)
        }
    }

    fn visited_set(&self) -> Option<HashSet<A::Node>> {
        match self.cycle_guard {
            CycleGuard::Detect => Some(HashSet::new()),
            CycleGuard::Trust => None,
        }
    }

    fn enqueue_children(
        &self,
        node: A::Node,
        depth: usize,
        queue: &mut VecDeque<(A::Node, usize)>,
        seen: &mut Option<HashSet<A::Node>>,
    ) -> Result<(), WalkError> {
        for index in 0..self.tree.child_count(node) {
            let Some(child) = self.tree.child_at(node, index) else {
                continue;
            };
            if let Some(seen) = seen.as_mut()
                && !seen.insert(child)
            {
                log::debug!("descendant walk reached a node twice at depth {depth}");
                return Err(WalkError::Revisit { depth });
            }
            queue.push_back((child, depth));
        }
        Ok(())
    }
}
