// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_visual_tree --heading-base-level=0

//! Understory Visual Tree: descendant, ascendant, and overlay queries over UI element trees.
//!
//! ## Overview
//!
//! This crate answers the questions UI code keeps asking of its element tree:
//! "find the first button under this panel", "find every text box in this form",
//! "which element named `ok` lives in this dialog", "which scroll viewer contains
//! this item", and "which popups are open over this window".
//!
//! It does not own a tree. Instead, any hierarchy that implements [`TreeAccess`]
//! (child count, child at index, parent, name, type check, open overlays) can be
//! walked with a [`TreeWalker`].
//! [`ElementTree`] is a small arena-backed implementation for tests, tools, and
//! hosts that do not already have a tree of their own.
//!
//! ## Traversal
//!
//! - Descendant searches ([`TreeWalker::find_first`], [`TreeWalker::find_all`],
//!   [`TreeWalker::find_by_name`]) are breadth-first: all children of the
//!   container, then all grandchildren, and so on, siblings in tree order.
//! - Ascendant searches ([`TreeWalker::find_parent`],
//!   [`TreeWalker::find_parent_by_name`]) follow the parent chain upward.
//! - The starting node is never reported as a match.
//! - [`TreeWalker::open_overlays`] forwards to the tree unchanged.
//!
//! Matches are selected with a [`Filter`]: a type tag, an exact name, or any
//! predicate.
//!
//! ## Results
//!
//! Not finding anything is `Ok(None)` or an empty vector. A [`WalkError`] means
//! the starting node is not part of the tree, or the tree is not a tree (a node
//! reachable twice, or a looping parent chain). Cycle detection is on by default
//! and can be turned off with [`CycleGuard::Trust`] for hosts that guarantee an
//! acyclic hierarchy.
//!
//! ## Example
//!
//! ```rust
//! use understory_visual_tree::{ElementKind, ElementTree, Filter};
//!
//! let mut tree = ElementTree::new();
//! let dialog = tree.insert_named(None, ElementKind::PANEL, "dialog");
//! let form = tree.insert(Some(dialog), ElementKind::PANEL);
//! let email = tree.insert_named(Some(form), ElementKind::TEXT_BOX, "email");
//! let ok = tree.insert_named(Some(dialog), ElementKind::BUTTON, "ok");
//!
//! let walker = tree.walker();
//!
//! // Level 1 is searched before level 2.
//! assert_eq!(walker.find_first_of_type(dialog, ElementKind::CONTROL).unwrap(), Some(ok));
//! assert_eq!(walker.find_by_name(dialog, "email").unwrap(), Some(email));
//!
//! // Any predicate works as a filter.
//! let unnamed = |id| tree.name(id).is_none();
//! assert_eq!(walker.find_all(dialog, &Filter::Predicate(&unnamed)).unwrap(), vec![form]);
//!
//! // Up the parent chain.
//! assert_eq!(walker.find_parent_by_name(email, "dialog").unwrap(), Some(dialog));
//! ```
//!
//! ## Logging
//!
//! Walks report their outcome through the [`log`] facade at `trace` level, and
//! failures at `debug` level. Nothing is emitted unless the host installs a logger.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod access;
mod element_tree;
mod error;
mod filter;
mod types;
mod walker;

pub use access::TreeAccess;
pub use element_tree::ElementTree;
pub use error::WalkError;
pub use filter::Filter;
pub use types::{ElementId, ElementKind};
pub use walker::{CycleGuard, Outcome, TreeWalker};
