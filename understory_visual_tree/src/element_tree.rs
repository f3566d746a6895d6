// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element tree: structure, names, overlays.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::access::TreeAccess;
use crate::types::{ElementId, ElementKind};
use crate::walker::TreeWalker;

/// Arena-backed element hierarchy implementing [`TreeAccess`].
///
/// Elements carry an [`ElementKind`], an optional name, and an ordered child
/// list. Overlays (popups, flyouts) are elements inserted as separate roots
/// and then registered as open over an anchor root with
/// [`ElementTree::open_overlay`]; they are not children of that root.
///
/// Identifiers are generational: after [`ElementTree::remove`] a stale
/// [`ElementId`] is ignored by mutators and yields `None` or an empty slice
/// from accessors.
///
/// ## Example
///
/// ```rust
/// use understory_visual_tree::{ElementKind, ElementTree};
///
/// let mut tree = ElementTree::new();
/// let window = tree.insert(None, ElementKind::PANEL);
/// let menu = tree.insert_named(None, ElementKind::POPUP, "context_menu");
/// let item = tree.insert(Some(menu), ElementKind::BUTTON);
///
/// assert!(tree.open_overlay(window, menu));
///
/// let walker = tree.walker();
/// assert_eq!(walker.open_overlays(window), vec![menu]);
/// // Overlay content is reachable from the overlay, not from the window.
/// assert_eq!(walker.find_first_of_type(window, ElementKind::BUTTON).unwrap(), None);
/// assert_eq!(walker.find_first_of_type(menu, ElementKind::BUTTON).unwrap(), Some(item));
/// ```
#[derive(Default)]
pub struct ElementTree {
    /// slots
    nodes: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// open overlays per anchor root, oldest first
    overlays: HashMap<ElementId, Vec<ElementId>>,
}

impl core::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementTree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("overlay_anchors", &self.overlays.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    kind: ElementKind,
    name: Option<String>,
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
}

impl Element {
    fn new(generation: u32, kind: ElementKind, name: Option<String>) -> Self {
        Self {
            generation,
            kind,
            name,
            parent: None,
            children: SmallVec::new(),
        }
    }
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`TreeWalker`] over this tree with default settings.
    pub fn walker(&self) -> TreeWalker<'_, Self> {
        TreeWalker::new(self)
    }

    /// Insert an unnamed element as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the element as a root.
    pub fn insert(&mut self, parent: Option<ElementId>, kind: ElementKind) -> ElementId {
        self.insert_element(parent, kind, None)
    }

    /// Insert a named element as the last child of `parent` (or as a root if `None`).
    ///
    /// An empty `name` leaves the element unnamed.
    pub fn insert_named(
        &mut self,
        parent: Option<ElementId>,
        kind: ElementKind,
        name: impl Into<String>,
    ) -> ElementId {
        self.insert_element(parent, kind, non_empty(name.into()))
    }

    fn insert_element(
        &mut self,
        parent: Option<ElementId>,
        kind: ElementKind,
        name: Option<String>,
    ) -> ElementId {
        let id = self.alloc_slot();
        self.nodes[id.idx()] = Some(Element::new(id.generation(), kind, name));
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Claim an empty slot, preferring freed ones, and bump its generation.
    fn alloc_slot(&mut self) -> ElementId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].saturating_add(1);
            idx
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            self.nodes.len() - 1
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "element slots are addressed with 32-bit indices"
        )]
        ElementId::new(idx as u32, self.generations[idx])
    }

    /// Remove an element and its subtree.
    ///
    /// Overlays anchored to a removed element are closed, and removed elements
    /// are unregistered from any overlay list they appear in. Overlay elements
    /// themselves are separate roots and stay alive when their anchor goes.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.element(id).and_then(|e| e.parent) {
            self.unlink_parent(id, parent);
        }
        self.remove_subtree(id);
        self.overlays.retain(|_, open| !open.is_empty());
    }

    fn remove_subtree(&mut self, id: ElementId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(element) = self.nodes[id.idx()].take() else {
                continue;
            };
            pending.extend(element.children);
            self.overlays.remove(&id);
            for open in self.overlays.values_mut() {
                open.retain(|o| *o != id);
            }
            self.free_list.push(id.idx());
        }
    }

    /// Move `id` to the end of `new_parent`'s children (or make it a root if `None`).
    ///
    /// Returns `false` and leaves the tree unchanged if either id is stale or
    /// if `new_parent` is `id` or one of its descendants.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) {
                return false;
            }
            let mut cur = Some(p);
            while let Some(c) = cur {
                if c == id {
                    return false;
                }
                cur = self.parent_of(c);
            }
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        true
    }

    /// Replace the name of a live element. `Some("")` clears it.
    pub fn set_name(&mut self, id: ElementId, name: Option<String>) {
        if let Some(e) = self.element_mut(id) {
            e.name = name.and_then(non_empty);
        }
    }

    /// Replace the kind of a live element.
    pub fn set_kind(&mut self, id: ElementId, kind: ElementKind) {
        if let Some(e) = self.element_mut(id) {
            e.kind = kind;
        }
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the tree has no live elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(Option::is_none)
    }

    /// Kind of a live element.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.element(id).map(|e| e.kind)
    }

    /// Name of a live element, if it has one.
    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.element(id).and_then(|e| e.name.as_deref())
    }

    /// Returns the parent of an element if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|e| e.parent)
    }

    /// Get the children of an element, or empty slice if the element is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    // --- overlays ---

    /// Register `overlay` as open over `root`.
    ///
    /// Overlays are kept in opening order, topmost last. Opening an overlay
    /// that is already open over `root` moves it to the top. Returns `false`
    /// if either id is stale or both are the same element.
    pub fn open_overlay(&mut self, root: ElementId, overlay: ElementId) -> bool {
        if root == overlay || !self.is_alive(root) || !self.is_alive(overlay) {
            return false;
        }
        let open = self.overlays.entry(root).or_default();
        open.retain(|o| *o != overlay);
        open.push(overlay);
        true
    }

    /// Unregister `overlay` from `root`. Returns `true` if it was open.
    pub fn close_overlay(&mut self, root: ElementId, overlay: ElementId) -> bool {
        let Some(open) = self.overlays.get_mut(&root) else {
            return false;
        };
        let before = open.len();
        open.retain(|o| *o != overlay);
        let closed = open.len() != before;
        if open.is_empty() {
            self.overlays.remove(&root);
        }
        closed
    }

    /// Overlays open over `root`, oldest first.
    pub fn overlays_of(&self, root: ElementId) -> &[ElementId] {
        self.overlays
            .get(&root)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // --- internals ---

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|e| e.generation == id.generation())
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|e| e.generation == id.generation())
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.element_mut(parent) {
            p.children.push(id);
        }
        if let Some(e) = self.element_mut(id) {
            e.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.element_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(e) = self.element_mut(id) {
            e.parent = None;
        }
    }
}

fn non_empty(name: String) -> Option<String> {
    (!name.is_empty()).then_some(name)
}

impl TreeAccess for ElementTree {
    type Node = ElementId;
    type TypeTag = ElementKind;

    fn contains(&self, node: ElementId) -> bool {
        self.is_alive(node)
    }

    fn child_count(&self, node: ElementId) -> usize {
        self.children_of(node).len()
    }

    fn child_at(&self, node: ElementId, index: usize) -> Option<ElementId> {
        self.children_of(node).get(index).copied()
    }

    fn parent_of(&self, node: ElementId) -> Option<ElementId> {
        self.element(node).and_then(|e| e.parent)
    }

    fn name_of(&self, node: ElementId) -> Option<&str> {
        self.name(node)
    }

    fn is_instance_of(&self, node: ElementId, tag: &ElementKind) -> bool {
        self.kind(node).is_some_and(|kind| kind.contains(*tag))
    }

    fn open_overlays(&self, root: ElementId) -> Vec<ElementId> {
        self.overlays_of(root).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Filter, WalkError};

    // window -> [header -> [title, close], body -> [form -> [name, ok, cancel]]]
    struct Window {
        tree: ElementTree,
        window: ElementId,
        header: ElementId,
        title: ElementId,
        close: ElementId,
        body: ElementId,
        form: ElementId,
        name: ElementId,
        ok: ElementId,
        cancel: ElementId,
    }

    fn window() -> Window {
        let mut tree = ElementTree::new();
        let window = tree.insert_named(None, ElementKind::PANEL, "window");
        let header = tree.insert_named(Some(window), ElementKind::PANEL, "header");
        let title = tree.insert(Some(header), ElementKind::TEXT_BLOCK);
        let close = tree.insert_named(Some(header), ElementKind::BUTTON, "close");
        let body = tree.insert_named(Some(window), ElementKind::PANEL, "body");
        let form = tree.insert(Some(body), ElementKind::PANEL);
        let name = tree.insert_named(Some(form), ElementKind::TEXT_BOX, "name");
        let ok = tree.insert_named(Some(form), ElementKind::BUTTON, "ok");
        let cancel = tree.insert_named(Some(form), ElementKind::BUTTON, "cancel");
        Window {
            tree,
            window,
            header,
            title,
            close,
            body,
            form,
            name,
            ok,
            cancel,
        }
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, ElementKind::PANEL);
        let a = tree.insert(Some(root), ElementKind::BUTTON);
        assert!(tree.is_alive(root));
        assert!(tree.is_alive(a));

        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.kind(a), None);

        let b = tree.insert(Some(root), ElementKind::IMAGE);
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert_eq!(tree.children_of(root), &[b]);
    }

    #[test]
    fn remove_takes_the_subtree() {
        let mut w = window();
        assert_eq!(w.tree.len(), 9);
        w.tree.remove(w.body);
        assert_eq!(w.tree.len(), 4);
        for id in [w.body, w.form, w.name, w.ok, w.cancel] {
            assert!(!w.tree.is_alive(id));
        }
        assert_eq!(w.tree.children_of(w.window), &[w.header]);

        w.tree.remove(w.window);
        assert!(w.tree.is_empty());
    }

    #[test]
    fn remove_deep_chain() {
        let mut tree = ElementTree::new();
        let root = tree.insert(None, ElementKind::PANEL);
        let mut tip = root;
        for _ in 0..100_000 {
            tip = tree.insert(Some(tip), ElementKind::PANEL);
        }
        assert_eq!(tree.len(), 100_001);
        assert_eq!(
            tree.walker().find_all_of_type(root, ElementKind::PANEL).unwrap().len(),
            100_000
        );

        tree.remove(root);
        assert!(tree.is_empty());
        assert!(!tree.is_alive(tip));
        assert_eq!(tree.free_list.len(), 100_001);
    }

    #[test]
    fn stale_parent_inserts_root() {
        let mut tree = ElementTree::new();
        let gone = tree.insert(None, ElementKind::PANEL);
        tree.remove(gone);
        let orphan = tree.insert(Some(gone), ElementKind::BUTTON);
        assert!(tree.is_alive(orphan));
        assert_eq!(tree.parent_of(orphan), None);
    }

    #[test]
    fn accessors_respect_liveness() {
        let mut w = window();
        assert_eq!(w.tree.parent_of(w.ok), Some(w.form));
        assert_eq!(w.tree.parent_of(w.window), None);
        assert_eq!(w.tree.name(w.ok), Some("ok"));
        assert_eq!(w.tree.name(w.title), None);
        assert_eq!(w.tree.kind(w.ok), Some(ElementKind::BUTTON));

        w.tree.remove(w.ok);
        assert_eq!(w.tree.parent_of(w.ok), None);
        assert_eq!(w.tree.name(w.ok), None);
        assert!(w.tree.children_of(w.ok).is_empty());
        assert_eq!(w.tree.children_of(w.form), &[w.name, w.cancel]);
    }

    #[test]
    fn reparent_moves_and_refuses_cycles() {
        let mut w = window();
        assert!(w.tree.reparent(w.close, Some(w.form)));
        assert_eq!(w.tree.children_of(w.header), &[w.title]);
        assert_eq!(w.tree.children_of(w.form), &[w.name, w.ok, w.cancel, w.close]);
        assert_eq!(w.tree.parent_of(w.close), Some(w.form));

        // Onto itself or a descendant.
        assert!(!w.tree.reparent(w.body, Some(w.body)));
        assert!(!w.tree.reparent(w.body, Some(w.ok)));
        assert_eq!(w.tree.parent_of(w.body), Some(w.window));

        assert!(w.tree.reparent(w.body, None));
        assert_eq!(w.tree.parent_of(w.body), None);
        assert_eq!(w.tree.children_of(w.window), &[w.header]);
    }

    #[test]
    fn set_name_and_kind() {
        let mut w = window();
        w.tree.set_name(w.title, Some("title".into()));
        w.tree.set_name(w.ok, None);
        w.tree.set_kind(w.title, ElementKind::IMAGE);
        assert_eq!(w.tree.name(w.title), Some("title"));
        assert_eq!(w.tree.name(w.ok), None);
        assert_eq!(w.tree.kind(w.title), Some(ElementKind::IMAGE));

        w.tree.set_name(w.close, Some(String::new()));
        assert_eq!(w.tree.name(w.close), None);
    }

    #[test]
    fn empty_name_means_unnamed() {
        let mut w = window();
        let blank = w.tree.insert_named(Some(w.window), ElementKind::BUTTON, "");
        assert_eq!(w.tree.name(blank), None);

        let walker = w.tree.walker();
        assert_eq!(walker.find_by_name(w.window, "").unwrap(), None);
        assert_eq!(walker.find_first(w.window, &Filter::Named("")).unwrap(), None);
        assert_eq!(walker.find_parent_by_name(blank, "").unwrap(), None);
    }

    #[test]
    fn type_checks_follow_kind_hierarchy() {
        let w = window();
        assert!(w.tree.is_instance_of(w.ok, &ElementKind::BUTTON));
        assert!(w.tree.is_instance_of(w.ok, &ElementKind::CONTENT_CONTROL));
        assert!(w.tree.is_instance_of(w.ok, &ElementKind::CONTROL));
        assert!(w.tree.is_instance_of(w.ok, &ElementKind::VISUAL));
        assert!(!w.tree.is_instance_of(w.ok, &ElementKind::PANEL));
        assert!(w.tree.is_instance_of(w.name, &ElementKind::CONTROL));
        assert!(!w.tree.is_instance_of(w.name, &ElementKind::CONTENT_CONTROL));
    }

    #[test]
    fn walker_finds_controls_breadth_first() {
        let w = window();
        let walker = w.tree.walker();
        assert_eq!(
            walker
                .find_all_of_type(w.window, ElementKind::CONTROL)
                .unwrap(),
            vec![w.close, w.name, w.ok, w.cancel]
        );
        assert_eq!(
            walker
                .find_first_of_type(w.window, ElementKind::BUTTON)
                .unwrap(),
            Some(w.close)
        );
        assert_eq!(
            walker
                .find_first_of_type(w.body, ElementKind::BUTTON)
                .unwrap(),
            Some(w.ok)
        );
        assert_eq!(
            walker.find_all_of_type(w.window, ElementKind::PANEL).unwrap(),
            vec![w.header, w.body, w.form]
        );
    }

    #[test]
    fn walker_finds_by_name() {
        let w = window();
        let walker = w.tree.walker();
        assert_eq!(walker.find_by_name(w.window, "cancel").unwrap(), Some(w.cancel));
        assert_eq!(walker.find_by_name(w.header, "cancel").unwrap(), None);
        assert_eq!(walker.find_by_name(w.window, "window").unwrap(), None);
        assert_eq!(walker.find_parent_by_name(w.ok, "body").unwrap(), Some(w.body));
        assert_eq!(walker.find_parent_by_name(w.ok, "header").unwrap(), None);
    }

    #[test]
    fn walker_finds_parents_by_type() {
        let w = window();
        let walker = w.tree.walker();
        assert_eq!(
            walker.find_parent_of_type(w.ok, ElementKind::PANEL).unwrap(),
            Some(w.form)
        );
        assert_eq!(
            walker.find_parent_of_type(w.ok, ElementKind::CONTROL).unwrap(),
            None
        );
        let named_panel = |id: ElementId| {
            w.tree.is_instance_of(id, &ElementKind::PANEL) && w.tree.name(id).is_some()
        };
        assert_eq!(
            walker
                .find_parent(w.ok, &Filter::Predicate(&named_panel))
                .unwrap(),
            Some(w.body)
        );
    }

    #[test]
    fn walker_rejects_removed_start() {
        let mut w = window();
        w.tree.remove(w.form);
        let walker = w.tree.walker();
        assert_eq!(
            walker.find_first_of_type(w.form, ElementKind::BUTTON),
            Err(WalkError::StaleNode)
        );
        assert_eq!(
            walker.find_parent_by_name(w.ok, "body"),
            Err(WalkError::StaleNode)
        );
    }

    #[test]
    fn overlays_open_in_order_and_reopen_on_top() {
        let mut w = window();
        let tooltip = w.tree.insert(None, ElementKind::POPUP);
        let menu = w.tree.insert(None, ElementKind::POPUP);
        assert!(w.tree.open_overlay(w.window, tooltip));
        assert!(w.tree.open_overlay(w.window, menu));
        assert_eq!(w.tree.overlays_of(w.window), &[tooltip, menu]);

        assert!(w.tree.open_overlay(w.window, tooltip));
        assert_eq!(w.tree.overlays_of(w.window), &[menu, tooltip]);
        assert_eq!(w.tree.walker().open_overlays(w.window), vec![menu, tooltip]);

        assert!(w.tree.close_overlay(w.window, menu));
        assert!(!w.tree.close_overlay(w.window, menu));
        assert_eq!(w.tree.overlays_of(w.window), &[tooltip]);
        assert!(w.tree.overlays_of(w.body).is_empty());
    }

    #[test]
    fn open_overlay_rejects_stale_and_self() {
        let mut w = window();
        let popup = w.tree.insert(None, ElementKind::POPUP);
        assert!(!w.tree.open_overlay(w.window, w.window));
        w.tree.remove(popup);
        assert!(!w.tree.open_overlay(w.window, popup));
        assert!(w.tree.overlays_of(w.window).is_empty());
    }

    #[test]
    fn remove_cleans_overlay_registry() {
        let mut w = window();
        let popup = w.tree.insert(None, ElementKind::POPUP);
        let flyout = w.tree.insert(None, ElementKind::POPUP);
        assert!(w.tree.open_overlay(w.window, popup));
        assert!(w.tree.open_overlay(w.window, flyout));
        assert!(w.tree.open_overlay(w.form, flyout));

        w.tree.remove(popup);
        assert_eq!(w.tree.overlays_of(w.window), &[flyout]);

        // Anchor removal closes its overlays but keeps the overlay element.
        w.tree.remove(w.body);
        assert!(w.tree.overlays_of(w.form).is_empty());
        assert!(w.tree.is_alive(flyout));
        assert_eq!(w.tree.overlays_of(w.window), &[flyout]);
    }
}
