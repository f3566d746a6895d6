// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: element identifiers and kind tags.

/// Identifier for an element in an [`ElementTree`](crate::ElementTree) (generational).
///
/// A removed element's slot may be reused; the generation is bumped on reuse so
/// that stale identifiers never alias a newer element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Type tags for elements, encoded as an "is-a" hierarchy.
    ///
    /// Every concrete kind includes the bits of its base kinds, so a type check
    /// against a base kind is a plain [`contains`](Self::contains):
    ///
    /// ```rust
    /// use understory_visual_tree::ElementKind;
    ///
    /// assert!(ElementKind::BUTTON.contains(ElementKind::CONTROL));
    /// assert!(ElementKind::BUTTON.contains(ElementKind::VISUAL));
    /// assert!(!ElementKind::CONTROL.contains(ElementKind::BUTTON));
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementKind: u16 {
        /// Base kind shared by every element.
        const VISUAL = 0b0000_0001;
        /// Layout container (stack, grid, canvas).
        const PANEL = Self::VISUAL.bits() | 0b0000_0010;
        /// Interactive control.
        const CONTROL = Self::VISUAL.bits() | 0b0000_0100;
        /// Control hosting a single content element.
        const CONTENT_CONTROL = Self::CONTROL.bits() | 0b0000_1000;
        /// Clickable button.
        const BUTTON = Self::CONTENT_CONTROL.bits() | 0b0001_0000;
        /// Text input control.
        const TEXT_BOX = Self::CONTROL.bits() | 0b0010_0000;
        /// Read-only text run.
        const TEXT_BLOCK = Self::VISUAL.bits() | 0b0100_0000;
        /// Image or other leaf media.
        const IMAGE = Self::VISUAL.bits() | 0b1000_0000;
        /// Transient overlay host (popup, flyout, tooltip).
        const POPUP = Self::VISUAL.bits() | 0b0001_0000_0000;
    }
}

impl Default for ElementKind {
    fn default() -> Self {
        Self::VISUAL
    }
}
