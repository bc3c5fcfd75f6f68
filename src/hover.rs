//! Card hover presenter state
//!
//! Every card gets its own small record, keyed by where the card sits. No
//! record is ever read or written on behalf of another card.

use std::collections::HashMap;

use crate::api::Artwork;
use crate::models::Category;

/// Part of the screen a card is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Row(Category),
    SearchResults,
}

/// Identity of one card on screen.
///
/// The slot index is part of the key because the same title can appear twice
/// in one section (the flattened search list keeps duplicates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub section: Section,
    pub slot: usize,
    pub id: u64,
}

impl CardKey {
    pub fn new(section: Section, slot: usize, id: u64) -> Self {
        Self { section, slot, id }
    }
}

/// Which layout a card is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    /// Poster with title and year
    Compact,
    /// Muted preview, quick actions and metadata
    Expanded,
}

/// Transient presentation state of one card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    pub hovered: bool,
    /// Poster resolved (either the real image or the placeholder)
    pub preview_ready: bool,
    pub artwork: Artwork,
    pub(crate) probe_requested: bool,
}

impl CardState {
    pub fn variant(&self) -> CardVariant {
        if self.hovered {
            CardVariant::Expanded
        } else {
            CardVariant::Compact
        }
    }
}

/// Hover records for every card that has been interacted with
#[derive(Debug, Default)]
pub struct HoverBook {
    cards: HashMap<CardKey, CardState>,
    pointer: Option<CardKey>,
}

impl HoverBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer or focus entered `key`.
    ///
    /// The card that previously held the pointer gets its leave event. Returns
    /// `true` the first time a card is hovered, meaning its artwork should be
    /// probed.
    pub fn enter(&mut self, key: CardKey) -> bool {
        if self.pointer == Some(key) {
            return false;
        }
        if let Some(prev) = self.pointer.take() {
            self.leave(prev);
        }
        self.pointer = Some(key);

        let card = self.cards.entry(key).or_default();
        card.hovered = true;
        if card.probe_requested {
            false
        } else {
            card.probe_requested = true;
            true
        }
    }

    /// Pointer or focus left `key`
    pub fn leave(&mut self, key: CardKey) {
        if let Some(card) = self.cards.get_mut(&key) {
            card.hovered = false;
        }
        if self.pointer == Some(key) {
            self.pointer = None;
        }
    }

    /// Nothing is hovered any more (focus moved to the hero or the player)
    pub fn leave_all(&mut self) {
        if let Some(prev) = self.pointer.take() {
            self.leave(prev);
        }
    }

    /// Card currently holding the pointer
    pub fn hovered(&self) -> Option<CardKey> {
        self.pointer
    }

    /// Artwork probe finished for `key`
    pub fn set_artwork(&mut self, key: CardKey, artwork: Artwork) {
        let card = self.cards.entry(key).or_default();
        card.artwork = artwork;
        card.preview_ready = artwork != Artwork::Pending;
    }

    /// State of one card (default for cards never touched)
    pub fn state(&self, key: &CardKey) -> CardState {
        self.cards.get(key).copied().unwrap_or_default()
    }

    /// Drop every record of one section, e.g. when the result set changes
    pub fn clear_section(&mut self, section: Section) {
        self.cards.retain(|k, _| k.section != section);
        if self.pointer.map(|k| k.section) == Some(section) {
            self.pointer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(slot: usize, id: u64) -> CardKey {
        CardKey::new(Section::Row(Category::Trending), slot, id)
    }

    #[test]
    fn test_enter_expands_only_that_card() {
        let mut book = HoverBook::new();
        let a = key(0, 1);
        let b = key(1, 2);
        let c = CardKey::new(Section::Row(Category::Popular), 0, 1);

        book.enter(a);
        assert_eq!(book.state(&a).variant(), CardVariant::Expanded);
        assert_eq!(book.state(&b).variant(), CardVariant::Compact);
        assert_eq!(book.state(&c).variant(), CardVariant::Compact);
    }

    #[test]
    fn test_moving_pointer_leaves_previous_card() {
        let mut book = HoverBook::new();
        let a = key(0, 1);
        let b = key(1, 2);
        book.enter(a);
        book.enter(b);
        assert!(!book.state(&a).hovered);
        assert!(book.state(&b).hovered);
        assert_eq!(book.hovered(), Some(b));
    }

    #[test]
    fn test_probe_requested_once() {
        let mut book = HoverBook::new();
        let a = key(0, 1);
        assert!(book.enter(a));
        book.leave(a);
        assert!(!book.enter(a));
    }

    #[test]
    fn test_artwork_marks_preview_ready() {
        let mut book = HoverBook::new();
        let a = key(0, 1);
        let b = key(1, 2);
        book.set_artwork(a, Artwork::Placeholder);
        assert!(book.state(&a).preview_ready);
        assert_eq!(book.state(&a).artwork, Artwork::Placeholder);
        assert!(!book.state(&b).preview_ready);
    }

    #[test]
    fn test_clear_section() {
        let mut book = HoverBook::new();
        let row = key(0, 1);
        let result = CardKey::new(Section::SearchResults, 0, 1);
        book.enter(row);
        book.enter(result);
        book.clear_section(Section::SearchResults);
        assert_eq!(book.hovered(), None);
        assert_eq!(book.state(&result), CardState::default());
        assert!(!book.state(&row).hovered);
    }
}
