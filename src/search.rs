//! Client-side search
//!
//! The filter is a pure function over the flattened catalog. The search box
//! state keeps only the query text and cursor; whether search is active is
//! always derived from the query.

use std::sync::Arc;

use crate::models::Title;

/// Titles whose name or genre contains `query`, case-insensitively.
///
/// Input order is preserved. An empty query matches everything; callers that
/// treat an empty query as "search inactive" must check before filtering.
pub fn filter_titles(titles: &[Arc<Title>], query: &str) -> Vec<Arc<Title>> {
    let needle = query.to_lowercase();
    titles
        .iter()
        .filter(|t| matches(t, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lowercase
fn matches(title: &Title, needle: &str) -> bool {
    title.title.to_lowercase().contains(needle) || title.genre.to_lowercase().contains(needle)
}

/// Search box state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Search query
    pub query: String,
    /// Cursor position in query, counted in chars
    pub cursor: usize,
}

impl SearchState {
    /// Search is active iff the query is non-empty
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.query.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.query.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Clear query
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    /// Query split at the cursor, for drawing the caret
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.query.split_at(self.byte_index(self.cursor))
    }
}
