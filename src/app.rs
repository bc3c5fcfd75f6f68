//! App state and core application logic
//!
//! The orchestrator: owns the catalog store, the search box, per-row scroll
//! positions, card hover records and the player controller, and routes every
//! keyboard and mouse intent to exactly one of them.
//!
//! Everything here is synchronous. Async work (catalog fetch, artwork probes,
//! the media driver) happens in tasks owned by `main`, which feed results back
//! through the `on_*` methods.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::api::{Artwork, CatalogError};
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::hover::{CardKey, HoverBook, Section};
use crate::models::*;
use crate::playback::PlayerController;
use crate::scroller::RowScroller;
use crate::search::{filter_titles, SearchState};
use crate::stream::{MediaCommand, MediaEvent, PlayerType};

/// Delay between the first browse frame and the hero preview starting
pub const HERO_PREVIEW_DELAY: Duration = Duration::from_millis(2000);

/// Columns reserved on each side of a row for the `‹`/`›` indicators
pub const ROW_GUTTER: u16 = 1;

// =============================================================================
// Views and Focus
// =============================================================================

/// Top-level view. Derived from the search query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// Hero and category rows
    Browsing,
    /// Filtered results grid
    SearchResults,
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

/// Keyboard focus while browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Hero,
    Row(Category),
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection over a flat list (the results grid is laid out row-major)
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection back by one
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection forward by one
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Move selection back by a page (a grid line)
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    /// Move selection forward by a page (a grid line)
    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Reset selection
    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        // Clamp selected to valid range
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// One category row: horizontal offset plus the focused card
#[derive(Debug, Clone, Default)]
pub struct RowState {
    pub scroller: RowScroller,
    pub selected: usize,
}

// =============================================================================
// Hero and Artwork
// =============================================================================

/// Featured-title panel state
#[derive(Debug, Clone)]
pub struct HeroState {
    /// Preview audio muted (independent of the player)
    pub muted: bool,
    /// When the preview is due to start
    pub preview_due: Option<Instant>,
    pub preview_started: bool,
    pub artwork: Artwork,
    probe_requested: bool,
}

impl Default for HeroState {
    fn default() -> Self {
        Self {
            muted: true,
            preview_due: None,
            preview_started: false,
            artwork: Artwork::Pending,
            probe_requested: false,
        }
    }
}

/// What an artwork probe result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    Hero,
    Card(CardKey),
}

/// Artwork probe for `main` to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub target: ProbeTarget,
    pub url: String,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Transient error message (popup, cleared on the next key)
    pub error: Option<String>,

    pub catalog: CatalogStore,
    pub search: SearchState,
    /// Titles matching the current query
    results: Vec<Arc<Title>>,
    pub results_list: ListState,
    /// Cards per line in the results grid
    pub results_columns: usize,

    pub focus: Focus,
    pub rows: [RowState; 5],
    pub hover: HoverBook,
    pub hero: HeroState,
    pub player: PlayerController,

    pub card_width: u16,
    pub player_type: PlayerType,
    hero_autoplay: bool,
    viewport_width: u16,
    probes: Vec<ProbeRequest>,
}

impl App {
    /// Create the app; player commands go to `media`
    pub fn new(config: &Config, player_type: PlayerType, media: UnboundedSender<MediaCommand>) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            error: None,

            catalog: CatalogStore::new(),
            search: SearchState::default(),
            results: Vec::new(),
            results_list: ListState::default(),
            results_columns: 1,

            focus: Focus::Hero,
            rows: Default::default(),
            hover: HoverBook::new(),
            hero: HeroState::default(),
            player: PlayerController::with_settings(
                media,
                config.controls_timeout(),
                config.seek_step(),
            ),

            card_width: config.card_width(),
            player_type,
            hero_autoplay: config.hero_autoplay,
            viewport_width: 0,
            probes: Vec::new(),
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Which top-level view is showing
    pub fn active_view(&self) -> ActiveView {
        if self.search.is_active() {
            ActiveView::SearchResults
        } else {
            ActiveView::Browsing
        }
    }

    /// Current results; empty whenever search is inactive
    pub fn results(&self) -> &[Arc<Title>] {
        &self.results
    }

    pub fn row_state(&self, category: Category) -> &RowState {
        &self.rows[category.index()]
    }

    // -------------------------------------------------------------------------
    // Async results
    // -------------------------------------------------------------------------

    /// The catalog fetch resolved
    pub fn on_catalog_loaded(&mut self, result: Result<Catalog, CatalogError>) {
        self.catalog.apply(result);
        self.catalog_settled();
    }

    /// Adopt a store that ran its own load. A ready store is never replaced.
    pub fn on_catalog_store(&mut self, store: CatalogStore) {
        if self.catalog.is_ready() {
            warn!("catalog already loaded, ignoring second store");
            return;
        }
        self.catalog = store;
        self.catalog_settled();
    }

    fn catalog_settled(&mut self) {
        if !self.catalog.is_ready() {
            return;
        }

        self.refresh_geometry();
        self.refresh_results();
        if let Some(hero) = self.catalog.hero() {
            if !self.hero.probe_requested {
                self.hero.probe_requested = true;
                self.probes.push(ProbeRequest {
                    target: ProbeTarget::Hero,
                    url: hero.background_image.clone(),
                });
            }
        }
        self.sync_hover();
    }

    /// An artwork probe finished
    pub fn on_artwork(&mut self, target: ProbeTarget, artwork: Artwork) {
        match target {
            ProbeTarget::Hero => self.hero.artwork = artwork,
            ProbeTarget::Card(key) => self.hover.set_artwork(key, artwork),
        }
    }

    /// A report from the media driver
    pub fn on_media_event(&mut self, event: MediaEvent) {
        if let MediaEvent::Failed(reason) = &event {
            self.set_error(format!("Playback failed: {}", reason));
        }
        self.player.on_media_event(event);
    }

    /// Artwork probes requested since the last call
    pub fn take_probe_requests(&mut self) -> Vec<ProbeRequest> {
        std::mem::take(&mut self.probes)
    }

    /// Advance timers: player controls auto-hide and the hero preview
    pub fn tick(&mut self, now: Instant) {
        self.player.tick(now);

        if self.hero.preview_started
            || !self.catalog.is_ready()
            || self.active_view() != ActiveView::Browsing
        {
            return;
        }
        match self.hero.preview_due {
            None => self.hero.preview_due = Some(now + HERO_PREVIEW_DELAY),
            Some(due) if now >= due => {
                self.hero.preview_started = true;
                debug!("hero preview started");
                if self.hero_autoplay && !self.player.is_open() {
                    if let Some(hero) = self.catalog.hero() {
                        let intent = PlayIntent::autoplay(hero.title.clone(), PlayOrigin::Hero);
                        self.player.open(intent, now);
                    }
                }
            }
            Some(_) => {}
        }
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Terminal width changed
    pub fn set_viewport(&mut self, width: u16) {
        if width != self.viewport_width {
            self.viewport_width = width;
            self.refresh_geometry();
        }
    }

    /// Columns a row has for cards
    pub fn row_viewport(&self) -> u16 {
        self.viewport_width.saturating_sub(ROW_GUTTER * 2)
    }

    fn refresh_geometry(&mut self) {
        let viewport = self.row_viewport() as u32;
        let card = self.card_width as u32;
        for category in Category::ALL {
            let len = self.catalog.row(category).len() as u32;
            let row = &mut self.rows[category.index()];
            row.scroller.set_geometry(len * card, viewport);
        }
        self.results_columns = ((viewport / card.max(1)) as usize).max(1);
        if let Focus::Row(category) = self.focus {
            self.reveal_selected(category);
        }
    }

    /// Pan `category` so its focused card is fully visible
    fn reveal_selected(&mut self, category: Category) {
        let card = self.card_width as u32;
        let row = &mut self.rows[category.index()];
        row.scroller.scroll_into_view(row.selected as u32 * card, card);
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
        self.sync_hover();
    }

    /// Explicit close: clears the query and returns to browsing
    pub fn close_search(&mut self) {
        debug!("closing search");
        self.search.clear();
        self.input_mode = InputMode::Normal;
        self.refresh_results();
        self.sync_hover();
    }

    /// Recompute results after the query changed
    fn refresh_results(&mut self) {
        self.hover.clear_section(Section::SearchResults);
        self.results_list.reset();
        if self.search.is_active() {
            self.results = filter_titles(&self.catalog.flattened_titles(), &self.search.query);
            debug!(query = %self.search.query, matches = self.results.len(), "search");
        } else {
            self.results.clear();
        }
        self.results_list.set_len(self.results.len());
    }

    // -------------------------------------------------------------------------
    // Play intents
    // -------------------------------------------------------------------------

    /// Route a play intent to the player
    pub fn play(&mut self, intent: PlayIntent, now: Instant) {
        self.player.open(intent, now);
    }

    /// Title drawn at `key`, if the key still matches what is on screen
    pub fn card_title(&self, key: &CardKey) -> Option<Arc<Title>> {
        let title = match key.section {
            Section::Row(category) => self.catalog.row(category).get(key.slot),
            Section::SearchResults => self.results.get(key.slot),
        }?;
        (title.id == key.id).then(|| title.clone())
    }

    /// Card that keyboard focus is on, if any
    pub fn focused_card(&self) -> Option<CardKey> {
        match (self.active_view(), self.input_mode) {
            (ActiveView::Browsing, _) => match self.focus {
                Focus::Hero => None,
                Focus::Row(category) => {
                    let slot = self.rows[category.index()].selected;
                    let title = self.catalog.row(category).get(slot)?;
                    Some(CardKey::new(Section::Row(category), slot, title.id))
                }
            },
            (ActiveView::SearchResults, InputMode::Normal) => {
                let slot = self.results_list.selected;
                let title = self.results.get(slot)?;
                Some(CardKey::new(Section::SearchResults, slot, title.id))
            }
            (ActiveView::SearchResults, InputMode::Editing) => None,
        }
    }

    fn play_card(&mut self, key: CardKey, now: Instant) {
        let Some(title) = self.card_title(&key) else {
            return;
        };
        let origin = match key.section {
            Section::Row(category) => PlayOrigin::Row(category),
            Section::SearchResults => PlayOrigin::SearchResult,
        };
        self.play(PlayIntent::explicit(title, origin), now);
    }

    fn play_focused(&mut self, now: Instant) {
        if self.active_view() == ActiveView::Browsing && self.focus == Focus::Hero {
            if let Some(hero) = self.catalog.hero() {
                let intent = PlayIntent::explicit(hero.title.clone(), PlayOrigin::Hero);
                self.play(intent, now);
            }
        } else if let Some(key) = self.focused_card() {
            self.play_card(key, now);
        }
    }

    // -------------------------------------------------------------------------
    // Hover
    // -------------------------------------------------------------------------

    /// Point the hover book at the focused card, probing artwork on first hover
    fn sync_hover(&mut self) {
        match self.focused_card() {
            Some(key) => {
                if self.hover.enter(key) {
                    if let Some(title) = self.card_title(&key) {
                        self.probes.push(ProbeRequest {
                            target: ProbeTarget::Card(key),
                            url: title.image.clone(),
                        });
                    }
                }
            }
            None => self.hover.leave_all(),
        }
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    /// Pointer moved; `card` is the card under it, if any
    pub fn pointer_moved(&mut self, card: Option<CardKey>, now: Instant) {
        if self.player.is_open() {
            self.player.show_controls(now);
            return;
        }
        let Some(key) = card else {
            return;
        };
        if self.card_title(&key).is_none() {
            return;
        }

        match key.section {
            Section::Row(category) => {
                self.focus = Focus::Row(category);
                self.rows[category.index()].selected = key.slot;
            }
            Section::SearchResults => {
                self.input_mode = InputMode::Normal;
                self.results_list.selected = key.slot;
            }
        }
        self.sync_hover();
    }

    /// Left click on a card
    pub fn card_clicked(&mut self, key: CardKey, now: Instant) {
        if self.player.is_open() {
            self.player.show_controls(now);
            return;
        }
        self.pointer_moved(Some(key), now);
        self.play_card(key, now);
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.handle_key_at(key, Instant::now())
    }

    /// [`App::handle_key`] with an explicit clock
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> bool {
        // Clear error on any keypress
        self.error = None;

        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        // Nothing to browse or search until the catalog arrives
        if !self.catalog.is_ready() {
            if key.code == KeyCode::Char('q') {
                self.quit();
                return true;
            }
            return false;
        }

        // The open player is modal
        if self.player.is_open() {
            return self.player.handle_key(key, now);
        }

        let consumed = if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            match self.active_view() {
                ActiveView::Browsing => self.handle_browse_key(key, now),
                ActiveView::SearchResults => self.handle_results_key(key, now),
            }
        };
        if consumed {
            self.sync_hover();
        }
        consumed
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        let before = self.search.query.len();
        match key.code {
            KeyCode::Esc => {
                self.close_search();
                return true;
            }
            KeyCode::Enter => {
                // Move into the results
                self.input_mode = InputMode::Normal;
                return true;
            }
            KeyCode::Char(c) => self.search.insert(c),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.cursor_left(),
            KeyCode::Right => self.search.cursor_right(),
            KeyCode::Home => self.search.cursor_home(),
            KeyCode::End => self.search.cursor_end(),
            _ => return false,
        }

        // Typing the query empty only switches the view back
        if self.search.query.len() != before {
            self.refresh_results();
        }
        true
    }

    /// Handle keys on the hero and category rows
    fn handle_browse_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('/') => self.focus_search(),
            KeyCode::Up | KeyCode::Char('k') => self.move_focus(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_focus(true),
            KeyCode::Left | KeyCode::Char('h') => self.move_card(false),
            KeyCode::Right | KeyCode::Char('l') => self.move_card(true),
            KeyCode::Char('[') => self.pan_focused(false),
            KeyCode::Char(']') => self.pan_focused(true),
            KeyCode::Enter | KeyCode::Char('p') => self.play_focused(now),
            KeyCode::Char('v') if self.focus == Focus::Hero => {
                self.hero.muted = !self.hero.muted;
            }
            _ => return false,
        }
        true
    }

    /// Handle keys in the results grid
    fn handle_results_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let columns = self.results_columns;
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('/') => self.focus_search(),
            KeyCode::Esc => self.close_search(),
            KeyCode::Left | KeyCode::Char('h') => self.results_list.up(),
            KeyCode::Right | KeyCode::Char('l') => self.results_list.down(),
            KeyCode::Up | KeyCode::Char('k') => self.results_list.page_up(columns),
            KeyCode::Down | KeyCode::Char('j') => self.results_list.page_down(columns),
            KeyCode::Home => self.results_list.first(),
            KeyCode::End => self.results_list.last(),
            KeyCode::Enter | KeyCode::Char('p') => self.play_focused(now),
            _ => return false,
        }
        true
    }

    /// Move focus between the hero and the non-empty rows
    fn move_focus(&mut self, forward: bool) {
        let mut stops = vec![Focus::Hero];
        stops.extend(
            Category::ALL
                .into_iter()
                .filter(|c| !self.catalog.row(*c).is_empty())
                .map(Focus::Row),
        );
        let current = stops.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1).min(stops.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.focus = stops[next];
        if let Focus::Row(category) = self.focus {
            self.reveal_selected(category);
        }
    }

    /// Move the focused card within its row, panning to keep it visible
    fn move_card(&mut self, forward: bool) {
        let Focus::Row(category) = self.focus else {
            return;
        };
        let len = self.catalog.row(category).len();
        let row = &mut self.rows[category.index()];
        if forward {
            if row.selected + 1 < len {
                row.selected += 1;
            }
        } else {
            row.selected = row.selected.saturating_sub(1);
        }
        self.reveal_selected(category);
    }

    /// Explicit pan of the focused row
    fn pan_focused(&mut self, forward: bool) {
        let Focus::Row(category) = self.focus else {
            return;
        };
        let row = &mut self.rows[category.index()];
        if forward {
            row.scroller.pan_right();
        } else {
            row.scroller.pan_left();
        }
        info!(row = %category, offset = row.scroller.offset(), "row panned");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
