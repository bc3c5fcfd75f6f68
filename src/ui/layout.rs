//! Screen geometry
//!
//! Rendering and mouse hit-testing both go through these functions, so a
//! click always lands on the card that was drawn under it.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{ActiveView, App, Focus, ROW_GUTTER};
use crate::hover::{CardKey, Section};
use crate::models::Category;

pub const HEADER_HEIGHT: u16 = 3;
pub const HERO_HEIGHT: u16 = 9;
pub const CARD_HEIGHT: u16 = 7;
/// Heading line plus cards
pub const ROW_HEIGHT: u16 = CARD_HEIGHT + 1;

/// Top-level split of the terminal
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub fn screen(area: Rect) -> Screen {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header
            Constraint::Min(1),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);
    Screen {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// A block in the browse view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseItem {
    Hero,
    Row(Category),
}

impl BrowseItem {
    fn height(&self) -> u16 {
        match self {
            BrowseItem::Hero => HERO_HEIGHT,
            BrowseItem::Row(_) => ROW_HEIGHT,
        }
    }
}

/// Blocks of the browse view that fit in `body`, scrolled so the focused one is shown
pub fn browse_layout(app: &App, body: Rect) -> Vec<(BrowseItem, Rect)> {
    let mut items = vec![BrowseItem::Hero];
    items.extend(
        Category::ALL
            .into_iter()
            .filter(|c| !app.catalog.row(*c).is_empty())
            .map(BrowseItem::Row),
    );

    let focused = match app.focus {
        Focus::Hero => BrowseItem::Hero,
        Focus::Row(category) => BrowseItem::Row(category),
    };
    let focused_idx = items.iter().position(|i| *i == focused).unwrap_or(0);

    // First block such that everything up to the focused one fits
    let mut start = 0;
    while start < focused_idx
        && items[start..=focused_idx].iter().map(|i| i.height()).sum::<u16>() > body.height
    {
        start += 1;
    }

    let mut out = Vec::new();
    let mut y = body.y;
    for item in &items[start..] {
        let h = item.height();
        if y + h > body.y + body.height {
            break;
        }
        out.push((*item, Rect::new(body.x, y, body.width, h)));
        y += h;
    }
    out
}

/// Area the cards of a row are drawn in (inside the `‹`/`›` gutters)
pub fn row_cards_area(row: Rect) -> Rect {
    Rect::new(
        row.x + ROW_GUTTER,
        row.y + 1,
        row.width.saturating_sub(ROW_GUTTER * 2),
        row.height.saturating_sub(1),
    )
}

/// Results grid geometry
#[derive(Debug, Clone, Copy)]
pub struct ResultsLayout {
    pub heading: Rect,
    pub grid: Rect,
    /// First grid line drawn
    pub first_line: usize,
    /// Grid lines that fit
    pub visible_lines: usize,
}

pub fn results_layout(app: &App, body: Rect) -> ResultsLayout {
    let heading = Rect::new(body.x, body.y, body.width, 1.min(body.height));
    let grid = Rect::new(
        body.x + ROW_GUTTER,
        body.y + 1,
        body.width.saturating_sub(ROW_GUTTER * 2),
        body.height.saturating_sub(1),
    );
    let visible_lines = ((grid.height / CARD_HEIGHT) as usize).max(1);
    let selected_line = app.results_list.selected / app.results_columns.max(1);
    let first_line = selected_line.saturating_sub(visible_lines - 1);
    ResultsLayout {
        heading,
        grid,
        first_line,
        visible_lines,
    }
}

/// Card under terminal cell (`x`, `y`), if any
pub fn card_at(app: &App, area: Rect, x: u16, y: u16) -> Option<CardKey> {
    if !app.catalog.is_ready() || app.player.is_open() {
        return None;
    }
    let body = screen(area).body;
    let card_width = app.card_width;

    match app.active_view() {
        ActiveView::Browsing => {
            let (item, rect) = browse_layout(app, body)
                .into_iter()
                .find(|(_, r)| contains(*r, x, y))?;
            let BrowseItem::Row(category) = item else {
                return None;
            };
            let cards = row_cards_area(rect);
            if !contains(cards, x, y) {
                return None;
            }
            let offset = app.row_state(category).scroller.offset();
            let slot = ((x - cards.x) as u32 + offset) / card_width as u32;
            let title = app.catalog.row(category).get(slot as usize)?;
            Some(CardKey::new(Section::Row(category), slot as usize, title.id))
        }
        ActiveView::SearchResults => {
            let layout = results_layout(app, body);
            if !contains(layout.grid, x, y) {
                return None;
            }
            let col = ((x - layout.grid.x) / card_width) as usize;
            if col >= app.results_columns {
                return None;
            }
            let line = ((y - layout.grid.y) / CARD_HEIGHT) as usize;
            if line >= layout.visible_lines {
                return None;
            }
            let line = line + layout.first_line;
            let slot = line * app.results_columns + col;
            let title = app.results().get(slot)?;
            Some(CardKey::new(Section::SearchResults, slot, title.id))
        }
    }
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
}
