//! Search results view
//!
//! A grid of the same cards the rows use, laid out row-major.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::hover::{CardKey, Section};
use crate::ui::card::{card_widget, render_clipped};
use crate::ui::layout::{results_layout, CARD_HEIGHT};
use crate::ui::Theme;

/// Heading for `n` results
pub fn results_heading(n: usize) -> String {
    format!("Search Results ({})", n)
}

/// Render the results grid into `body`
pub fn render_results(frame: &mut Frame, body: Rect, app: &App) {
    let results = app.results();
    let layout = results_layout(app, body);

    let heading = Paragraph::new(Line::from(Span::styled(
        results_heading(results.len()),
        Theme::title(),
    )));
    frame.render_widget(heading, layout.heading);

    if results.is_empty() {
        render_empty(frame, layout.grid);
        return;
    }

    let columns = app.results_columns.max(1);
    let card_width = app.card_width;
    for (slot, title) in results.iter().enumerate() {
        let line = slot / columns;
        if line < layout.first_line || line >= layout.first_line + layout.visible_lines {
            continue;
        }
        let col = (slot % columns) as u16;
        let y = layout.grid.y + (line - layout.first_line) as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > layout.grid.y + layout.grid.height {
            continue;
        }
        let clip = Rect::new(layout.grid.x, y, layout.grid.width, CARD_HEIGHT);
        let key = CardKey::new(Section::SearchResults, slot, title.id);
        let widget = card_widget(title, app.hover.state(&key));
        render_clipped(widget, (col * card_width) as i32, card_width, clip, frame.buffer_mut());
    }
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let empty = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No results found", Theme::title())),
        Line::from(Span::styled(
            "Try searching for a different title, genre, or keyword",
            Theme::dimmed(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(empty, area);
}
