//! Browse view: hero panel and the category rows
//!
//! Rows are drawn at the offset their `RowScroller` holds; cards cut by the
//! viewport edge are clipped rather than snapped.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::Artwork;
use crate::app::{App, Focus};
use crate::hover::{CardKey, Section};
use crate::models::Category;
use crate::ui::card::{card_widget, render_clipped, NO_IMAGE};
use crate::ui::layout::{browse_layout, row_cards_area, BrowseItem};
use crate::ui::Theme;

/// Render hero and rows into `body`
pub fn render_browse(frame: &mut Frame, body: Rect, app: &App) {
    for (item, area) in browse_layout(app, body) {
        match item {
            BrowseItem::Hero => render_hero(frame, area, app),
            BrowseItem::Row(category) => render_row(frame, area, app, category),
        }
    }
}

/// Render the featured title
fn render_hero(frame: &mut Frame, area: Rect, app: &App) {
    let Some(hero) = app.catalog.hero() else {
        return;
    };
    let title = &hero.title;
    let focused = app.focus == Focus::Hero;

    let preview = if app.hero.preview_started {
        let sound = if app.hero.muted { "muted" } else { "sound on" };
        Span::styled(format!("   ♪ preview · {} (v)", sound), Theme::secondary())
    } else {
        Span::raw("")
    };

    let backdrop = match app.hero.artwork {
        Artwork::Placeholder => Span::styled(NO_IMAGE, Theme::placeholder()),
        _ => Span::styled(hero.background_image.clone(), Theme::dimmed()),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(title.title.to_uppercase(), Theme::logo()),
            Span::raw("  "),
            Span::styled(format!(" {} ", title.rating), Theme::badge()),
        ]),
        Line::from(vec![
            Span::styled(title.year.to_string(), Theme::year()),
            Span::raw("  "),
            Span::styled(title.duration.clone(), Theme::duration()),
            Span::raw("  "),
            Span::styled(title.genre_line(), Theme::genre()),
        ]),
        Line::from(Span::styled(title.description.clone(), Theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ▶ Play ", Theme::highlighted()),
            Span::raw("  "),
            Span::styled(" ⓘ More Info ", Theme::button()),
            preview,
        ]),
        Line::from(backdrop),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title.kind), Theme::secondary()));

    let para = Paragraph::new(lines)
        .block(block)
        .style(Theme::text())
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

/// Render one category row: heading, pan indicators and cards
fn render_row(frame: &mut Frame, area: Rect, app: &App, category: Category) {
    let titles = app.catalog.row(category);
    let row = app.row_state(category);
    let focused = app.focus == Focus::Row(category);

    let heading_style = if focused {
        Theme::selected()
    } else {
        Theme::title()
    };
    let heading = Paragraph::new(Line::from(Span::styled(category.heading(), heading_style)));
    frame.render_widget(heading, Rect::new(area.x + 1, area.y, area.width.saturating_sub(1), 1));

    let cards = row_cards_area(area);
    let indicator_y = cards.y + cards.height / 2;
    if row.scroller.can_pan_left() {
        let left = Paragraph::new("‹").style(Theme::selected());
        frame.render_widget(left, Rect::new(area.x, indicator_y, 1, 1));
    }
    if row.scroller.can_pan_right() {
        let right = Paragraph::new("›")
            .style(Theme::selected())
            .alignment(Alignment::Right);
        frame.render_widget(right, Rect::new(cards.x + cards.width, indicator_y, 1, 1));
    }

    let card_width = app.card_width;
    let offset = row.scroller.offset() as i64;
    let viewport = cards.width as i64;
    for (slot, title) in titles.iter().enumerate() {
        let x = slot as i64 * card_width as i64 - offset;
        if x + card_width as i64 <= 0 || x >= viewport {
            continue;
        }
        let key = CardKey::new(Section::Row(category), slot, title.id);
        let widget = card_widget(title, app.hover.state(&key));
        render_clipped(widget, x as i32, card_width, cards, frame.buffer_mut());
    }
}
