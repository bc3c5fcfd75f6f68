//! Title cards
//!
//! Compact cards show the poster stand-in with title and year. Hovered cards
//! expand in place: muted preview line, quick actions, metadata, genres.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::api::Artwork;
use crate::hover::{CardState, CardVariant};
use crate::models::Title;
use crate::ui::Theme;

/// Quick actions on an expanded card: play, add to list, like, more info
pub const QUICK_ACTIONS: &str = "▶ ＋ 👍 ⌄";

/// Shown instead of a poster whose image failed to load
pub const NO_IMAGE: &str = "No Image";

/// Build the widget for one card
pub fn card_widget(title: &Title, state: CardState) -> Paragraph<'static> {
    match state.variant() {
        CardVariant::Compact => compact(title, state),
        CardVariant::Expanded => expanded(title, state),
    }
}

fn compact(title: &Title, state: CardState) -> Paragraph<'static> {
    let poster = match state.artwork {
        Artwork::Placeholder => Line::from(Span::styled(NO_IMAGE, Theme::placeholder())),
        _ => Line::from(""),
    };

    Paragraph::new(vec![
        Line::from(Span::styled(title.title.clone(), Theme::title())),
        Line::from(Span::styled(title.year.to_string(), Theme::year())),
        Line::from(""),
        poster,
    ])
    .style(Theme::card())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    )
}

fn expanded(title: &Title, state: CardState) -> Paragraph<'static> {
    let preview = if state.preview_ready {
        Span::styled("▶ preview · muted", Theme::accent())
    } else {
        Span::styled("◌ loading preview", Theme::dimmed())
    };

    Paragraph::new(vec![
        Line::from(preview),
        Line::from(Span::styled(title.title.clone(), Theme::selected())),
        Line::from(Span::styled(QUICK_ACTIONS, Theme::keybind())),
        Line::from(vec![
            Span::styled(format!(" {} ", title.rating), Theme::badge()),
            Span::raw(" "),
            Span::styled(title.year.to_string(), Theme::year()),
            Span::raw(" "),
            Span::styled(title.duration.clone(), Theme::duration()),
        ]),
        Line::from(Span::styled(title.genre_line(), Theme::genre())),
    ])
    .style(Theme::card_hovered())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused()),
    )
}

/// Draw a card whose left edge may fall outside `clip`.
///
/// `x` is the card's left column relative to `clip.x` and can be negative;
/// only the columns inside `clip` are copied into `buf`.
pub fn render_clipped(widget: Paragraph<'static>, x: i32, width: u16, clip: Rect, buf: &mut Buffer) {
    let height = clip.height;
    let scratch_area = Rect::new(0, 0, width, height);
    let mut scratch = Buffer::empty(scratch_area);
    widget.render(scratch_area, &mut scratch);

    for sx in 0..width {
        let col = x + sx as i32;
        if col < 0 || col >= clip.width as i32 {
            continue;
        }
        let dx = clip.x + col as u16;
        for sy in 0..height {
            let dy = clip.y + sy;
            if let (Some(src), Some(dst)) = (scratch.cell((sx, sy)), buf.cell_mut((dx, dy))) {
                *dst = src.clone();
            }
        }
    }
}
