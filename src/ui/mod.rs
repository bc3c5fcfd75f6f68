//! Terminal UI components
//!
//! Built with ratatui. [`render`] draws one frame from an immutable [`App`];
//! [`card_at`] maps a mouse position back to the card drawn there.

pub mod browser;
pub mod card;
pub mod layout;
pub mod player;
pub mod search;
pub mod theme;

pub use layout::card_at;
pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{ActiveView, App, InputMode};

/// Placeholder shown in the empty, unfocused search box
pub const SEARCH_PLACEHOLDER: &str = "Titles, people, genres";

/// Shown until the catalog is ready
pub const LOADING_TEXT: &str = "Loading catalog...";

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    if !app.catalog.is_ready() {
        render_loading(frame, area);
        return;
    }

    let screen = layout::screen(area);
    render_header(frame, screen.header, app);
    render_content(frame, screen.body, app);
    render_status_bar(frame, screen.status, app);

    if app.player.is_open() {
        player::render_player(frame, area, app);
    }

    // Render error overlay if present
    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// The only thing drawn until the catalog is ready
fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new(LOADING_TEXT)
        .style(Theme::loading())
        .alignment(Alignment::Center);
    let y = area.y + area.height / 2;
    frame.render_widget(loading, Rect::new(area.x, y, area.width, 1.min(area.height)));
}

/// Render the header with logo and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled("MARQUEE", Theme::logo())))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border()),
        );
    frame.render_widget(logo, header_chunks[0]);

    let editing = app.input_mode == InputMode::Editing;
    let search_line = if editing {
        let (before, after) = app.search.split_at_cursor();
        Line::from(vec![
            Span::styled(format!("⌕ {}", before), Theme::input()),
            Span::styled("│", Theme::selected()),
            Span::styled(after.to_string(), Theme::input()),
        ])
    } else if app.search.query.is_empty() {
        Line::from(Span::styled(format!("⌕ {}", SEARCH_PLACEHOLDER), Theme::dimmed()))
    } else {
        Line::from(Span::styled(format!("⌕ {}", app.search.query), Theme::input()))
    };

    let search_box = Paragraph::new(search_line).style(Theme::input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if editing {
                Theme::border_focused()
            } else {
                Theme::border()
            }),
    );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Render the main content area for the active view
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.active_view() {
        ActiveView::Browsing => browser::render_browse(frame, area, app),
        ActiveView::SearchResults => search::render_results(frame, area, app),
    }
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            ratatui::style::Style::default()
                .fg(Theme::HIGHLIGHT)
                .bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::HIGHLIGHT),
        ),
    };

    let view = if app.player.is_open() {
        "PLAYER"
    } else {
        match app.active_view() {
            ActiveView::Browsing => "BROWSE",
            ActiveView::SearchResults => "RESULTS",
        }
    };
    let view_indicator = Span::styled(format!(" {} ", view), Theme::secondary());
    let player_indicator = Span::styled(format!(" ▶ {} ", app.player_type), Theme::accent());

    let help = if app.player.is_open() {
        " space:play  m:mute  ←→:seek  ↑↓:volume  esc:close "
    } else if app.input_mode == InputMode::Editing {
        " enter:results  esc:close search "
    } else if app.active_view() == ActiveView::SearchResults {
        " ↵:play  /:edit  esc:close search  q:quit "
    } else {
        " ↑↓:rows  ←→:titles  [ ]:pan  ↵:play  /:search  q:quit "
    };

    let status_line = Line::from(vec![
        mode_indicator,
        view_indicator,
        player_indicator,
        Span::raw(" │ "),
        Span::styled(help, Theme::keybind_desc()),
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    // Calculate centered popup
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height);

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}
