//! Player overlay
//!
//! Covers the whole screen while a session is open. The info strip and the
//! control bar only show while `controls_visible` is set.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::playback::PlaybackState;
use crate::ui::Theme;

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Glyph for the play/pause control (shows the action, not the state)
fn play_glyph(state: &PlaybackState) -> &'static str {
    if state.is_playing {
        "❚❚"
    } else {
        "▶"
    }
}

fn volume_glyph(state: &PlaybackState) -> &'static str {
    if state.is_muted {
        "🔇"
    } else {
        "🔊"
    }
}

/// Render the overlay over `area`
pub fn render_player(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.player.session() else {
        return;
    };
    let state = app.player.state();
    let title = &session.title;

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(ratatui::style::Color::Black)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Info strip
            Constraint::Min(1),    // Stage
            Constraint::Length(4), // Controls
        ])
        .split(area);

    // Stage
    let status = if state.is_playing {
        Span::styled(format!("Playing in {}", app.player_type), Theme::success())
    } else if state.total_duration > 0.0 && state.current_time >= state.total_duration {
        Span::styled("Ended", Theme::dimmed())
    } else {
        Span::styled("Paused", Theme::warning())
    };
    let stage_y = chunks[1].y + chunks[1].height.saturating_sub(2) / 2;
    let stage = Paragraph::new(vec![
        Line::from(Span::styled(title.title.clone(), Theme::title())),
        Line::from(status),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(
        stage,
        Rect::new(chunks[1].x, stage_y, chunks[1].width, 2.min(chunks[1].height)),
    );

    if !state.controls_visible {
        return;
    }

    // Info strip
    let info = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("✕ Esc  ", Theme::keybind()),
            Span::styled(title.title.clone(), Theme::title()),
        ]),
        Line::from(vec![
            Span::styled(format!(" {} ", title.rating), Theme::badge()),
            Span::raw(" "),
            Span::styled(title.year.to_string(), Theme::year()),
            Span::raw(" • "),
            Span::styled(title.duration.clone(), Theme::duration()),
            Span::raw(" • "),
            Span::styled(title.genre_line(), Theme::genre()),
        ]),
    ])
    .block(Block::default().borders(Borders::BOTTOM).border_style(Theme::border()));
    frame.render_widget(info, chunks[0]);

    // Control bar
    let controls = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(chunks[2]);

    let progress = Gauge::default()
        .gauge_style(Theme::progress_bar())
        .ratio(state.progress())
        .label("");
    frame.render_widget(progress, controls[0]);

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", play_glyph(state)), Theme::selected()),
        Span::raw("  "),
        Span::styled(volume_glyph(state), Theme::selected()),
        Span::styled(format!(" {:>3.0}%", state.volume * 100.0), Theme::secondary()),
        Span::raw("   "),
        Span::styled(
            format!(
                "{} / {}",
                format_time(state.current_time),
                format_time(state.total_duration)
            ),
            Theme::text(),
        ),
        Span::raw("   "),
        Span::styled("⛶ f", Theme::keybind()),
    ]));
    frame.render_widget(buttons, controls[1]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled(" SPACE ", Theme::keybind()),
        Span::styled("Play/Pause  ", Theme::keybind_desc()),
        Span::styled(" M ", Theme::keybind()),
        Span::styled("Mute  ", Theme::keybind_desc()),
        Span::styled(" ←→ ", Theme::keybind()),
        Span::styled("Seek  ", Theme::keybind_desc()),
        Span::styled(" ↑↓ ", Theme::keybind()),
        Span::styled("Volume  ", Theme::keybind_desc()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Close", Theme::keybind_desc()),
    ]));
    frame.render_widget(hints, controls[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(-4.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn test_glyphs_follow_state() {
        let mut state = PlaybackState::default();
        assert_eq!(play_glyph(&state), "▶");
        state.is_playing = true;
        assert_eq!(play_glyph(&state), "❚❚");
        state.is_muted = true;
        assert_eq!(volume_glyph(&state), "🔇");
    }
}
