//! Marquee theme
//!
//! Color palette and style helpers for the TUI: near-black canvas, signature
//! red, white for whatever has focus.

use ratatui::style::{Color, Modifier, Style};

/// Color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #141414 (near black)
    pub const BACKGROUND: Color = Color::Rgb(0x14, 0x14, 0x14);

    /// Primary: #e50914 (marquee red)
    pub const PRIMARY: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Secondary: #b3b3b3 (light gray)
    pub const SECONDARY: Color = Color::Rgb(0xb3, 0xb3, 0xb3);

    /// Accent: #46d369 (match green)
    pub const ACCENT: Color = Color::Rgb(0x46, 0xd3, 0x69);

    /// Highlight: #ffffff (focus white)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Text: #e5e5e5 (soft white)
    pub const TEXT: Color = Color::Rgb(0xe5, 0xe5, 0xe5);

    /// Dim: #5a5a5a (muted gray)
    pub const DIM: Color = Color::Rgb(0x5a, 0x5a, 0x5a);

    /// Success: #2ecc71 (green)
    pub const SUCCESS: Color = Color::Rgb(0x2e, 0xcc, 0x71);

    /// Warning: #f5c518 (amber)
    pub const WARNING: Color = Color::Rgb(0xf5, 0xc5, 0x18);

    /// Error: #ff5a5f (coral red)
    pub const ERROR: Color = Color::Rgb(0xff, 0x5a, 0x5f);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS (for UI elements)
    // ═══════════════════════════════════════════════════════════════════════

    /// Slightly lighter background for panels/cards
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1f, 0x1f, 0x1f);

    /// Even lighter for hovered cards
    pub const BACKGROUND_HOVER: Color = Color::Rgb(0x2a, 0x2a, 0x2a);

    /// Border color (charcoal)
    pub const BORDER: Color = Color::Rgb(0x33, 0x33, 0x33);

    /// Border color when focused
    pub const BORDER_FOCUSED: Color = Self::HIGHLIGHT;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Inverted button (white with dark text), e.g. the hero's Play
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Warning style
    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// Logo wordmark
    pub fn logo() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Secondary text style (gray)
    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Accent text style (green)
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    /// Progress bar style
    pub fn progress_bar() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .bg(Self::BACKGROUND_LIGHT)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Compact card body
    pub fn card() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Expanded (hovered) card body
    pub fn card_hovered() -> Style {
        Style::default().fg(Self::HIGHLIGHT).bg(Self::BACKGROUND_HOVER)
    }

    /// Outlined age-rating badge
    pub fn badge() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::REVERSED)
    }

    /// Secondary button (More Info)
    pub fn button() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::BORDER)
            .add_modifier(Modifier::BOLD)
    }

    /// Missing artwork placeholder
    pub fn placeholder() -> Style {
        Style::default()
            .fg(Self::DIM)
            .add_modifier(Modifier::ITALIC)
    }

    /// Style for input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::HIGHLIGHT)
    }

    /// Keybinding description style
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Genre tags
    pub fn genre() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Duration text
    pub fn duration() -> Style {
        Style::default().fg(Self::DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// WCAG relative luminance
    fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
        fn channel_luminance(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }

        0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
    }

    /// Between 1 (same color) and 21 (black on white)
    fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
        let l1 = relative_luminance(fg.0, fg.1, fg.2);
        let l2 = relative_luminance(bg.0, bg.1, bg.2);
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
        contrast_ratio(fg, bg) >= 4.5
    }

    fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
        contrast_ratio(fg, bg) >= 3.0
    }

    fn rgb(color: Color) -> (u8, u8, u8) {
        match color {
            Color::Rgb(r, g, b) => (r, g, b),
            other => panic!("Theme colors should all be RGB, got {:?}", other),
        }
    }

    #[test]
    fn test_all_theme_colors_are_rgb() {
        for color in [
            Theme::BACKGROUND,
            Theme::PRIMARY,
            Theme::SECONDARY,
            Theme::ACCENT,
            Theme::HIGHLIGHT,
            Theme::TEXT,
            Theme::DIM,
            Theme::SUCCESS,
            Theme::WARNING,
            Theme::ERROR,
            Theme::BACKGROUND_LIGHT,
            Theme::BACKGROUND_HOVER,
            Theme::BORDER,
        ] {
            assert!(matches!(color, Color::Rgb(..)), "{:?} is not RGB", color);
        }
    }

    #[test]
    fn test_text_contrast_against_background() {
        let bg = rgb(Theme::BACKGROUND);
        for (name, color) in [("TEXT", Theme::TEXT), ("SECONDARY", Theme::SECONDARY)] {
            let ratio = contrast_ratio(rgb(color), bg);
            assert!(
                meets_wcag_aa(rgb(color), bg),
                "{} on background should meet WCAG AA (got {:.2}:1)",
                name,
                ratio
            );
        }
    }

    #[test]
    fn test_text_contrast_on_cards() {
        let card = rgb(Theme::BACKGROUND_HOVER);
        assert!(meets_wcag_aa(rgb(Theme::HIGHLIGHT), card));
        assert!(meets_wcag_aa(rgb(Theme::TEXT), rgb(Theme::BACKGROUND_LIGHT)));
    }

    #[test]
    fn test_primary_contrast_against_background() {
        let bg = rgb(Theme::BACKGROUND);
        let primary = rgb(Theme::PRIMARY);

        let ratio = contrast_ratio(primary, bg);
        // The red is only used for large/bold text
        assert!(
            meets_wcag_aa_large(primary, bg),
            "Primary on background should meet WCAG AA for large text (got {:.2}:1)",
            ratio
        );
    }

    #[test]
    fn test_error_contrast() {
        let bg = rgb(Theme::BACKGROUND);
        assert!(meets_wcag_aa_large(rgb(Theme::ERROR), bg));
    }

    #[test]
    fn test_inverted_button_contrast() {
        let fg = rgb(Theme::BACKGROUND);
        let bg = rgb(Theme::HIGHLIGHT);
        assert!(meets_wcag_aa(fg, bg));
    }

    #[test]
    fn test_relative_luminance_black_and_white() {
        assert!(relative_luminance(0, 0, 0).abs() < 0.001);
        assert!((relative_luminance(255, 255, 255) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        assert!((contrast_ratio((0, 0, 0), (255, 255, 255)) - 21.0).abs() < 0.1);
        assert!((contrast_ratio((100, 100, 100), (100, 100, 100)) - 1.0).abs() < 0.001);
    }
}
