//! Marquee theme for MovieMind
//!
//! Warm amber on near-black, like a cinema marquee at night.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0d0b0a (projector-room black)
    pub const BACKGROUND: Color = Color::Rgb(0x0d, 0x0b, 0x0a);

    /// Primary: #ffb300 (marquee amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb3, 0x00);

    /// Secondary: #ff5c5c (velvet red)
    pub const SECONDARY: Color = Color::Rgb(0xff, 0x5c, 0x5c);

    /// Accent: #7fd1ff (screen glow blue)
    pub const ACCENT: Color = Color::Rgb(0x7f, 0xd1, 0xff);

    /// Text: #ece6dc (paper white)
    pub const TEXT: Color = Color::Rgb(0xec, 0xe6, 0xdc);

    /// Dim: #6b625a (house lights down)
    pub const DIM: Color = Color::Rgb(0x6b, 0x62, 0x5a);

    /// Good rating: #6fdc8c
    pub const GOOD: Color = Color::Rgb(0x6f, 0xdc, 0x8c);

    /// Middling rating: #f2c94c
    pub const FAIR: Color = Color::Rgb(0xf2, 0xc9, 0x4c);

    /// Error: #ff4d6a
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x6a);

    /// Panels and the input field
    pub const PANEL: Color = Color::Rgb(0x1a, 0x16, 0x14);

    /// Unfocused border (dim amber)
    pub const BORDER: Color = Color::Rgb(0x80, 0x5a, 0x00);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Selected row (inverted amber)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::ITALIC)
    }

    /// Release year next to a title
    pub fn year() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Genre tags and other secondary metadata
    pub fn genre() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Rating colored by score: 7+ good, 5+ fair, else dim
    pub fn rating(score: f32) -> Style {
        let color = if score >= 7.0 {
            Self::GOOD
        } else if score >= 5.0 {
            Self::FAIR
        } else {
            Self::DIM
        };
        Style::default().fg(color)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRAST CHECKS
// ═══════════════════════════════════════════════════════════════════════════

/// WCAG relative luminance of an sRGB color
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast ratio between two colors, from 1.0 up to 21.0.
/// `None` for non-RGB colors.
pub fn contrast_ratio(fg: Color, bg: Color) -> Option<f64> {
    let (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) = (fg, bg) else {
        return None;
    };
    let l1 = relative_luminance(fr, fg_, fb);
    let l2 = relative_luminance(br, bg_, bb);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    Some((lighter + 0.05) / (darker + 0.05))
}
