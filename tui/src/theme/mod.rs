//! Theme and Colors
//!
//! NeuroSearch's palette plus the mapping from display line kinds to styles.

use ratatui::style::{Color, Modifier, Style};

use crate::display::LineKind;

// ============================================================================
// Brand
// ============================================================================

/// NeuroSearch signature teal (header, accents)
pub const NEURO_TEAL: Color = Color::Rgb(64, 200, 190);

/// Typing indicator violet
pub const THINKING_VIOLET: Color = Color::Rgb(170, 140, 255);

// ============================================================================
// Transcript Colors
// ============================================================================

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System reply text
pub const SYSTEM_TEXT: Color = Color::Rgb(220, 220, 220);

/// Document title
pub const DOC_TITLE: Color = Color::Rgb(255, 223, 128);

/// Links
pub const LINK_BLUE: Color = Color::Rgb(100, 180, 255);

/// Show-more affordance
pub const SHOW_MORE_AMBER: Color = Color::Rgb(255, 170, 80);

// ============================================================================
// UI Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Scroll fade near the viewport edges
pub const FADE_GRAY: Color = Color::Rgb(80, 80, 80);

/// Style for a transcript line
#[must_use]
pub fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::User => Style::default().fg(USER_GREEN),
        LineKind::System => Style::default().fg(SYSTEM_TEXT),
        LineKind::DocTitle => Style::default().fg(DOC_TITLE).add_modifier(Modifier::BOLD),
        LineKind::DocMeta => Style::default().fg(DIM_GRAY),
        LineKind::DocUrl => Style::default()
            .fg(LINK_BLUE)
            .add_modifier(Modifier::UNDERLINED),
        LineKind::ShowMore { focused: true } => Style::default()
            .fg(SHOW_MORE_AMBER)
            .add_modifier(Modifier::BOLD),
        LineKind::ShowMore { focused: false } => Style::default().fg(SHOW_MORE_AMBER),
        LineKind::Typing => Style::default()
            .fg(THINKING_VIOLET)
            .add_modifier(Modifier::ITALIC),
        LineKind::Blank => Style::default(),
    }
}
