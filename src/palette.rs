//! taskline color palette and the style set handed to the renderer.

use ratatui::style::{Color, Modifier, Style};

pub const TASKLINE_MAGENTA_INDEX: u8 = 5;
pub const TASKLINE_GREY_INDEX: u8 = 8;
pub const TASKLINE_PLUM_INDEX: u8 = 54;

pub const TASKLINE_MAGENTA: Color = Color::Indexed(TASKLINE_MAGENTA_INDEX);
pub const TASKLINE_GREY: Color = Color::Indexed(TASKLINE_GREY_INDEX);
pub const TASKLINE_PLUM: Color = Color::Indexed(TASKLINE_PLUM_INDEX);

pub const TEXT_PRIMARY: Color = Color::Reset;
pub const TEXT_MUTED: Color = Color::DarkGray;

pub const THEMES: &[&str] = &["default", "mono"];

/// Immutable style set built once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    pub name: &'static str,
    /// Shortcut letters, active action words, scroll arrows.
    pub highlight: Style,
    /// Remainder of an action word next to its shortcut.
    pub bold: Style,
    /// Inactive action words, annotations and stashed drafts.
    pub muted: Style,
    pub logo: Style,
    pub logo_badge: Style,
    pub title_border: Style,
    pub scrollbar: Style,
    pub summary: Style,
    pub input: Style,
    pub busy: Style,
}

impl Styles {
    #[must_use]
    pub fn for_theme(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mono" => Self::mono(),
            _ => Self::default_theme(),
        }
    }

    fn default_theme() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            name: "default",
            highlight: bold.fg(TASKLINE_MAGENTA),
            bold,
            muted: Style::default().fg(TASKLINE_GREY),
            logo: Style::default()
                .fg(TASKLINE_PLUM)
                .add_modifier(Modifier::ITALIC | Modifier::BOLD),
            logo_badge: Style::default().fg(TASKLINE_MAGENTA).bg(TASKLINE_PLUM),
            title_border: Style::default().fg(TEXT_MUTED),
            scrollbar: Style::default().fg(TEXT_MUTED),
            summary: Style::default().fg(TEXT_PRIMARY),
            input: Style::default().fg(TEXT_PRIMARY),
            busy: Style::default()
                .fg(TASKLINE_MAGENTA)
                .add_modifier(Modifier::ITALIC),
        }
    }

    fn mono() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            name: "mono",
            highlight: bold.add_modifier(Modifier::UNDERLINED),
            bold,
            muted: Style::default().add_modifier(Modifier::DIM),
            logo: Style::default().add_modifier(Modifier::ITALIC | Modifier::BOLD),
            logo_badge: Style::default().add_modifier(Modifier::REVERSED),
            title_border: Style::default(),
            scrollbar: Style::default(),
            summary: Style::default(),
            input: Style::default(),
            busy: Style::default().add_modifier(Modifier::ITALIC),
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::default_theme()
    }
}
