//! Header: the taskline title next to the three action words.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::palette::Styles;
use crate::tui::action_words::{ActionWord, action_words};
use crate::tui::app::App;

use super::Renderable;

const TITLE: &str = "taskline";
const BADGE: &str = "ꭐ";
const BOXED_TITLE_WIDTH: u16 = 11;
const LARGE_TITLE_WIDTH: u16 = 27;

/// How the title is drawn. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// Rounded box around the title.
    Boxed,
    /// Letter-spaced title for terminals that advertise large text (kitty).
    Large,
}

impl TitleStyle {
    #[must_use]
    pub fn detect() -> Self {
        Self::from_kitty_window_id(std::env::var("KITTY_WINDOW_ID").ok())
    }

    #[must_use]
    pub fn from_kitty_window_id(value: Option<String>) -> Self {
        match value {
            Some(id) if !id.is_empty() => TitleStyle::Large,
            _ => TitleStyle::Boxed,
        }
    }

    /// Columns taken by the title, not counting the gap before the words.
    #[must_use]
    pub fn width(self) -> u16 {
        match self {
            TitleStyle::Boxed => BOXED_TITLE_WIDTH,
            TitleStyle::Large => LARGE_TITLE_WIDTH,
        }
    }
}

pub struct HeaderWidget<'a> {
    app: &'a App,
    styles: &'a Styles,
}

impl<'a> HeaderWidget<'a> {
    #[must_use]
    pub fn new(app: &'a App, styles: &'a Styles) -> Self {
        Self { app, styles }
    }

    fn title_area(&self, area: Rect) -> Rect {
        Rect {
            width: self.app.title.width().min(area.width),
            ..area
        }
    }

    fn panel_area(&self, area: Rect) -> Rect {
        let offset = self.app.title.width().saturating_add(1).min(area.width);
        Rect {
            x: area.x.saturating_add(offset),
            width: self.app.layout().panel_width.min(area.width - offset),
            ..area
        }
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let styles = self.styles;
        match self.app.title {
            TitleStyle::Boxed => {
                let line = Line::from(vec![
                    Span::styled(TITLE, styles.logo),
                    Span::styled(BADGE, styles.logo_badge),
                ]);
                Paragraph::new(line)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_set(border::ROUNDED)
                            .border_style(styles.title_border),
                    )
                    .render(area, buf);
            }
            TitleStyle::Large => {
                let spaced = TITLE
                    .chars()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                let line = Line::from(vec![
                    Span::raw(" "),
                    Span::styled(spaced, styles.logo),
                    Span::raw(" "),
                    Span::styled(BADGE, styles.logo_badge),
                ]);
                Paragraph::new(vec![Line::default(), line]).render(area, buf);
            }
        }
    }

    /// One panel row: the word, then the live input if it is being edited.
    fn word_line(&self, word: &ActionWord, width: u16) -> (Line<'static>, Option<u16>) {
        let mut spans = word.spans(self.styles);
        if !word.show_input {
            return (Line::from(spans), None);
        }

        let label_width: usize = spans.iter().map(|s| s.content.width()).sum();
        let input_width = usize::from(width).saturating_sub(label_width + 1);
        let (visible, cursor_col) = self.app.input.visible_window(input_width);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(visible, self.styles.input));

        let cursor = u16::try_from(label_width + 1 + cursor_col).ok();
        (Line::from(spans), cursor)
    }
}

impl Renderable for HeaderWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        self.render_title(self.title_area(area), buf);

        let panel = self.panel_area(area);
        let lines: Vec<Line<'static>> = action_words(&self.app.panel_context())
            .iter()
            .map(|word| self.word_line(word, panel.width).0)
            .collect();
        Paragraph::new(lines).render(panel, buf);
    }

    fn desired_height(&self, _width: u16) -> u16 {
        crate::tui::viewport::HEADER_ROWS
    }

    fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if !self.app.input.is_focused() {
            return None;
        }
        let panel = self.panel_area(area);
        action_words(&self.app.panel_context())
            .iter()
            .zip(0u16..)
            .find_map(|(word, row)| {
                let (_, col) = self.word_line(word, panel.width);
                col.map(|col| (panel.x.saturating_add(col), panel.y.saturating_add(row)))
            })
            .filter(|&(x, y)| x < panel.right() && y < panel.bottom())
    }
}
