mod header;

pub use header::{HeaderWidget, TitleStyle};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::palette::Styles;
use crate::taskline::Listing;
use crate::tui::action_words::shortcut_spans;
use crate::tui::app::{App, Mode};
use crate::tui::viewport::{SCROLLBAR_COLUMNS, SUMMARY_GAP_ROWS, styled_line};

/// A piece of the screen that draws itself into a buffer.
pub trait Renderable {
    fn render(&self, area: Rect, buf: &mut Buffer);

    fn desired_height(&self, width: u16) -> u16;

    fn cursor_pos(&self, _area: Rect) -> Option<(u16, u16)> {
        None
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}

// === Listing ===

/// The wrapped listing with its scrollbar gutter.
pub struct ListingWidget<'a> {
    app: &'a App,
    styles: &'a Styles,
}

impl<'a> ListingWidget<'a> {
    #[must_use]
    pub fn new(app: &'a App, styles: &'a Styles) -> Self {
        Self { app, styles }
    }
}

impl Renderable for ListingWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let gutter = SCROLLBAR_COLUMNS.min(area.width);
        let viewport = &self.app.viewport;
        let body = Rect {
            x: area.x.saturating_add(gutter),
            width: (area.width - gutter).min(viewport.width()),
            ..area
        };
        Paragraph::new(viewport.visible_lines().to_vec()).render(body, buf);

        if viewport.needs_scrollbar() && gutter > 1 && area.height > 0 {
            let track = Rect {
                x: area.x + 1,
                width: 1,
                ..area
            };
            let mut state = ScrollbarState::new(viewport.max_offset().saturating_add(1))
                .position(viewport.offset())
                .viewport_content_length(usize::from(viewport.height()));
            Scrollbar::new(ScrollbarOrientation::VerticalLeft)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("▏"))
                .thumb_symbol("┃")
                .begin_style(self.styles.highlight)
                .end_style(self.styles.highlight)
                .track_style(self.styles.scrollbar)
                .thumb_style(self.styles.scrollbar)
                .render(track, buf, &mut state);
        }
    }

    fn desired_height(&self, _width: u16) -> u16 {
        self.app.viewport.height()
    }
}

// === Summary ===

pub struct SummaryWidget<'a> {
    listing: &'a Listing,
    styles: &'a Styles,
}

impl<'a> SummaryWidget<'a> {
    #[must_use]
    pub fn new(listing: &'a Listing, styles: &'a Styles) -> Self {
        Self { listing, styles }
    }
}

impl Renderable for SummaryWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if !self.listing.has_summary() {
            return;
        }
        let mut lines = vec![Line::default(); usize::from(SUMMARY_GAP_ROWS)];
        lines.extend(self.listing.summary.iter().map(|raw| styled_line(raw)));
        Paragraph::new(lines)
            .style(self.styles.summary)
            .render(area, buf);
    }

    fn desired_height(&self, _width: u16) -> u16 {
        if self.listing.has_summary() {
            SUMMARY_GAP_ROWS + u16::try_from(self.listing.summary.len()).unwrap_or(u16::MAX)
        } else {
            0
        }
    }
}

// === Footer ===

/// Help and Quit words on the right, plus the key reference in help mode.
pub struct FooterWidget<'a> {
    app: &'a App,
    styles: &'a Styles,
}

impl<'a> FooterWidget<'a> {
    #[must_use]
    pub fn new(app: &'a App, styles: &'a Styles) -> Self {
        Self { app, styles }
    }

    fn action_spans(&self) -> Vec<Span<'static>> {
        let mut spans = shortcut_spans("H", "elp", self.styles);
        spans.push(Span::raw(" |"));
        spans.extend(shortcut_spans("Q", "uit", self.styles));
        spans
    }

    fn key_reference(&self) -> Vec<Span<'static>> {
        let key = |text: &'static str| Span::styled(text, self.styles.highlight);
        vec![
            key("↑"),
            Span::raw("/"),
            key("↓"),
            Span::raw("|"),
            key("⇞"),
            Span::raw("/"),
            key("⇟"),
            Span::raw(" scroll   "),
            Span::styled("Shortcuts are highlighted", self.styles.bold),
            Span::raw("   "),
            key("h"),
            Span::raw("|"),
            key("⎋"),
            Span::raw(": hide help   "),
            key("q"),
            Span::raw("|"),
            key("⎈c"),
            Span::raw(": quit"),
        ]
    }
}

impl Renderable for FooterWidget<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let actions = self.action_spans();
        let actions_width = u16::try_from(spans_width(&actions)).unwrap_or(u16::MAX);
        let right = Rect {
            x: area.right().saturating_sub(actions_width).max(area.x),
            width: actions_width.min(area.width),
            ..area
        };
        let left = Rect {
            width: area.width.saturating_sub(right.width),
            ..area
        };

        Paragraph::new(Line::from(actions)).render(right, buf);

        if self.app.busy {
            Paragraph::new(Line::from(Span::styled(" working…", self.styles.busy)))
                .render(left, buf);
        } else if self.app.mode == Mode::Help {
            Paragraph::new(Line::from(self.key_reference()))
                .alignment(Alignment::Center)
                .render(left, buf);
        }
    }

    fn desired_height(&self, _width: u16) -> u16 {
        crate::tui::viewport::FOOTER_ROWS
    }
}
