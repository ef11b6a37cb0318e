//! Scrollable, word-wrapped view of the listing body and the layout math
//! that sizes it.

use ansi_to_tui::IntoText;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

// === Layout ===

/// Title box / action words rows.
pub const HEADER_ROWS: u16 = 3;
pub const FOOTER_ROWS: u16 = 1;
/// Blank row between the listing and a non-empty summary.
pub const SUMMARY_GAP_ROWS: u16 = 1;
/// Scrollbar gutter to the left of the listing.
pub const SCROLLBAR_COLUMNS: u16 = 3;

/// Derived sizes for one window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub viewport_width: u16,
    pub viewport_height: u16,
    /// Width available to the action words next to the title.
    pub panel_width: u16,
    pub summary_rows: u16,
}

impl Layout {
    #[must_use]
    pub fn compute(width: u16, height: u16, summary_lines: usize, title_width: u16) -> Self {
        let summary_rows = summary_rows(summary_lines);
        Self {
            viewport_width: width.saturating_sub(SCROLLBAR_COLUMNS),
            viewport_height: height
                .saturating_sub(HEADER_ROWS)
                .saturating_sub(FOOTER_ROWS)
                .saturating_sub(summary_rows),
            panel_width: width.saturating_sub(title_width.saturating_add(1)),
            summary_rows,
        }
    }
}

fn summary_rows(summary_lines: usize) -> u16 {
    if summary_lines == 0 {
        0
    } else {
        SUMMARY_GAP_ROWS.saturating_add(u16::try_from(summary_lines).unwrap_or(u16::MAX))
    }
}

// === Viewport ===

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    /// Wrapped line cache, rebuilt on every resize or content change.
    lines: Vec<Line<'static>>,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            offset: 0,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Apply new dimensions and re-wrap `body`. The offset is kept but clamped.
    pub fn resize(&mut self, width: u16, height: u16, body: &[String]) {
        self.width = width;
        self.height = height;
        self.set_content(body);
    }

    /// Replace the content, re-wrapping at the current width.
    pub fn set_content(&mut self, body: &[String]) {
        let width = usize::from(self.width);
        self.lines = body
            .iter()
            .flat_map(|raw| wrap_line(&styled_line(raw), width))
            .collect();
        self.clamp_offset();
    }

    #[must_use]
    pub fn total_line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(usize::from(self.height))
    }

    /// Whether the content overflows the visible window.
    #[must_use]
    pub fn needs_scrollbar(&self) -> bool {
        self.lines.len() > usize::from(self.height)
    }

    #[must_use]
    pub fn half_page(&self) -> usize {
        usize::from(self.height).div_ceil(2)
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.offset = self.offset.saturating_add(amount).min(self.max_offset());
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up(self.half_page());
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.half_page());
    }

    #[must_use]
    pub fn visible_lines(&self) -> &[Line<'static>] {
        let start = self.offset.min(self.lines.len());
        let end = start
            .saturating_add(usize::from(self.height))
            .min(self.lines.len());
        &self.lines[start..end]
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    #[cfg(test)]
    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
        self.clamp_offset();
    }
}

// === Wrapping ===

/// Convert one raw body line, color escapes included, into a styled line.
pub fn styled_line(raw: &str) -> Line<'static> {
    match raw.into_text() {
        Ok(text) => {
            let mut spans = Vec::new();
            for line in text.lines {
                let base = line.style;
                spans.extend(
                    line.spans
                        .into_iter()
                        .filter(|span| !span.content.is_empty())
                        .map(|span| Span::styled(span.content, base.patch(span.style))),
                );
            }
            Line::from(spans)
        }
        Err(err) => {
            tracing::debug!("Unparseable escape sequence in listing line: {err}");
            Line::raw(raw.to_string())
        }
    }
}

#[derive(Debug, Clone)]
struct Cell {
    grapheme: String,
    style: Style,
}

fn cell_width(cells: &[Cell]) -> usize {
    cells.iter().map(|c| c.grapheme.width()).sum()
}

fn cells_to_line(cells: &[Cell]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_style = None;
    for cell in cells {
        if current_style.is_some_and(|style| style != cell.style) {
            spans.push(Span::styled(
                std::mem::take(&mut current),
                current_style.unwrap_or_default(),
            ));
        }
        current_style = Some(cell.style);
        current.push_str(&cell.grapheme);
    }
    if let Some(style) = current_style {
        spans.push(Span::styled(current, style));
    }
    Line::from(spans)
}

fn trim_trailing_space(cells: &mut Vec<Cell>) {
    while cells.last().is_some_and(|c| c.grapheme.trim().is_empty()) {
        cells.pop();
    }
}

/// Split styled cells into alternating runs of whitespace and non-whitespace.
fn tokenize(cells: Vec<Cell>) -> Vec<(bool, Vec<Cell>)> {
    let mut tokens: Vec<(bool, Vec<Cell>)> = Vec::new();
    for cell in cells {
        let is_space = cell.grapheme.trim().is_empty();
        match tokens.last_mut() {
            Some((space, run)) if *space == is_space => run.push(cell),
            _ => tokens.push((is_space, vec![cell])),
        }
    }
    tokens
}

/// Greedy word wrap preserving span styles.
///
/// Words move to the next line whole; only a word wider than `width` is
/// hard-broken. Leading indentation of the source line is kept, spaces at a
/// wrap point are dropped. A width of zero disables wrapping.
fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line.clone()];
    }

    let cells: Vec<Cell> = line
        .spans
        .iter()
        .flat_map(|span| {
            let style = line.style.patch(span.style);
            span.content.graphemes(true).map(move |g| Cell {
                grapheme: g.to_string(),
                style,
            })
        })
        .collect();

    let mut out = Vec::new();
    let mut current: Vec<Cell> = Vec::new();
    let mut current_width = 0;
    let mut continuation = false;

    for (is_space, run) in tokenize(cells) {
        let run_width = cell_width(&run);

        if is_space {
            if continuation && current.is_empty() {
                continue;
            }
            if current_width + run_width <= width {
                current_width += run_width;
                current.extend(run);
            } else {
                trim_trailing_space(&mut current);
                if !current.is_empty() {
                    out.push(cells_to_line(&current));
                    current.clear();
                }
                current_width = 0;
                continuation = true;
            }
            continue;
        }

        if current_width + run_width <= width {
            current_width += run_width;
            current.extend(run);
            continue;
        }

        if run_width <= width {
            trim_trailing_space(&mut current);
            if !current.is_empty() {
                out.push(cells_to_line(&current));
            }
            current = run;
            current_width = run_width;
            continuation = true;
            continue;
        }

        // A word that cannot fit on any line starts fresh and is hard-broken.
        trim_trailing_space(&mut current);
        if !current.is_empty() {
            out.push(cells_to_line(&current));
            current.clear();
            current_width = 0;
            continuation = true;
        }
        for cell in run {
            let w = cell.grapheme.width();
            if current_width + w > width && !current.is_empty() {
                trim_trailing_space(&mut current);
                out.push(cells_to_line(&current));
                current.clear();
                current_width = 0;
                continuation = true;
            }
            current_width += w;
            current.push(cell);
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(cells_to_line(&current));
    }
    out
}
