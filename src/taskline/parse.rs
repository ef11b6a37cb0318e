//! Splitting raw `taskline` output into the scrollable body and the summary.
//!
//! This module has no crate-internal dependencies so integration tests can
//! include it directly.

/// Body line shown when the listing could not be fetched at all.
pub const UNAVAILABLE_LINE: &str = "(error running taskline)";

/// Number of trailing lines that form the summary.
pub const SUMMARY_LINES: usize = 2;

/// Leading control/blank lines taskline always emits.
const LEADING_CONTROL_LINES: usize = 1;
/// Trailing control/blank lines taskline always emits.
const TRAILING_CONTROL_LINES: usize = 2;
/// Outputs at or below this many lines are shown verbatim.
const DEGENERATE_MAX_LINES: usize = 3;

/// One parsed listing: the main content and the trailing summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub body: Vec<String>,
    pub summary: Vec<String>,
}

impl Listing {
    /// Placeholder listing for a failed fetch.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            body: vec![UNAVAILABLE_LINE.to_string()],
            summary: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_summary(&self) -> bool {
        !self.summary.is_empty()
    }
}

/// Normalize line endings to `\n` only.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "")
    } else {
        text.to_string()
    }
}

/// Parse raw taskline output.
///
/// A trailing newline yields a trailing empty line, matching how the tool's
/// output is framed: one leading control line and two trailing ones.
#[must_use]
pub fn parse_listing(raw: &str) -> Listing {
    let normalized = normalize_line_endings(raw);
    let lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();

    if lines.len() <= DEGENERATE_MAX_LINES {
        return Listing {
            body: lines,
            summary: Vec::new(),
        };
    }

    let inner = &lines[LEADING_CONTROL_LINES..lines.len() - TRAILING_CONTROL_LINES];
    let split_at = inner.len().saturating_sub(SUMMARY_LINES);
    Listing {
        body: inner[..split_at].to_vec(),
        summary: inner[split_at..].to_vec(),
    }
}
