//! The task / note / board action words shown next to the title.

use ratatui::text::Span;

use crate::palette::Styles;
use crate::taskline::EntryKind;
use crate::tui::app::Mode;

/// Glyph shown before the board word while composing a task or note.
pub const TAB_HINT: &str = "⇥";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Task,
    Note,
    Board,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Task, ActionKind::Note, ActionKind::Board];

    #[must_use]
    pub fn shortcut(self) -> char {
        match self {
            ActionKind::Task => 't',
            ActionKind::Note => 'n',
            ActionKind::Board => 'b',
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Task => "task",
            ActionKind::Note => "note",
            ActionKind::Board => "board",
        }
    }

    #[must_use]
    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.shortcut() == c)
    }

    /// Mode that edits this kind.
    #[must_use]
    pub fn entry_mode(self) -> Mode {
        match self {
            ActionKind::Task => Mode::EnteringTask,
            ActionKind::Note => Mode::EnteringNote,
            ActionKind::Board => Mode::EnteringBoard,
        }
    }

    /// What committing this kind creates in taskline, if anything.
    #[must_use]
    pub fn entry_kind(self) -> Option<EntryKind> {
        match self {
            ActionKind::Task => Some(EntryKind::Task),
            ActionKind::Note => Some(EntryKind::Note),
            ActionKind::Board => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Shortcut letter highlighted, the rest bold. Keybinding discovery.
    Shortcut,
    /// Being edited: the whole label highlighted, followed by the input.
    Active,
    /// In effect but not being edited (board while a context is set).
    Selected,
    Muted,
}

/// How one action word should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionWord {
    pub kind: ActionKind,
    pub emphasis: Emphasis,
    pub show_input: bool,
    pub tab_hint: bool,
    pub annotation: Option<String>,
}

/// State the panel is derived from.
#[derive(Debug, Clone, Copy)]
pub struct PanelContext<'a> {
    pub mode: Mode,
    pub board_context: Option<&'a str>,
    pub pending_task: &'a str,
    pub pending_note: &'a str,
}

impl PanelContext<'_> {
    fn annotation(&self, kind: ActionKind) -> Option<String> {
        let text = match kind {
            ActionKind::Task => Some(self.pending_task),
            ActionKind::Note => Some(self.pending_note),
            ActionKind::Board => self.board_context,
        };
        text.filter(|t| !t.is_empty()).map(str::to_string)
    }
}

#[must_use]
pub fn action_word(kind: ActionKind, ctx: &PanelContext<'_>) -> ActionWord {
    let editing = ctx.mode.editing();
    let is_editing = editing == Some(kind);

    let emphasis = match (editing, ctx.mode) {
        (Some(_), _) if is_editing => Emphasis::Active,
        (Some(_), _) => Emphasis::Muted,
        (None, Mode::BoardActive) if kind == ActionKind::Board => Emphasis::Selected,
        (None, _) => Emphasis::Shortcut,
    };

    let tab_hint = kind == ActionKind::Board
        && matches!(ctx.mode, Mode::EnteringTask | Mode::EnteringNote);

    ActionWord {
        kind,
        emphasis,
        show_input: is_editing,
        tab_hint,
        annotation: if is_editing {
            None
        } else {
            ctx.annotation(kind)
        },
    }
}

/// Directives for all three words, in display order.
#[must_use]
pub fn action_words(ctx: &PanelContext<'_>) -> [ActionWord; 3] {
    ActionKind::ALL.map(|kind| action_word(kind, ctx))
}

/// Spans for a shortcut-style word: one leading space, the key, the rest.
#[must_use]
pub fn shortcut_spans(key: &str, rest: &str, styles: &Styles) -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        Span::styled(key.to_string(), styles.highlight),
        Span::styled(rest.to_string(), styles.bold),
    ]
}

impl ActionWord {
    /// Label spans, excluding the live input.
    #[must_use]
    pub fn spans(&self, styles: &Styles) -> Vec<Span<'static>> {
        let label = self.kind.label();
        let (key, rest) = label.split_at(1);

        let mut spans = match self.emphasis {
            Emphasis::Shortcut => shortcut_spans(key, rest, styles),
            Emphasis::Active => vec![Span::raw(" "), Span::styled(label, styles.highlight)],
            Emphasis::Selected => vec![
                Span::raw(" "),
                Span::styled(key.to_string(), styles.highlight),
                Span::raw(rest.to_string()),
            ],
            Emphasis::Muted => vec![Span::raw(" "), Span::styled(label, styles.muted)],
        };
        if self.tab_hint {
            spans.insert(1, Span::styled(TAB_HINT, styles.highlight));
        }
        if let Some(annotation) = &self.annotation {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(annotation.clone(), styles.muted));
        }
        spans
    }
}
