//! Application state and the key-driven mode transitions of the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::taskline::{EntryKind, Listing, Submission, Taskline, load_listing};
use crate::tui::action_words::{ActionKind, PanelContext};
use crate::tui::input::TextInput;
use crate::tui::viewport::{Layout, Viewport};
use crate::tui::widgets::TitleStyle;

// === Types ===

/// Interaction modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Before the first window size is known.
    Initializing,
    Normal,
    EnteringTask,
    EnteringNote,
    EnteringBoard,
    /// A board context is set and new entries are scoped to it.
    BoardActive,
    Help,
}

impl Mode {
    /// The action kind being edited, for the three entry modes.
    #[must_use]
    pub fn editing(self) -> Option<ActionKind> {
        match self {
            Mode::EnteringTask => Some(ActionKind::Task),
            Mode::EnteringNote => Some(ActionKind::Note),
            Mode::EnteringBoard => Some(ActionKind::Board),
            Mode::Initializing | Mode::Normal | Mode::BoardActive | Mode::Help => None,
        }
    }
}

/// What the event loop should do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    /// Run this submission, then reload and call [`App::finish_submission`].
    Submit(Submission),
}

/// Session state, owned by the event loop.
#[derive(Debug, Clone)]
pub struct App {
    pub mode: Mode,
    /// Where `h`/`esc` lead back to from help.
    pub help_return: Mode,
    pub board_context: Option<String>,
    pub pending_task: String,
    pub pending_note: String,
    pub input: TextInput,
    pub listing: Listing,
    pub viewport: Viewport,
    pub window: Option<(u16, u16)>,
    pub title: TitleStyle,
    pub busy: bool,
}

/// Lowercased command letter for a plain key press.
fn command_letter(key: &KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'C'))
}

impl App {
    #[must_use]
    pub fn new(listing: Listing, title: TitleStyle) -> Self {
        let mut app = Self {
            mode: Mode::Initializing,
            help_return: Mode::Normal,
            board_context: None,
            pending_task: String::new(),
            pending_note: String::new(),
            input: TextInput::new(),
            listing,
            viewport: Viewport::new(0, 0),
            window: None,
            title,
            busy: false,
        };
        app.relayout();
        app
    }

    /// Sizes derived from the last known window size.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.window
            .map(|(width, height)| {
                Layout::compute(width, height, self.listing.summary.len(), self.title.width())
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn panel_context(&self) -> PanelContext<'_> {
        PanelContext {
            mode: self.mode,
            board_context: self.board_context.as_deref(),
            pending_task: &self.pending_task,
            pending_note: &self.pending_note,
        }
    }

    fn relayout(&mut self) {
        let layout = self.layout();
        self.viewport.resize(
            layout.viewport_width,
            layout.viewport_height,
            &self.listing.body,
        );
    }

    /// Record a new window size. The first one ends initialization.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.window = Some((width, height));
        self.relayout();
        if self.mode == Mode::Initializing {
            self.mode = Mode::Normal;
        }
        tracing::debug!(
            width,
            height,
            wrapped = self.viewport.total_line_count(),
            "Window resized"
        );
    }

    /// Replace the listing and recompute everything that depends on it.
    pub fn apply_listing(&mut self, listing: Listing) {
        self.listing = listing;
        self.relayout();
    }

    pub fn reload(&mut self, taskline: &dyn Taskline) {
        self.apply_listing(load_listing(taskline));
    }

    /// Dispatch a submission, reload, and leave the entry mode.
    ///
    /// A failed submission is logged only; the reloaded listing shows
    /// whether the entry made it.
    pub fn run_submission(&mut self, taskline: &dyn Taskline, submission: &Submission) {
        tracing::debug!(args = ?submission.args(), "Submitting entry");
        if let Err(err) = taskline.submit(submission) {
            tracing::warn!("Failed to submit {:?}: {err}", submission.kind);
        }
        self.reload(taskline);
        self.finish_submission(submission.kind);
        self.busy = false;
    }

    pub fn finish_submission(&mut self, kind: EntryKind) {
        self.input.blur();
        self.input.clear();
        match kind {
            EntryKind::Task => self.pending_task.clear(),
            EntryKind::Note => self.pending_note.clear(),
        }
        self.mode = if self.board_context.is_some() {
            Mode::BoardActive
        } else {
            Mode::Normal
        };
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!("Mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    // === Key handling ===

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.kind != KeyEventKind::Press {
            return AppAction::None;
        }
        if is_ctrl_c(&key) {
            return AppAction::Quit;
        }

        match key.code {
            KeyCode::Up => {
                self.viewport.scroll_up(1);
                return AppAction::None;
            }
            KeyCode::Down => {
                self.viewport.scroll_down(1);
                return AppAction::None;
            }
            KeyCode::PageUp => {
                self.viewport.half_page_up();
                return AppAction::None;
            }
            KeyCode::PageDown => {
                self.viewport.half_page_down();
                return AppAction::None;
            }
            _ => {}
        }

        if let Some(kind) = self.mode.editing() {
            return self.handle_entry_key(kind, key);
        }

        let letter = command_letter(&key);
        match self.mode {
            Mode::Initializing => AppAction::None,
            Mode::Help => {
                match (key.code, letter) {
                    (KeyCode::Esc, _) | (_, Some('h' | '?')) => self.set_mode(self.help_return),
                    (_, Some('q')) => return AppAction::Quit,
                    _ => {}
                }
                AppAction::None
            }
            Mode::Normal | Mode::BoardActive => self.handle_browse_key(key.code, letter),
            Mode::EnteringTask | Mode::EnteringNote | Mode::EnteringBoard => AppAction::None,
        }
    }

    /// Keys for Normal and BoardActive.
    fn handle_browse_key(&mut self, code: KeyCode, letter: Option<char>) -> AppAction {
        if code == KeyCode::Esc {
            if self.mode == Mode::Normal {
                return AppAction::Quit;
            }
            self.board_context = None;
            self.input.clear();
            self.set_mode(Mode::Normal);
            return AppAction::None;
        }

        match letter {
            Some('q') => return AppAction::Quit,
            Some('h' | '?') => {
                self.help_return = self.mode;
                self.set_mode(Mode::Help);
            }
            Some(c) => {
                if let Some(kind) = ActionKind::from_shortcut(c) {
                    self.start_entry(kind);
                }
            }
            None => {}
        }
        AppAction::None
    }

    fn start_entry(&mut self, kind: ActionKind) {
        // Task and note drafts only exist after a quick-switch to board.
        let seed = match kind {
            ActionKind::Task => self.pending_task.clone(),
            ActionKind::Note => self.pending_note.clone(),
            ActionKind::Board if self.mode == Mode::BoardActive => {
                self.board_context.clone().unwrap_or_default()
            }
            ActionKind::Board => String::new(),
        };
        self.input.set_value(&seed);
        self.input.focus();
        self.set_mode(kind.entry_mode());
    }

    fn handle_entry_key(&mut self, editing: ActionKind, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                self.input.blur();
                self.set_mode(Mode::Normal);
            }
            KeyCode::Tab => self.quick_switch_to_board(editing),
            KeyCode::Enter => return self.commit(editing),
            _ => {
                self.input.handle_key(key);
            }
        }
        AppAction::None
    }

    /// Stash the current draft and jump to board entry.
    fn quick_switch_to_board(&mut self, editing: ActionKind) {
        let draft = self.input.value().trim().to_string();
        match editing {
            ActionKind::Task => self.pending_task = draft,
            ActionKind::Note => self.pending_note = draft,
            ActionKind::Board => return,
        }
        let context = self.board_context.clone().unwrap_or_default();
        self.input.set_value(&context);
        self.input.focus();
        self.set_mode(Mode::EnteringBoard);
    }

    fn commit(&mut self, editing: ActionKind) -> AppAction {
        let text = self.input.value().trim().to_string();
        if text.is_empty() {
            return AppAction::None;
        }
        match editing.entry_kind() {
            Some(kind) => AppAction::Submit(Submission {
                kind,
                text,
                board: self.board_context.clone(),
            }),
            None => {
                self.board_context = Some(text);
                self.input.blur();
                self.input.clear();
                self.set_mode(Mode::BoardActive);
                AppAction::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::taskline::runner::TasklineError;

    #[derive(Default)]
    struct FakeTaskline {
        listing: String,
        fail_fetch: bool,
        fail_submit: bool,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Taskline for FakeTaskline {
        fn fetch_listing(&self) -> Result<String, TasklineError> {
            if self.fail_fetch {
                return Err(TasklineError::Exit {
                    program: "taskline".to_string(),
                    code: Some(2),
                });
            }
            Ok(self.listing.clone())
        }

        fn submit(&self, submission: &Submission) -> Result<(), TasklineError> {
            self.calls.borrow_mut().push(submission.args());
            if self.fail_submit {
                return Err(TasklineError::Exit {
                    program: "taskline".to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    fn ready_app() -> App {
        let mut app = App::new(Listing::default(), TitleStyle::Boxed);
        app.handle_resize(80, 24);
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, taskline: &FakeTaskline, code: KeyCode) -> AppAction {
        let action = app.handle_key(key(code));
        if let AppAction::Submit(submission) = &action {
            app.run_submission(taskline, submission);
        }
        action
    }

    fn type_text(app: &mut App, taskline: &FakeTaskline, text: &str) {
        for c in text.chars() {
            press(app, taskline, KeyCode::Char(c));
        }
    }

    fn calls(taskline: &FakeTaskline) -> Vec<Vec<String>> {
        taskline.calls.borrow().clone()
    }

    #[test]
    fn first_resize_leaves_initializing() {
        let mut app = App::new(Listing::default(), TitleStyle::Boxed);
        assert_eq!(app.mode, Mode::Initializing);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), AppAction::None);
        assert_eq!(app.handle_key(key(KeyCode::Char('t'))), AppAction::None);
        assert_eq!(app.mode, Mode::Initializing);

        app.handle_resize(80, 24);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.viewport.width(), 77);
        assert_eq!(app.viewport.height(), 20);
    }

    #[test]
    fn plain_task_entry_runs_taskline_and_returns_to_normal() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();

        press(&mut app, &taskline, KeyCode::Char('t'));
        assert_eq!(app.mode, Mode::EnteringTask);
        assert!(app.input.is_focused());
        type_text(&mut app, &taskline, "buy milk");
        let action = press(&mut app, &taskline, KeyCode::Enter);

        assert!(matches!(action, AppAction::Submit(_)));
        assert_eq!(calls(&taskline), vec![vec!["t".to_string(), "buy milk".to_string()]]);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.input.value(), "");
        assert!(!app.input.is_focused());
    }

    #[test]
    fn note_in_board_context_is_scoped_to_the_board() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();

        press(&mut app, &taskline, KeyCode::Char('b'));
        type_text(&mut app, &taskline, "Sprint1");
        press(&mut app, &taskline, KeyCode::Enter);
        assert_eq!(app.mode, Mode::BoardActive);
        assert_eq!(app.board_context.as_deref(), Some("Sprint1"));
        assert!(calls(&taskline).is_empty());

        press(&mut app, &taskline, KeyCode::Char('n'));
        assert_eq!(app.input.value(), "");
        type_text(&mut app, &taskline, "follow up");
        press(&mut app, &taskline, KeyCode::Enter);

        assert_eq!(
            calls(&taskline),
            vec![vec![
                "n".to_string(),
                "follow up".to_string(),
                "-b".to_string(),
                "Sprint1".to_string()
            ]]
        );
        assert_eq!(app.mode, Mode::BoardActive);
    }

    #[test]
    fn empty_entries_are_ignored() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();

        press(&mut app, &taskline, KeyCode::Char('b'));
        assert_eq!(press(&mut app, &taskline, KeyCode::Enter), AppAction::None);
        assert_eq!(app.mode, Mode::EnteringBoard);
        assert_eq!(app.board_context, None);

        press(&mut app, &taskline, KeyCode::Esc);
        press(&mut app, &taskline, KeyCode::Char('t'));
        type_text(&mut app, &taskline, "   ");
        assert_eq!(press(&mut app, &taskline, KeyCode::Enter), AppAction::None);
        assert_eq!(app.mode, Mode::EnteringTask);
        assert!(calls(&taskline).is_empty());
    }

    #[test]
    fn quick_switch_stashes_and_restores_the_draft() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();

        press(&mut app, &taskline, KeyCode::Char('t'));
        type_text(&mut app, &taskline, "draft memo ");
        press(&mut app, &taskline, KeyCode::Tab);
        assert_eq!(app.mode, Mode::EnteringBoard);
        assert_eq!(app.pending_task, "draft memo");
        assert_eq!(app.input.value(), "");

        type_text(&mut app, &taskline, "Ops");
        press(&mut app, &taskline, KeyCode::Enter);
        assert_eq!(app.mode, Mode::BoardActive);

        press(&mut app, &taskline, KeyCode::Char('t'));
        assert_eq!(app.mode, Mode::EnteringTask);
        assert_eq!(app.input.value(), "draft memo");

        press(&mut app, &taskline, KeyCode::Enter);
        assert_eq!(
            calls(&taskline),
            vec![vec![
                "t".to_string(),
                "draft memo".to_string(),
                "-b".to_string(),
                "Ops".to_string()
            ]]
        );
        assert_eq!(app.pending_task, "");
        assert_eq!(app.mode, Mode::BoardActive);
    }

    #[test]
    fn quick_switch_seeds_the_current_board() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();
        app.board_context = Some("Sprint1".to_string());
        app.mode = Mode::BoardActive;

        press(&mut app, &taskline, KeyCode::Char('n'));
        type_text(&mut app, &taskline, "idea");
        press(&mut app, &taskline, KeyCode::Tab);
        assert_eq!(app.input.value(), "Sprint1");
        assert_eq!(app.pending_note, "idea");

        // Tab from board entry changes nothing.
        press(&mut app, &taskline, KeyCode::Tab);
        assert_eq!(app.mode, Mode::EnteringBoard);
        assert_eq!(app.input.value(), "Sprint1");
    }

    #[test]
    fn board_entry_from_board_active_is_seeded() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();
        app.board_context = Some("Sprint1".to_string());
        app.mode = Mode::BoardActive;

        press(&mut app, &taskline, KeyCode::Char('b'));
        assert_eq!(app.input.value(), "Sprint1");

        let mut app = ready_app();
        app.board_context = Some("Sprint1".to_string());
        press(&mut app, &taskline, KeyCode::Char('b'));
        assert_eq!(app.input.value(), "");
    }

    #[test]
    fn escape_behaviour_depends_on_mode() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();

        press(&mut app, &taskline, KeyCode::Char('n'));
        type_text(&mut app, &taskline, "half");
        press(&mut app, &taskline, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.input.is_focused());

        app.board_context = Some("Sprint1".to_string());
        app.mode = Mode::BoardActive;
        assert_eq!(press(&mut app, &taskline, KeyCode::Esc), AppAction::None);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.board_context, None);

        assert_eq!(press(&mut app, &taskline, KeyCode::Esc), AppAction::Quit);
    }

    #[test]
    fn help_toggles_back_to_the_previous_mode() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();
        app.board_context = Some("Sprint1".to_string());
        app.mode = Mode::BoardActive;

        press(&mut app, &taskline, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, &taskline, KeyCode::Char('t'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, &taskline, KeyCode::Char('H'));
        assert_eq!(app.mode, Mode::BoardActive);

        press(&mut app, &taskline, KeyCode::Char('h'));
        press(&mut app, &taskline, KeyCode::Esc);
        assert_eq!(app.mode, Mode::BoardActive);
        assert_eq!(app.board_context.as_deref(), Some("Sprint1"));

        press(&mut app, &taskline, KeyCode::Char('h'));
        assert_eq!(press(&mut app, &taskline, KeyCode::Char('q')), AppAction::Quit);
    }

    #[test]
    fn command_letters_are_case_insensitive() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();
        press(&mut app, &taskline, KeyCode::Char('T'));
        assert_eq!(app.mode, Mode::EnteringTask);
        type_text(&mut app, &taskline, "Buy");
        assert_eq!(app.input.value(), "Buy");
        assert_eq!(press(&mut app, &taskline, KeyCode::Char('Q')), AppAction::None);
        assert_eq!(app.input.value(), "BuyQ");
    }

    #[test]
    fn quit_keys() {
        let taskline = FakeTaskline::default();
        let mut app = ready_app();
        assert_eq!(press(&mut app, &taskline, KeyCode::Char('q')), AppAction::Quit);

        press(&mut app, &taskline, KeyCode::Char('t'));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), AppAction::Quit);
    }

    #[test]
    fn unlisted_keys_leave_the_mode_alone() {
        let taskline = FakeTaskline::default();
        let modes = [
            Mode::Normal,
            Mode::EnteringTask,
            Mode::EnteringNote,
            Mode::EnteringBoard,
            Mode::BoardActive,
            Mode::Help,
        ];
        for mode in modes {
            for code in [KeyCode::Char('x'), KeyCode::F(5), KeyCode::Left, KeyCode::Home] {
                let mut app = ready_app();
                app.mode = mode;
                assert_eq!(press(&mut app, &taskline, code), AppAction::None);
                assert_eq!(app.mode, mode, "{code:?} in {mode:?}");
            }
        }
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut app = ready_app();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('t'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(app.handle_key(release), AppAction::None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn scrolling_clamps_at_the_end_of_the_listing() {
        let taskline = FakeTaskline::default();
        let mut app = App::new(Listing::default(), TitleStyle::Boxed);
        // 14 rows minus header and footer leaves a 10-row viewport.
        app.handle_resize(83, 14);
        app.apply_listing(Listing {
            body: (0..25).map(|i| format!("line {i}")).collect(),
            summary: Vec::new(),
        });
        assert_eq!(app.viewport.height(), 10);

        for _ in 0..20 {
            press(&mut app, &taskline, KeyCode::Down);
        }
        assert_eq!(app.viewport.offset(), 15);
        for _ in 0..3 {
            press(&mut app, &taskline, KeyCode::Down);
        }
        assert_eq!(app.viewport.offset(), 15);

        press(&mut app, &taskline, KeyCode::PageUp);
        assert_eq!(app.viewport.offset(), 10);
        press(&mut app, &taskline, KeyCode::Up);
        assert_eq!(app.viewport.offset(), 9);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn summary_shrinks_the_viewport() {
        let mut app = ready_app();
        app.apply_listing(Listing {
            body: vec!["a".to_string()],
            summary: vec!["1 done".to_string(), "2 pending".to_string()],
        });
        assert_eq!(app.layout().summary_rows, 3);
        assert_eq!(app.viewport.height(), 17);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut app = ready_app();
        app.apply_listing(Listing {
            body: (0..40).map(|i| format!("entry {i} with some words")).collect(),
            summary: Vec::new(),
        });
        app.handle_resize(30, 12);
        let first = (app.layout(), app.viewport.lines().to_vec(), app.viewport.offset());
        app.handle_resize(30, 12);
        let second = (app.layout(), app.viewport.lines().to_vec(), app.viewport.offset());
        assert_eq!(first, second);
    }

    #[test]
    fn failed_submission_still_reloads() {
        let taskline = FakeTaskline {
            listing: "header\n  1. buy milk\n\n  1 pending\n\n".to_string(),
            fail_submit: true,
            ..FakeTaskline::default()
        };
        let mut app = ready_app();
        press(&mut app, &taskline, KeyCode::Char('t'));
        type_text(&mut app, &taskline, "buy milk");
        press(&mut app, &taskline, KeyCode::Enter);

        assert_eq!(calls(&taskline).len(), 1);
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.busy);
        assert_eq!(app.listing.body, vec!["  1. buy milk".to_string()]);
        assert_eq!(app.listing.summary, vec!["".to_string(), "  1 pending".to_string()]);
    }

    #[test]
    fn failed_fetch_shows_the_unavailable_listing() {
        let taskline = FakeTaskline {
            fail_fetch: true,
            ..FakeTaskline::default()
        };
        let mut app = ready_app();
        app.reload(&taskline);

        assert_eq!(app.listing, Listing::unavailable());
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.viewport.visible_lines().len(), 1);
    }

    #[test]
    fn submission_with_failed_reload_still_leaves_entry_mode() {
        let taskline = FakeTaskline {
            fail_fetch: true,
            ..FakeTaskline::default()
        };
        let mut app = ready_app();
        press(&mut app, &taskline, KeyCode::Char('b'));
        type_text(&mut app, &taskline, "Ops");
        press(&mut app, &taskline, KeyCode::Enter);
        press(&mut app, &taskline, KeyCode::Char('n'));
        type_text(&mut app, &taskline, "call back");
        press(&mut app, &taskline, KeyCode::Enter);

        assert_eq!(
            calls(&taskline),
            vec![vec![
                "n".to_string(),
                "call back".to_string(),
                "-b".to_string(),
                "Ops".to_string()
            ]]
        );
        assert_eq!(app.mode, Mode::BoardActive);
        assert!(!app.busy);
        assert!(!app.input.is_focused());
        assert_eq!(app.listing, Listing::unavailable());
    }
}
