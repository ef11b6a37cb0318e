//! TUI event loop and rendering.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
};

use crate::palette::Styles;
use crate::taskline::{Taskline, load_listing};

use super::app::{App, AppAction, Mode};
use super::widgets::{
    FooterWidget, HeaderWidget, ListingWidget, Renderable, SummaryWidget, TitleStyle,
};

const INITIALIZING_TEXT: &str = "Initializing...";

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the dashboard until the user quits.
///
/// The first listing is fetched before the terminal is taken over.
pub fn run_tui(taskline: &dyn Taskline, styles: &Styles) -> Result<()> {
    let mut app = App::new(load_listing(taskline), TitleStyle::detect());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(err.into());
        }
    };

    let result = run_event_loop(&mut terminal, &mut app, taskline, styles);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Term,
    app: &mut App,
    taskline: &dyn Taskline,
    styles: &Styles,
) -> Result<()> {
    // crossterm does not report the starting size as an event.
    let size = terminal.size()?;
    app.handle_resize(size.width, size.height);

    loop {
        terminal.draw(|f| render(f, app, styles))?;

        match event::read()? {
            Event::Resize(width, height) => {
                terminal.clear()?;
                app.handle_resize(width, height);
            }
            Event::Key(key) => match app.handle_key(key) {
                AppAction::None => {}
                AppAction::Quit => return Ok(()),
                AppAction::Submit(submission) => {
                    // Blocks until taskline returns; show why first.
                    app.busy = true;
                    terminal.draw(|f| render(f, app, styles))?;
                    app.run_submission(taskline, &submission);
                }
            },
            _ => {}
        }
    }
}

/// Draw one frame from the current state.
pub fn render(f: &mut Frame, app: &App, styles: &Styles) {
    let size = f.area();
    if app.mode == Mode::Initializing {
        f.render_widget(Paragraph::new(INITIALIZING_TEXT), size);
        return;
    }

    let header = HeaderWidget::new(app, styles);
    let listing = ListingWidget::new(app, styles);
    let summary = SummaryWidget::new(&app.listing, styles);
    let footer = FooterWidget::new(app, styles);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.desired_height(size.width)),
            Constraint::Min(listing.desired_height(size.width)),
            Constraint::Length(summary.desired_height(size.width)),
            Constraint::Length(footer.desired_height(size.width)),
        ])
        .split(size);

    let buf = f.buffer_mut();
    header.render(chunks[0], buf);
    listing.render(chunks[1], buf);
    summary.render(chunks[2], buf);
    footer.render(chunks[3], buf);

    if let Some(cursor_pos) = header.cursor_pos(chunks[0]) {
        f.set_cursor_position(cursor_pos);
    }
}
