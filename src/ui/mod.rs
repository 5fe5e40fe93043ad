// Terminal user interface

mod app;
mod view;

pub use app::{App, Mode};
pub use view::draw;

use crate::state::TaskState;
use crossterm::{
    cursor::Show,
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::{Context, Result};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use tracing::{info, warn};

/// Runs `restore` when dropped, whichever way the enclosing scope exits
struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!(error = ?e, "Failed to disable raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        warn!(error = ?e, "Failed to leave alternate screen");
    }
}

/// Run the interactive screen until the user quits
///
/// Returns the state so the caller can flush pending saves. The terminal is
/// restored on every exit path once raw mode has been enabled.
pub fn run(state: TaskState) -> Result<TaskState> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let _guard = RestoreGuard::new(restore_terminal);

    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to set up terminal")?;

    let mut app = App::new(state);
    run_app(&mut terminal, &mut app)?;

    info!(count = app.state().tasks().len(), "Closing task list");
    Ok(app.into_state())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| draw(f, app))?;
        app.handle_event(event::read()?);
    }
    Ok(())
}
