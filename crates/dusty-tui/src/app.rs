/// Terminal session — raw mode, alternate screen and the frame loop.
///
/// The loop draws, waits briefly for a key, then lets [`AppState::tick`]
/// pick up background results. Quitting returns immediately; a scan or
/// delete still running is abandoned with its thread.
use crate::config::Config;
use crate::input::Command;
use crate::state::{AppPhase, AppState};
use crate::ui::render;
use crossterm::event::{self, Event};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// How long to wait for input before redrawing. Keeps spinners moving.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Failures of the terminal itself. Scan and delete problems are shown on
/// screen instead.
#[derive(Debug, Error)]
pub enum TuiError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run an interactive session until the user quits.
///
/// The terminal is restored on every exit path, including panics.
pub fn run(config: &Config) -> Result<(), TuiError> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        original_hook(info);
    }));

    let result = setup_terminal().and_then(|mut terminal| event_loop(&mut terminal, config));
    restore_terminal();

    let _ = panic::take_hook();
    result
}

fn event_loop(terminal: &mut Terminal, config: &Config) -> Result<(), TuiError> {
    let mut state = AppState::new(config);
    info!("Session started for {}", config.root.display());

    while !state.should_quit() {
        let now = Instant::now();
        state.tick(now);
        terminal.draw(|frame| render(frame, &state, now))?;

        if event::poll(POLL_TIMEOUT)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = Command::from_key(key) {
                    debug!("Command {command:?}");
                    state.handle_command(command, Instant::now());
                }
            }
        }
    }

    if state.is_deleting() || state.phase == AppPhase::Scanning {
        info!("Quitting with background work still running");
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal, TuiError> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    Ok(ratatui::Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}
