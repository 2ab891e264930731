/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. The scan and
/// delete threads communicate only through their handles; state updates
/// happen in [`AppState::tick`] and [`AppState::handle_command`], both of
/// which return immediately.
///
/// The tree has a single owner at every point: the scan thread while it is
/// being built, then the [`Navigator`] once the completion signal arrives.
use crate::config::{Config, STATUS_ERROR_TTL, STATUS_OK_TTL};
use crate::input::Command;
use dusty_core::deleter::{start_delete, DeleteHandle};
use dusty_core::scanner::{start_scan, ProgressReporter, ScanHandle, ScanSnapshot, ScanStats};
use dusty_core::{Navigator, ScanError};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Braille spinner frames shared by the scan and delete indicators.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// How often the delete spinner advances.
const DELETE_SPINNER_STEP: Duration = Duration::from_millis(100);

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Spinner and live counters.
    Scanning,
    /// Scan complete, the tree can be browsed.
    Browsing,
    /// The scan root could not be read; nothing to browse.
    Failed,
}

/// A transient message shown in the footer until it expires.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// All application state.
pub struct AppState {
    pub phase: AppPhase,
    pub root_path: PathBuf,
    pub started_at: Instant,

    // ── Scan ───────────────────────────────────────────
    pub scan_handle: Option<ScanHandle>,
    pub reporter: ProgressReporter,
    pub scan_stats: Option<ScanStats>,
    pub scan_error: Option<ScanError>,

    // ── Browsing ───────────────────────────────────────
    pub navigator: Option<Navigator>,
    pub delete_handle: Option<DeleteHandle>,
    pub delete_started: Option<Instant>,
    pub status: Option<StatusMessage>,

    should_quit: bool,
}

impl AppState {
    /// Create the state and kick off the background scan.
    pub fn new(config: &Config) -> Self {
        let now = Instant::now();
        let mut state = Self {
            phase: AppPhase::Scanning,
            root_path: config.root.clone(),
            started_at: now,
            scan_handle: None,
            reporter: ProgressReporter::starting_at(config.progress_tick, now),
            scan_stats: None,
            scan_error: None,
            navigator: None,
            delete_handle: None,
            delete_started: None,
            status: None,
            should_quit: false,
        };

        match start_scan(config.root.clone()) {
            Ok(handle) => state.scan_handle = Some(handle),
            Err(err) => state.fail_scan(err),
        }
        state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// `true` while a delete is outstanding.
    pub fn is_deleting(&self) -> bool {
        self.delete_handle.is_some()
    }

    /// Latest progress republished by the reporter.
    pub fn progress(&self) -> Option<&ScanSnapshot> {
        self.reporter.latest()
    }

    /// Advance background work: sample scan progress, pick up scan and delete
    /// completions. Returns `true` if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let scan_changed = self.process_scan_messages(now);
        let delete_changed = self.process_delete_messages(now);
        scan_changed || delete_changed
    }

    /// Poll the progress reporter and the scan completion signal.
    pub fn process_scan_messages(&mut self, now: Instant) -> bool {
        let Some(handle) = self.scan_handle.as_ref() else {
            return false;
        };

        let mut changed = self.reporter.poll(now, &handle.progress);

        if let Some(outcome) = handle.try_complete() {
            // Any snapshot still in the mailbox is dropped with the handle.
            self.scan_handle = None;
            match outcome {
                Ok(result) => {
                    info!(
                        "Browsing {} ({} files, {} dirs)",
                        self.root_path.display(),
                        result.stats.files,
                        result.stats.dirs
                    );
                    self.scan_stats = Some(result.stats);
                    self.navigator = Some(Navigator::new(result.tree));
                    self.phase = AppPhase::Browsing;
                }
                Err(err) => self.fail_scan(err),
            }
            changed = true;
        }
        changed
    }

    /// Pick up a finished delete and fold it into the tree.
    pub fn process_delete_messages(&mut self, now: Instant) -> bool {
        let Some(outcome) = self.delete_handle.as_ref().and_then(|h| h.try_complete()) else {
            return false;
        };
        self.delete_handle = None;
        self.delete_started = None;

        match outcome.result {
            Ok(()) => {
                if let Some(nav) = self.navigator.as_mut() {
                    nav.apply_deletion(outcome.target);
                }
                self.set_status(format!("Deleted: {}", outcome.name), STATUS_OK_TTL, now);
            }
            Err(err) => {
                self.set_status(format!("Error deleting: {err}"), STATUS_ERROR_TTL, now);
            }
        }
        true
    }

    /// Apply one user command.
    ///
    /// Quit is honoured at any time; everything else is ignored unless the
    /// tree is browsable and no delete is in flight.
    pub fn handle_command(&mut self, command: Command, now: Instant) {
        if command == Command::Quit {
            self.should_quit = true;
            return;
        }
        if self.is_deleting() {
            return;
        }
        let Some(nav) = self.navigator.as_mut() else {
            return;
        };

        match command {
            Command::Up => nav.move_cursor(-1),
            Command::Down => nav.move_cursor(1),
            Command::Enter => {
                nav.enter();
            }
            Command::Exit => {
                nav.exit();
            }
            Command::ToggleSort => nav.toggle_sort(),
            Command::GoToRoot => nav.go_to_root(),
            Command::Delete => self.begin_delete(now),
            Command::Quit => {}
        }
    }

    /// Start removing the entry under the cursor.
    fn begin_delete(&mut self, now: Instant) {
        let Some(nav) = self.navigator.as_ref() else {
            return;
        };
        let Some(target) = nav.selected() else {
            return;
        };

        let started = nav
            .deletion_path(target)
            .and_then(|path| start_delete(path, target));
        match started {
            Ok(handle) => {
                info!("Deleting {}", handle.name);
                self.delete_handle = Some(handle);
                self.delete_started = Some(now);
            }
            Err(err) => {
                warn!("Could not start delete: {err}");
                self.set_status(format!("Error deleting: {err}"), STATUS_ERROR_TTL, now);
            }
        }
    }

    /// Spinner frame for the scan view, ten frames per second of scanning.
    pub fn scan_spinner(&self, now: Instant) -> &'static str {
        let tenths = now.saturating_duration_since(self.started_at).as_millis() / 100;
        SPINNER_FRAMES[tenths as usize % SPINNER_FRAMES.len()]
    }

    /// Spinner frame for an in-flight delete, `None` when idle.
    pub fn delete_spinner(&self, now: Instant) -> Option<&'static str> {
        let started = self.delete_started?;
        let steps = now.saturating_duration_since(started).as_millis()
            / DELETE_SPINNER_STEP.as_millis();
        Some(SPINNER_FRAMES[steps as usize % SPINNER_FRAMES.len()])
    }

    /// The footer message, if one is still live at `now`.
    pub fn active_status(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| now < s.expires_at)
            .map(|s| s.text.as_str())
    }

    /// Seconds since the session started, for the scan view.
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started_at).as_secs_f64()
    }

    fn set_status(&mut self, text: String, ttl: Duration, now: Instant) {
        self.status = Some(StatusMessage {
            text,
            expires_at: now + ttl,
        });
    }

    fn fail_scan(&mut self, err: ScanError) {
        warn!("Scan failed: {err}");
        self.scan_error = Some(err);
        self.phase = AppPhase::Failed;
    }
}
