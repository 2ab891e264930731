/// Runtime settings for a browsing session.
///
/// There is no configuration file; the binary fills this in from the
/// command line.
use dusty_core::scanner::PROGRESS_TICK;
use std::path::PathBuf;
use std::time::Duration;

/// How long a "Deleted: ..." message stays on screen.
pub const STATUS_OK_TTL: Duration = Duration::from_secs(3);

/// How long an "Error deleting: ..." message stays on screen.
pub const STATUS_ERROR_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory (or file) to scan.
    pub root: PathBuf,
    /// Period of the scan-progress tick.
    pub progress_tick: Duration,
}

impl Config {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            progress_tick: PROGRESS_TICK,
        }
    }

    pub fn with_progress_tick(mut self, tick: Duration) -> Self {
        self.progress_tick = tick;
        self
    }
}
