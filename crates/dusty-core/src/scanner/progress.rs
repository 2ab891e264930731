/// Scan progress reporting — a lossy single-slot mailbox written by the scan
/// thread, and a tick-driven reporter that samples it on the UI thread.
///
/// Neither side ever waits on the other: the producer overwrites whatever is
/// pending (or drops its snapshot if the slot is momentarily held), and the
/// consumer takes at most one snapshot per tick.
use compact_str::CompactString;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::trace;

/// Period of the progress reporter's tick.
pub const PROGRESS_TICK: Duration = Duration::from_secs(1);

/// Number of top-level entries carried in the "largest items" preview.
pub const PREVIEW_LEN: usize = 5;

/// One completed top-level child of the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub name: CompactString,
    pub size: u64,
    pub is_dir: bool,
}

/// Counters and partial-tree summary published by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSnapshot {
    pub files_scanned: u64,
    pub dirs_scanned: u64,
    /// Cumulative size of the root computed so far.
    pub total_size: u64,
    /// Largest completed top-level children, largest first, at most [`PREVIEW_LEN`].
    pub largest: Vec<PreviewEntry>,
}

/// Single-slot "latest value" mailbox between the scan thread and the UI.
#[derive(Debug, Default)]
pub struct ProgressSlot {
    latest: Mutex<Option<ScanSnapshot>>,
}

impl ProgressSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending snapshot with `snapshot`.
    ///
    /// Never blocks: if the consumer holds the slot at this instant the
    /// snapshot is dropped. Returns whether it was stored.
    pub fn publish(&self, snapshot: ScanSnapshot) -> bool {
        match self.latest.try_lock() {
            Some(mut slot) => {
                *slot = Some(snapshot);
                true
            }
            None => false,
        }
    }

    /// Take the pending snapshot, if any, without waiting.
    pub fn take(&self) -> Option<ScanSnapshot> {
        self.latest.try_lock().and_then(|mut slot| slot.take())
    }
}

/// Periodic poller that turns scanner snapshots into UI-visible progress.
///
/// The reporter does not own a timer; the foreground loop calls
/// [`ProgressReporter::poll`] as often as it likes and the reporter only acts
/// once per elapsed interval.
#[derive(Debug)]
pub struct ProgressReporter {
    interval: Duration,
    next_tick: Instant,
    latest: Option<ScanSnapshot>,
}

impl ProgressReporter {
    /// Create a reporter whose first tick fires one `interval` after `start`.
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next_tick: start + interval,
            latest: None,
        }
    }

    /// Run a tick if one is due at `now`.
    ///
    /// Drains at most one snapshot from `slot` and returns `true` when the
    /// observable progress changed. Ticks that find the slot empty only re-arm.
    pub fn poll(&mut self, now: Instant, slot: &ProgressSlot) -> bool {
        if now < self.next_tick {
            return false;
        }
        self.next_tick = now + self.interval;

        match slot.take() {
            Some(mut snapshot) => {
                snapshot.largest.truncate(PREVIEW_LEN);
                trace!(
                    files = snapshot.files_scanned,
                    dirs = snapshot.dirs_scanned,
                    bytes = snapshot.total_size,
                    "progress tick"
                );
                self.latest = Some(snapshot);
                true
            }
            None => false,
        }
    }

    /// The most recently republished progress, `None` before the first one.
    pub fn latest(&self) -> Option<&ScanSnapshot> {
        self.latest.as_ref()
    }

    /// When the next tick is due.
    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }
}
