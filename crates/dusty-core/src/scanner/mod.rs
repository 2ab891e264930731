/// Scanner module — runs the directory walk on a background thread.
///
/// The scan thread owns the tree exclusively while building it. The UI sees
/// only lossy [`progress::ScanSnapshot`]s through the shared
/// [`progress::ProgressSlot`], and receives the finished tree exactly once on
/// the completion channel, at which point ownership moves to the UI.
pub mod progress;
pub mod walk;

pub use progress::{
    PreviewEntry, ProgressReporter, ProgressSlot, ScanSnapshot, PREVIEW_LEN, PROGRESS_TICK,
};
pub use walk::{scan_path, ScanResult, ScanStats};

use crate::error::ScanError;
use crossbeam_channel::{Receiver, TryRecvError};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

/// Outcome delivered once on the completion channel.
pub type ScanOutcome = Result<ScanResult, ScanError>;

/// Handle to a running or completed scan.
///
/// Dropping the handle abandons the scan: the thread keeps running until the
/// walk finishes and its result is discarded.
pub struct ScanHandle {
    /// Latest-value progress mailbox, written by the scan thread.
    pub progress: Arc<ProgressSlot>,
    /// One-shot completion signal.
    pub completion_rx: Receiver<ScanOutcome>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Non-blocking check for completion.
    ///
    /// Returns `None` while the scan is still running. A thread that died
    /// without reporting is surfaced as [`ScanError::WorkerLost`].
    pub fn try_complete(&self) -> Option<ScanOutcome> {
        match self.completion_rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ScanError::WorkerLost)),
        }
    }
}

/// Start a new scan on a background thread.
///
/// Returns a `ScanHandle` for sampling progress and receiving the finished
/// tree.
pub fn start_scan(root_path: PathBuf) -> Result<ScanHandle, ScanError> {
    let (completion_tx, completion_rx) = crossbeam_channel::bounded::<ScanOutcome>(1);
    let progress = Arc::new(ProgressSlot::new());
    let progress_clone = progress.clone();

    let thread = thread::Builder::new()
        .name("dusty-scanner".into())
        .spawn(move || {
            let outcome = scan_path(&root_path, &progress_clone);
            // The receiver is gone if the session was abandoned.
            let _ = completion_tx.send(outcome);
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress,
        completion_rx,
        _thread: Some(thread),
    })
}
