/// Background removal of a browsed entry.
///
/// The filesystem work runs on its own thread so the UI can animate while a
/// large directory is being removed. The tree is not touched here; once the
/// outcome arrives the caller applies it with
/// [`Navigator::apply_deletion`](crate::navigator::Navigator::apply_deletion).
use crate::error::DeleteError;
use crate::model::NodeIndex;
use crossbeam_channel::{Receiver, TryRecvError};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{info, warn};

/// Result of one removal, delivered once.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// The node that was targeted.
    pub target: NodeIndex,
    /// Base name, for status messages.
    pub name: String,
    pub result: Result<(), DeleteError>,
}

/// Handle to an in-flight removal.
pub struct DeleteHandle {
    pub target: NodeIndex,
    pub name: String,
    pub completion_rx: Receiver<DeleteOutcome>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl DeleteHandle {
    /// Non-blocking check for completion.
    pub fn try_complete(&self) -> Option<DeleteOutcome> {
        match self.completion_rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(DeleteOutcome {
                target: self.target,
                name: self.name.clone(),
                result: Err(DeleteError::WorkerLost),
            }),
        }
    }
}

/// Remove `path` from disk. Directories go recursively; symlinks are
/// removed themselves, never followed.
pub fn remove_path(path: &Path) -> Result<(), DeleteError> {
    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .map_err(|source| DeleteError::Remove {
            path: path.to_path_buf(),
            source,
        })?;

    let removed = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    removed.map_err(|source| DeleteError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

/// Start removing `path` (the on-disk location of `target`) on a background
/// thread.
pub fn start_delete(path: PathBuf, target: NodeIndex) -> Result<DeleteHandle, DeleteError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let (completion_tx, completion_rx) = crossbeam_channel::bounded::<DeleteOutcome>(1);
    let thread_name = name.clone();

    let thread = thread::Builder::new()
        .name("dusty-deleter".into())
        .spawn(move || {
            let result = remove_path(&path);
            match &result {
                Ok(()) => info!("Deleted {}", path.display()),
                Err(err) => warn!("Delete failed: {err}"),
            }
            let _ = completion_tx.send(DeleteOutcome {
                target,
                name: thread_name,
                result,
            });
        })
        .map_err(DeleteError::Spawn)?;

    Ok(DeleteHandle {
        target,
        name,
        completion_rx,
        _thread: Some(thread),
    })
}
