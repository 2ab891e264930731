/// Error types for scanning and deletion.
///
/// Only [`ScanError::RootInaccessible`] ends a session. Everything that goes
/// wrong below the scan root is absorbed into the tree as partial data, and
/// every [`DeleteError`] becomes a timed status message.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a tree at all.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root itself could not be stat'ed.
    #[error("cannot access {}: {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background scanner thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),

    /// The scanner thread went away without reporting completion.
    #[error("scanner thread exited without a result")]
    WorkerLost,
}

/// Failure to remove an entry from disk.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The scan root has no parent to be detached from.
    #[error("refusing to delete the scan root")]
    RefuseRoot,

    /// The filesystem refused the removal.
    #[error("{}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background deleter thread could not be started.
    #[error("failed to spawn deleter thread: {0}")]
    Spawn(#[source] io::Error),

    /// The deleter thread went away without reporting completion.
    #[error("deleter thread exited without a result")]
    WorkerLost,
}
