/// dusty core — scanning, tree model, navigation and deletion.
///
/// This crate contains all business logic with zero UI dependencies.
///
/// # Modules
///
/// - [`model`] — Arena-allocated file tree and supporting types.
/// - [`scanner`] — Background filesystem scanning with lossy progress reporting.
/// - [`navigator`] — Cursor, current directory and sort state over a finished tree.
/// - [`deleter`] — Background removal of an entry from disk.
/// - [`error`] — Scan and delete error types.
pub mod deleter;
pub mod error;
pub mod model;
pub mod navigator;
pub mod scanner;

pub use error::{DeleteError, ScanError};
pub use navigator::{DirectoryView, EntryView, Navigator};
