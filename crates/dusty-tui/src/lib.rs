/// dusty TUI — ratatui/crossterm terminal frontend.
///
/// This crate contains all terminal code. Business logic lives in `dusty-core`.
pub mod app;
pub mod config;
pub mod input;
pub mod state;
pub mod ui;

pub use app::{run, TuiError};
pub use config::Config;
pub use input::Command;
pub use state::{AppPhase, AppState};
