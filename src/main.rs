//! dusty — interactive terminal disk usage browser.
//!
//! Thin binary entry point. All logic lives in the `dusty-core`
//! and `dusty-tui` crates.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dusty", version, about = "Browse disk usage in the terminal")]
struct Cli {
    /// Directory to scan.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Write logs to this file. Filter with the DUSTY_LOG variable.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Milliseconds between scan progress updates.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    tick_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(err) = fs::metadata(&cli.path) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    // The terminal belongs to the UI, so logs only go to a file on request.
    if let Some(log_path) = &cli.log_file {
        let file = fs::File::create(log_path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_env("DUSTY_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    tracing::info!("dusty starting in {}", cli.path.display());

    let config = dusty_tui::Config::new(cli.path)
        .with_progress_tick(Duration::from_millis(cli.tick_ms));
    dusty_tui::run(&config)?;

    Ok(())
}
