//! Logging setup: `tracing` events to a file under the XDG state dir, or to stderr.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,rhe_core=debug,rhe=debug";

/// Path of the log file: `~/.local/state/rhe/rhe.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rhe")?;
    Ok(xdg_dirs.get_state_home().join("rhe").join("rhe.log"))
}

/// Install a global subscriber appending to [`log_file_path`].
///
/// Returns Err if the log file cannot be opened; callers then use
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    install(Mutex::new(file));
    tracing::info!("rhe logging initialized at {}", path.display());
    Ok(())
}

/// Install a global subscriber writing to stderr.
pub fn init_logging_stderr() {
    install(io::stderr);
}

/// Plain-text fmt subscriber with the env filter, writing to `writer`.
fn install<W>(writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
