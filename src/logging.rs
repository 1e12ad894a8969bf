//! Log file setup.
//!
//! The terminal belongs to the TUI, so logs only ever go to a file. Filtering
//! follows `RUST_LOG` and defaults to `info`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{NbackError, Result};

/// Installs a global subscriber appending to `path`.
///
/// Fails with [`NbackError::Logging`] if a subscriber is already installed.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| NbackError::Logging(e.to_string()))
}
