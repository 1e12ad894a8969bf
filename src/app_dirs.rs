use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "nback";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "nback.log";

/// Where nback keeps its settings and logs
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Settings file in the platform config directory
    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Log file under `~/.local/state/nback`, or the local data directory
    /// when `HOME` is unset.
    pub fn log_path() -> Option<PathBuf> {
        match std::env::var_os("HOME") {
            Some(home) => Some(
                PathBuf::from(home)
                    .join(".local/state")
                    .join(APP_NAME)
                    .join(LOG_FILE),
            ),
            None => Self::project().map(|dirs| dirs.data_local_dir().join(LOG_FILE)),
        }
    }
}
