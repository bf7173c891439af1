//! Where gridedit keeps its config and logs
//!
//! The base directory is `$GRIDEDIT_CONFIG_DIR` when set, otherwise
//! `gridedit/` under the platform config root:
//! - Unix/macOS: `$XDG_CONFIG_HOME`, else `~/.config`
//! - Windows: `%APPDATA%`

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

const APP_DIR: &str = "gridedit";

/// Environment variable that relocates the whole config directory
pub const CONFIG_DIR_ENV: &str = "GRIDEDIT_CONFIG_DIR";

/// Base name of the daily rotated log files
pub const LOG_FILE_PREFIX: &str = "gridedit.log";

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}

fn platform_root() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs::config_dir()
    } else {
        non_empty(env::var_os("XDG_CONFIG_HOME"))
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    }
}

fn resolve_config_dir(override_dir: Option<OsString>, root: Option<PathBuf>) -> Option<PathBuf> {
    match non_empty(override_dir) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => root.map(|root| root.join(APP_DIR)),
    }
}

/// Base config directory, or None when no home/config root can be found
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(env::var_os(CONFIG_DIR_ENV), platform_root())
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> anyhow::Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    ensure_dir(&logs)?;
    Ok(logs)
}
