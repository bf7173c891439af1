//! Tracing infrastructure
//!
//! Provides structured logging with scoped filtering for debugging edit-state
//! transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=edit_state=debug` - only state diffs from update
//! - `RUST_LOG=gridedit::update=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/gridedit/logs/gridedit.log` with daily rotation.
//! File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::cell::CellAddress;
use crate::model::EditCellController;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// the logs directory with daily rotation; if the directory cannot be created
/// only console logging is installed.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(
                logs_dir,
                crate::config_paths::LOG_FILE_PREFIX,
            );
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    // A subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of controller state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSnapshot {
    pub editing: Option<CellAddress>,
    pub modified: bool,
    pub pending: Option<(CellAddress, u64)>,
    pub selection_suspended: bool,
}

impl EditSnapshot {
    pub fn from_controller(controller: &EditCellController) -> Self {
        Self {
            editing: controller.editing_address().cloned(),
            modified: controller.session().is_some_and(|s| s.is_modified()),
            pending: controller
                .pending_click()
                .map(|p| (p.address.clone(), p.generation)),
            selection_suspended: controller.is_selection_suspended(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &EditSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.editing != other.editing {
            changes.push(format!(
                "editing: {} → {}",
                describe(self.editing.as_ref()),
                describe(other.editing.as_ref())
            ));
        }
        if self.modified != other.modified && self.editing == other.editing {
            changes.push(format!("modified: {} → {}", self.modified, other.modified));
        }
        if self.pending != other.pending {
            let fmt_pending = |p: &Option<(CellAddress, u64)>| match p {
                Some((address, generation)) => format!("{}#{}", address, generation),
                None => "none".to_string(),
            };
            changes.push(format!(
                "pending: {} → {}",
                fmt_pending(&self.pending),
                fmt_pending(&other.pending)
            ));
        }
        if self.selection_suspended != other.selection_suspended {
            let status = if other.selection_suspended {
                "suspended"
            } else {
                "resumed"
            };
            changes.push(format!("selection {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn describe(address: Option<&CellAddress>) -> String {
    address
        .map(|a| a.to_string())
        .unwrap_or_else(|| "none".to_string())
}
