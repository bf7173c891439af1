//! Controller state
//!
//! `EditCellController` owns the edit session and the pending click of one
//! cell type. All transitions live in [`crate::update`]; this module only
//! holds state and read-only queries.

use std::fmt;

use crate::cell::{CellAddress, CellInput, CellKind};
use crate::commands::Cmd;
use crate::config::GridEditConfig;
use crate::grid::GridContext;
use crate::messages::CellMsg;

/// Default double-click window in milliseconds
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 500;

/// Tunables of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Window within which a second click on the same cell starts editing
    pub double_click_ms: u64,
    /// Length limit for cells whose data source reports none
    pub default_max_length: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            default_max_length: None,
        }
    }
}

impl From<&GridEditConfig> for ControllerConfig {
    fn from(config: &GridEditConfig) -> Self {
        Self {
            double_click_ms: config.double_click_ms,
            default_max_length: config.default_max_length,
        }
    }
}

/// The cell currently in edit mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub address: CellAddress,
    /// Value when editing started (restored on Escape, compared on commit)
    pub original_text: String,
    pub input: CellInput,
}

impl EditSession {
    pub fn is_modified(&self) -> bool {
        self.input.text() != self.original_text
    }
}

/// A single click waiting for its confirming second click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClick {
    pub address: CellAddress,
    /// Generation of the debounce timer armed for this click
    pub generation: u64,
}

/// Visual state of one cell as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Display,
    Armed,
    Editing,
}

/// A data source write failed while committing an edit
///
/// The edit session is already closed when this is returned. `followup`
/// carries the commands produced by the teardown so the host can still
/// apply them.
#[derive(Debug)]
pub struct CommitError {
    pub address: CellAddress,
    pub value: String,
    pub source: anyhow::Error,
    pub followup: Option<Cmd>,
}

impl CommitError {
    /// Take the teardown commands out of the error
    pub fn take_followup(&mut self) -> Option<Cmd> {
        self.followup.take()
    }
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to commit {:?} to cell {}: {}",
            self.value, self.address, self.source
        )
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Result of handling one message
pub type UpdateResult = Result<Option<Cmd>, CommitError>;

/// Edit-mode state machine for one text cell type
#[derive(Debug, Clone)]
pub struct EditCellController {
    pub(crate) kind: CellKind,
    pub(crate) config: ControllerConfig,
    pub(crate) session: Option<EditSession>,
    pub(crate) pending: Option<PendingClick>,
    pub(crate) next_generation: u64,
    pub(crate) selection_suspended: bool,
}

impl EditCellController {
    pub fn new(kind: CellKind, config: ControllerConfig) -> Self {
        Self {
            kind,
            config,
            session: None,
            pending: None,
            next_generation: 0,
            selection_suspended: false,
        }
    }

    pub fn text() -> Self {
        Self::new(CellKind::text(), ControllerConfig::default())
    }

    pub fn password() -> Self {
        Self::new(CellKind::password(), ControllerConfig::default())
    }

    pub fn convertible() -> Self {
        Self::new(CellKind::convertible(), ControllerConfig::default())
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Edit tag reported to the grid (`text`, `text-password`, `text-convertible`)
    pub fn edit_type(&self) -> &'static str {
        self.kind.edit_tag
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn editing_address(&self) -> Option<&CellAddress> {
        self.session.as_ref().map(|s| &s.address)
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn pending_click(&self) -> Option<&PendingClick> {
        self.pending.as_ref()
    }

    /// Whether global selection is currently suspended by this controller
    pub fn is_selection_suspended(&self) -> bool {
        self.selection_suspended
    }

    pub fn cell_state(&self, address: &CellAddress) -> CellState {
        if self.editing_address() == Some(address) {
            CellState::Editing
        } else if self.pending.as_ref().map(|p| &p.address) == Some(address) {
            CellState::Armed
        } else {
            CellState::Display
        }
    }

    /// Handle one message
    pub fn update(&mut self, ctx: &mut GridContext<'_>, msg: CellMsg) -> UpdateResult {
        crate::update::update(self, ctx, msg)
    }

    /// Enter edit mode for a cell directly, bypassing click disambiguation
    pub fn start_edit(&mut self, ctx: &mut GridContext<'_>, address: &CellAddress) -> UpdateResult {
        crate::update::start_edit(self, ctx, address)
    }

    /// Leave edit mode without committing and clear any pending click
    pub fn end_edit(&mut self, ctx: &mut GridContext<'_>) -> Option<Cmd> {
        crate::update::end_edit(self, ctx)
    }

    pub(crate) fn allocate_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}
