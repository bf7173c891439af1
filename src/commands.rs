//! Command types returned from update
//!
//! Commands describe side effects for the host to perform: scheduling the
//! click debounce timer, swapping cell markup and moving focus.

use std::ops::Range;

use serde::Serialize;

use crate::cell::CellAddress;
use crate::grid::RenderMode;

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),

    // === Click Debounce ===
    /// Start the debounce timer for an armed click
    /// After delay_ms, sends CellMsg::ClickTimerExpired { generation }
    ArmClickTimer { generation: u64, delay_ms: u64 },
    /// Drop a timer that has not fired yet
    CancelClickTimer { generation: u64 },

    // === Cell Surface ===
    /// Replace the content of a cell element with new markup
    ReplaceCell {
        address: CellAddress,
        mode: RenderMode,
        markup: String,
    },
    /// Focus the cell's input, place the caret and select a range (characters)
    FocusInput {
        address: CellAddress,
        caret: usize,
        selection: Range<usize>,
    },
    /// Update an existing input in place without re-rendering
    SyncInput {
        address: CellAddress,
        value: String,
        disabled: bool,
    },
    /// Return keyboard focus to the grid's clipboard target
    FocusClipboard,
}

impl Cmd {
    /// Create a batch of commands, collapsing empty and single batches
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }

    /// Check if this command changes what is on screen
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // Timers only feed messages back into update
            Cmd::ArmClickTimer { .. } => false,
            Cmd::CancelClickTimer { .. } => false,
            Cmd::ReplaceCell { .. } => true,
            Cmd::FocusInput { .. } => true,
            Cmd::SyncInput { .. } => true,
            Cmd::FocusClipboard => false,
        }
    }
}

/// Merge an optional command into a list being built by an update function
pub(crate) fn push_cmd(cmds: &mut Vec<Cmd>, cmd: Option<Cmd>) {
    if let Some(cmd) = cmd {
        cmds.push(cmd);
    }
}
