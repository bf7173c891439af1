//! Message types for the cell edit controller
//!
//! Every UI event that can change edit state arrives as a [`CellMsg`] and is
//! dispatched by [`crate::update::update`].

use serde::{Deserialize, Serialize};

use crate::cell::{CellAddress, CellAttribute, ElementId};

/// Keys the controller reacts to while a cell is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditKey {
    /// Confirm the edit (commit, then leave edit mode)
    Enter,
    /// Restore the original text and leave edit mode without committing
    Escape,
    Up,
    Down,
    PageUp,
    PageDown,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
}

impl EditKey {
    /// Navigation keys that are swallowed while editing
    pub fn is_swallowed(self) -> bool {
        matches!(
            self,
            EditKey::Up | EditKey::Down | EditKey::PageUp | EditKey::PageDown
        )
    }
}

/// Text edits applied to the input of the cell being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMsg {
    InsertChar(char),
    /// Paste (newlines dropped, clipped to the max length)
    InsertText(String),
    DeleteBackward,
    DeleteForward,
    CursorLeft { extend: bool },
    CursorRight { extend: bool },
    CursorHome { extend: bool },
    CursorEnd { extend: bool },
    SelectAll,
    /// The input value was replaced wholesale (e.g. by the platform)
    SetValue(String),
}

/// Messages handled by the edit controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellMsg {
    /// Mouse click on a rendered element
    Click { target: ElementId },
    /// The double-click debounce timer of the given arming fired
    ClickTimerExpired { generation: u64 },
    /// Programmatic focus-in (e.g. Enter on a focused cell)
    FocusIn { target: ElementId },
    /// Programmatic focus-out: hand focus back to the grid, which blurs the input
    FocusOut,
    /// The edit input lost focus
    Blur,
    /// Key pressed inside the edit input
    KeyDown(EditKey),
    /// Text editing inside the edit input
    Input(InputMsg),
    /// The data source changed attributes of a cell
    ModelChanged {
        address: CellAddress,
        changed: Vec<CellAttribute>,
    },
}
