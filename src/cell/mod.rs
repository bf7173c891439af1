//! Cell types shared by the controller and its collaborators
//!
//! A cell is addressed by `(row key, column name)`. The kind of a cell
//! (text, password, convertible) is a small capability set rather than a
//! type hierarchy:
//!
//! ```text
//! CellKind
//! ├── input_kind   Plain | Masked
//! ├── edit_tag     "text" | "text-password" | "text-convertible"
//! └── activation   Focus (always an input) | DoubleClick (static text until edited)
//! ```

mod input;

pub use input::CellInput;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row identifier
///
/// Grid rows can be keyed by numbers or strings. Keys compare by their
/// string form, so `RowKey::from(3)` and `RowKey::from("3")` are the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric row index, if the key is one
    pub fn as_index(&self) -> Option<usize> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<usize> for RowKey {
    fn from(key: usize) -> Self {
        Self(key.to_string())
    }
}

impl From<u64> for RowKey {
    fn from(key: u64) -> Self {
        Self(key.to_string())
    }
}

impl From<i32> for RowKey {
    fn from(key: i32) -> Self {
        Self(key.to_string())
    }
}

impl From<&str> for RowKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for RowKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Address of one cell in the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub row_key: RowKey,
    pub column_name: String,
}

impl CellAddress {
    pub fn new(row_key: impl Into<RowKey>, column_name: impl Into<String>) -> Self {
        Self {
            row_key: row_key.into(),
            column_name: column_name.into(),
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row_key, self.column_name)
    }
}

/// Opaque handle of a rendered cell element (event target)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cell state as reported by the grid data source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellRenderState {
    pub is_editable: bool,
    pub is_disabled: bool,
    pub value: String,
    /// Maximum input length in characters (None = unlimited)
    pub max_length: Option<usize>,
}

impl CellRenderState {
    /// Editable and enabled cell with the given value
    pub fn editable(value: impl Into<String>) -> Self {
        Self {
            is_editable: true,
            is_disabled: false,
            value: value.into(),
            max_length: None,
        }
    }

    /// Whether the cell may enter edit mode right now
    pub fn can_edit(&self) -> bool {
        self.is_editable && !self.is_disabled
    }
}

/// Whether the input shows its characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Plain,
    Masked,
}

impl InputKind {
    /// Value of the `type` attribute of the input element
    pub fn input_type(self) -> &'static str {
        match self {
            InputKind::Plain => "text",
            InputKind::Masked => "password",
        }
    }
}

/// How a cell gets into edit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
    /// The cell is always an input; a click focuses it directly
    Focus,
    /// The cell shows static text; a confirmed double click converts it to an input
    DoubleClick,
}

/// Cell attributes reported as changed by the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAttribute {
    Editable,
    Disabled,
    Value,
}

/// Capability set of an editable text cell type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellKind {
    pub input_kind: InputKind,
    pub edit_tag: &'static str,
    pub activation: Activation,
}

impl CellKind {
    /// Plain text cell, always rendered as an input
    pub fn text() -> Self {
        Self {
            input_kind: InputKind::Plain,
            edit_tag: "text",
            activation: Activation::Focus,
        }
    }

    /// Masked text cell, always rendered as an input
    pub fn password() -> Self {
        Self {
            input_kind: InputKind::Masked,
            edit_tag: "text-password",
            activation: Activation::Focus,
        }
    }

    /// Static text that turns into an input on double click or focus-in
    pub fn convertible() -> Self {
        Self {
            input_kind: InputKind::Plain,
            edit_tag: "text-convertible",
            activation: Activation::DoubleClick,
        }
    }

    /// Look up a kind by its edit tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::text()),
            "text-password" | "password" => Some(Self::password()),
            "text-convertible" | "convertible" => Some(Self::convertible()),
            _ => None,
        }
    }

    /// Attributes whose change requires a full re-render of the cell
    pub fn redraw_attributes(&self) -> &'static [CellAttribute] {
        match self.activation {
            Activation::Focus => &[CellAttribute::Editable],
            Activation::DoubleClick => &[
                CellAttribute::Disabled,
                CellAttribute::Editable,
                CellAttribute::Value,
            ],
        }
    }

    pub fn is_masked(&self) -> bool {
        self.input_kind == InputKind::Masked
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::text()
    }
}
