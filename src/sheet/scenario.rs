//! Replay scenarios
//!
//! A scenario is a YAML file describing a cell kind, the column permissions
//! of the grid and a list of user steps:
//!
//! ```yaml
//! kind: text-convertible
//! readonly_columns: [id]
//! steps:
//!   - click: { row: 0, column: name }
//!   - wait: 100
//!   - click: { row: 0, column: name }
//!   - type: "Bob"
//!   - key: enter
//! ```

use std::path::Path;

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::cell::{CellAddress, CellKind};
use crate::messages::EditKey;

/// Reference to a cell in a scenario step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: String,
}

impl CellRef {
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.column.as_str())
    }
}

/// Toggle of a column permission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnFlag {
    pub column: String,
    pub value: bool,
}

/// One user or host action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Click(CellRef),
    /// Advance the clock by this many milliseconds
    Wait(u64),
    /// Type text into the focused input, one character at a time
    Type(String),
    Paste(String),
    Key(EditKey),
    SelectAll,
    Blur,
    FocusIn(CellRef),
    FocusOut,
    /// Overwrite a cell value from outside the editor
    UpdateCell {
        row: usize,
        column: String,
        value: String,
    },
    SetReadonly(ColumnFlag),
    SetDisabled(ColumnFlag),
    /// Stop rendering a row
    HideRow(usize),
}

/// A parsed scenario file
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub readonly_columns: Vec<String>,
    #[serde(default)]
    pub disabled_columns: Vec<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Steps use the `- step: argument` map form
    #[serde(
        default,
        deserialize_with = "serde_yaml::with::singleton_map_recursive::deserialize"
    )]
    pub steps: Vec<Step>,
}

fn default_kind() -> String {
    CellKind::text().edit_tag.to_string()
}

impl Scenario {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_yaml::from_str(content)?;
        scenario.cell_kind()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn cell_kind(&self) -> anyhow::Result<CellKind> {
        CellKind::from_tag(&self.kind).ok_or_else(|| anyhow!("unknown cell kind {:?}", self.kind))
    }
}
