//! CSV-backed grid
//!
//! `CsvGrid` is a small host for the edit controller: the first record is
//! the header (column names) and every following record is a row keyed by
//! its zero-based index. The data lives in [`CsvGrid`] ([`GridDataSource`]);
//! which cells are on screen lives in [`SheetLayout`]
//! ([`CellAddressResolver`]). Rendered cells are identified as
//! `r{row}:{column}`.

mod parser;
pub mod scenario;

pub use parser::{detect_delimiter, parse_records, write_records, Delimiter, ParseError};
pub use scenario::{CellRef, Scenario, Step};

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};

use crate::cell::{CellAddress, CellRenderState, ElementId};
use crate::grid::{CellAddressResolver, GridDataSource};

/// A table of string cells with per-column edit permissions
#[derive(Debug, Clone, Default)]
pub struct CsvGrid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: Delimiter,
    readonly_columns: HashSet<String>,
    disabled_columns: HashSet<String>,
    max_length: Option<usize>,
}

impl CsvGrid {
    /// Build a grid from a header row and data rows
    ///
    /// Short rows are padded with empty cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width.max(row.len()), String::new());
                row
            })
            .collect();
        Self {
            headers,
            rows,
            ..Self::default()
        }
    }

    /// Parse CSV content; the first record becomes the header
    pub fn parse(content: &str, delimiter: Delimiter) -> Result<Self, ParseError> {
        let mut records = parse_records(content, delimiter)?;
        if records.is_empty() {
            return Err(ParseError {
                message: "missing header row".to_string(),
                line: None,
            });
        }
        let headers = records.remove(0);
        let mut grid = Self::new(headers, records);
        grid.delimiter = delimiter;
        Ok(grid)
    }

    /// Load a grid from disk, picking the delimiter from the extension or content
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("psv") => {
                Delimiter::from_extension(ext)
            }
            _ => detect_delimiter(&content),
        };

        let grid = Self::parse(&content, delimiter)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!(
            "Loaded {} ({} rows, {} columns, {:?})",
            path.display(),
            grid.row_count(),
            grid.headers.len(),
            delimiter
        );
        Ok(grid)
    }

    /// Serialize the grid back to CSV using its delimiter
    pub fn to_csv_string(&self) -> anyhow::Result<String> {
        let records = std::iter::once(&self.headers).chain(self.rows.iter());
        write_records(records, self.delimiter)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = self.to_csv_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn set_readonly_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readonly_columns = columns.into_iter().map(Into::into).collect();
    }

    pub fn set_disabled_columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_columns = columns.into_iter().map(Into::into).collect();
    }

    pub fn set_max_length(&mut self, max_length: Option<usize>) {
        self.max_length = max_length;
    }

    /// Toggle whether a whole column is read-only
    pub fn set_column_readonly(&mut self, column: &str, readonly: bool) {
        if readonly {
            self.readonly_columns.insert(column.to_string());
        } else {
            self.readonly_columns.remove(column);
        }
    }

    /// Toggle whether a whole column is disabled
    pub fn set_column_disabled(&mut self, column: &str, disabled: bool) {
        if disabled {
            self.disabled_columns.insert(column.to_string());
        } else {
            self.disabled_columns.remove(column);
        }
    }

    /// Overwrite a cell from outside the editor, ignoring permissions
    ///
    /// Returns false if the cell does not exist.
    pub fn overwrite(&mut self, address: &CellAddress, value: &str) -> bool {
        match self.locate(address) {
            Some((row, col)) => {
                self.rows[row][col] = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Layout showing every row of this grid
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(self.headers.clone(), self.rows.len())
    }

    /// Raw value of a cell
    pub fn value(&self, address: &CellAddress) -> Option<&str> {
        let (row, col) = self.locate(address)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    fn locate(&self, address: &CellAddress) -> Option<(usize, usize)> {
        let row = address.row_key.as_index()?;
        if row >= self.rows.len() {
            return None;
        }
        let col = self.column_index(&address.column_name)?;
        Some((row, col))
    }
}

impl GridDataSource for CsvGrid {
    fn get(&self, address: &CellAddress) -> Option<CellRenderState> {
        let value = self.value(address)?;
        Some(CellRenderState {
            is_editable: !self.readonly_columns.contains(&address.column_name),
            is_disabled: self.disabled_columns.contains(&address.column_name),
            value: value.to_string(),
            max_length: self.max_length,
        })
    }

    fn set(&mut self, address: &CellAddress, value: &str) -> anyhow::Result<()> {
        let Some((row, col)) = self.locate(address) else {
            bail!("no cell at {}", address);
        };
        if self.readonly_columns.contains(&address.column_name) {
            bail!("column {:?} is read-only", address.column_name);
        }
        self.rows[row][col] = value.to_string();
        Ok(())
    }
}

/// Which cells of a [`CsvGrid`] are currently rendered
#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    columns: Vec<String>,
    row_count: usize,
    /// Rows no longer rendered (their cells still hold data)
    hidden_rows: HashSet<usize>,
}

impl SheetLayout {
    pub fn new(columns: Vec<String>, row_count: usize) -> Self {
        Self {
            columns,
            row_count,
            hidden_rows: HashSet::new(),
        }
    }

    /// Element id under which a cell is rendered
    pub fn element_id(address: &CellAddress) -> ElementId {
        ElementId::new(format!("r{}:{}", address.row_key, address.column_name))
    }

    /// Stop rendering a row (e.g. scrolled away or filtered out)
    pub fn hide_row(&mut self, row: usize) {
        self.hidden_rows.insert(row);
    }

    pub fn show_row(&mut self, row: usize) {
        self.hidden_rows.remove(&row);
    }

    /// Addresses of all rendered cells in a column
    pub fn column_cells<'a>(&'a self, column: &'a str) -> impl Iterator<Item = CellAddress> + 'a {
        (0..self.row_count)
            .filter(move |row| !self.hidden_rows.contains(row))
            .map(move |row| CellAddress::new(row, column))
            .filter(move |address| self.is_rendered(address))
    }

    fn is_rendered(&self, address: &CellAddress) -> bool {
        let Some(row) = address.row_key.as_index() else {
            return false;
        };
        row < self.row_count
            && !self.hidden_rows.contains(&row)
            && self.columns.iter().any(|c| c == &address.column_name)
    }
}

impl CellAddressResolver for SheetLayout {
    fn resolve(&self, element: &ElementId) -> Option<CellAddress> {
        let (row, column) = element.0.strip_prefix('r')?.split_once(':')?;
        let row: usize = row.parse().ok()?;
        let address = CellAddress::new(row, column);
        self.is_rendered(&address).then_some(address)
    }

    fn element_for(&self, address: &CellAddress) -> Option<ElementId> {
        self.is_rendered(address)
            .then(|| Self::element_id(address))
    }
}
