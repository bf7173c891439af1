//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use gridedit::cell::{CellAddress, CellRenderState, ElementId};
use gridedit::commands::Cmd;
use gridedit::grid::{
    CellAddressResolver, GridContext, GridDataSource, RenderMode, RenderRequest, Renderer,
    SelectionToggle,
};
use gridedit::messages::{CellMsg, EditKey, InputMsg};
use gridedit::model::{EditCellController, UpdateResult};
use gridedit::render::HtmlRenderer;

/// In-memory data source that records every write
#[derive(Debug, Default)]
pub struct FakeData {
    pub cells: HashMap<CellAddress, CellRenderState>,
    pub writes: Vec<(CellAddress, String)>,
    /// Make every `set` fail
    pub fail_writes: bool,
}

impl GridDataSource for FakeData {
    fn get(&self, address: &CellAddress) -> Option<CellRenderState> {
        self.cells.get(address).cloned()
    }

    fn set(&mut self, address: &CellAddress, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("write rejected");
        }
        let Some(cell) = self.cells.get_mut(address) else {
            anyhow::bail!("no such cell");
        };
        cell.value = value.to_string();
        self.writes.push((address.clone(), value.to_string()));
        Ok(())
    }
}

/// Resolver for elements named `{row}/{column}`
#[derive(Debug, Default)]
pub struct FakeLayout {
    pub rendered: HashSet<CellAddress>,
}

impl CellAddressResolver for FakeLayout {
    fn resolve(&self, element: &ElementId) -> Option<CellAddress> {
        let (row, column) = element.0.split_once('/')?;
        let address = CellAddress::new(row, column);
        self.rendered.contains(&address).then_some(address)
    }

    fn element_for(&self, address: &CellAddress) -> Option<ElementId> {
        self.rendered.contains(address).then(|| element(address))
    }
}

/// Renderer that records which cells were drawn in which mode
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub html: HtmlRenderer,
    pub renders: Vec<(CellAddress, RenderMode)>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, request: RenderRequest<'_>) -> String {
        self.renders.push((request.address.clone(), request.mode));
        self.html.render(request)
    }
}

/// A complete set of collaborators for one controller
#[derive(Debug, Default)]
pub struct FakeGrid {
    pub data: FakeData,
    pub layout: FakeLayout,
    pub renderer: RecordingRenderer,
    pub focus: SelectionToggle,
}

impl FakeGrid {
    /// Grid with editable cells `(row, column, value)`
    pub fn with_cells(cells: &[(usize, &str, &str)]) -> Self {
        let mut grid = Self::default();
        for &(row, column, value) in cells {
            grid.insert(CellAddress::new(row, column), CellRenderState::editable(value));
        }
        grid
    }

    pub fn insert(&mut self, address: CellAddress, state: CellRenderState) {
        self.layout.rendered.insert(address.clone());
        self.data.cells.insert(address, state);
    }

    pub fn state_mut(&mut self, row: usize, column: &str) -> &mut CellRenderState {
        self.data
            .cells
            .get_mut(&CellAddress::new(row, column))
            .expect("cell exists")
    }

    pub fn value(&self, row: usize, column: &str) -> String {
        self.data.cells[&CellAddress::new(row, column)].value.clone()
    }

    /// Stop rendering a cell (row scrolled away)
    pub fn unrender(&mut self, row: usize, column: &str) {
        self.layout.rendered.remove(&CellAddress::new(row, column));
    }

    pub fn ctx(&mut self) -> GridContext<'_> {
        GridContext::new(
            &mut self.data,
            &self.layout,
            &mut self.renderer,
            &mut self.focus,
        )
    }

    pub fn send(&mut self, controller: &mut EditCellController, msg: CellMsg) -> UpdateResult {
        let mut ctx = self.ctx();
        controller.update(&mut ctx, msg)
    }

    /// Send a message that is expected to succeed and flatten its commands
    pub fn send_ok(&mut self, controller: &mut EditCellController, msg: CellMsg) -> Vec<Cmd> {
        self.send(controller, msg)
            .expect("update succeeds")
            .map(Cmd::flatten)
            .unwrap_or_default()
    }

    pub fn click(
        &mut self,
        controller: &mut EditCellController,
        row: usize,
        column: &str,
    ) -> Vec<Cmd> {
        self.send_ok(
            controller,
            CellMsg::Click {
                target: element(&CellAddress::new(row, column)),
            },
        )
    }

    pub fn double_click(
        &mut self,
        controller: &mut EditCellController,
        row: usize,
        column: &str,
    ) -> Vec<Cmd> {
        let mut cmds = self.click(controller, row, column);
        cmds.extend(self.click(controller, row, column));
        cmds
    }

    pub fn focus_in(
        &mut self,
        controller: &mut EditCellController,
        row: usize,
        column: &str,
    ) -> Vec<Cmd> {
        self.send_ok(
            controller,
            CellMsg::FocusIn {
                target: element(&CellAddress::new(row, column)),
            },
        )
    }

    pub fn key(&mut self, controller: &mut EditCellController, key: EditKey) -> Vec<Cmd> {
        self.send_ok(controller, CellMsg::KeyDown(key))
    }

    /// Replace the input value as if the user retyped it
    pub fn type_value(&mut self, controller: &mut EditCellController, value: &str) {
        self.send_ok(controller, CellMsg::Input(InputMsg::SelectAll));
        self.send_ok(controller, CellMsg::Input(InputMsg::InsertText(value.to_string())));
    }

    pub fn blur(&mut self, controller: &mut EditCellController) -> Vec<Cmd> {
        self.send_ok(controller, CellMsg::Blur)
    }
}

pub fn element(address: &CellAddress) -> ElementId {
    ElementId::new(format!("{}/{}", address.row_key, address.column_name))
}

pub fn addr(row: usize, column: &str) -> CellAddress {
    CellAddress::new(row, column)
}

/// Generation of the first `ArmClickTimer` in a command list
pub fn armed_generation(cmds: &[Cmd]) -> Option<u64> {
    cmds.iter().find_map(|cmd| match cmd {
        Cmd::ArmClickTimer { generation, .. } => Some(*generation),
        _ => None,
    })
}

pub fn replace_cells(cmds: &[Cmd]) -> Vec<(CellAddress, RenderMode)> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            Cmd::ReplaceCell { address, mode, .. } => Some((address.clone(), *mode)),
            _ => None,
        })
        .collect()
}
