//! Replay host
//!
//! `App` plays the part of the browser around one [`EditCellController`]:
//! it owns the grid, the renderer and a recorded cell surface, feeds
//! scenario steps in as messages and executes the commands that come back.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;

use crate::cell::{CellAddress, CellAttribute, CellKind};
use crate::commands::Cmd;
use crate::config::GridEditConfig;
use crate::grid::{GridContext, SelectionToggle};
use crate::messages::{CellMsg, InputMsg};
use crate::model::{ControllerConfig, EditCellController};
use crate::render::HtmlRenderer;
use crate::sheet::{CsvGrid, Scenario, SheetLayout, Step};

use super::scheduler::{ManualScheduler, Scheduler};

/// The input that currently has keyboard focus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusedInput {
    pub element: String,
    pub caret: usize,
    pub selection: Range<usize>,
}

/// Value and disabled flag pushed into an existing input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedInput {
    pub value: String,
    pub disabled: bool,
}

/// What the host has drawn so far, keyed by element id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Surface {
    pub cells: BTreeMap<String, String>,
    pub inputs: BTreeMap<String, SyncedInput>,
    pub focused: Option<FocusedInput>,
    pub clipboard_focused: bool,
}

/// Outcome of one replayed step
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub at_ms: u64,
    pub step: String,
    pub commands: Vec<Cmd>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub editing: Option<String>,
}

#[derive(Default)]
struct StepOutput {
    commands: Vec<Cmd>,
    errors: Vec<String>,
}

/// Grid host driving one edit controller
pub struct App<S: Scheduler = ManualScheduler> {
    grid: CsvGrid,
    layout: SheetLayout,
    renderer: HtmlRenderer,
    selection: SelectionToggle,
    controller: EditCellController,
    scheduler: S,
    surface: Surface,
    elapsed_ms: u64,
}

impl<S: Scheduler> App<S> {
    pub fn new(grid: CsvGrid, kind: CellKind, config: &GridEditConfig, scheduler: S) -> Self {
        let layout = grid.layout();
        Self {
            grid,
            layout,
            renderer: HtmlRenderer::new(config.mask_char),
            selection: SelectionToggle::default(),
            controller: EditCellController::new(kind, ControllerConfig::from(config)),
            scheduler,
            surface: Surface::default(),
            elapsed_ms: 0,
        }
    }

    /// Build an app with the permissions and cell kind of a scenario
    pub fn from_scenario(
        mut grid: CsvGrid,
        scenario: &Scenario,
        config: &GridEditConfig,
        scheduler: S,
    ) -> anyhow::Result<Self> {
        let kind = scenario.cell_kind()?;
        grid.set_readonly_columns(scenario.readonly_columns.iter().cloned());
        grid.set_disabled_columns(scenario.disabled_columns.iter().cloned());
        grid.set_max_length(scenario.max_length);
        Ok(Self::new(grid, kind, config, scheduler))
    }

    pub fn grid(&self) -> &CsvGrid {
        &self.grid
    }

    pub fn controller(&self) -> &EditCellController {
        &self.controller
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn selection(&self) -> &SelectionToggle {
        &self.selection
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Run every step in order
    pub fn replay(&mut self, steps: &[Step]) -> Vec<TranscriptEntry> {
        steps.iter().map(|step| self.run_step(step)).collect()
    }

    /// Translate one step into messages and apply the resulting commands
    ///
    /// Like a browser, pointer or focus moving to another cell blurs the
    /// input being edited first.
    pub fn run_step(&mut self, step: &Step) -> TranscriptEntry {
        let mut out = StepOutput::default();

        match step {
            Step::Click(cell) | Step::FocusIn(cell) => {
                let address = cell.address();
                if self.editing_other_than(&address) {
                    self.send(&mut out, CellMsg::Blur);
                }
                let target = SheetLayout::element_id(&address);
                let msg = match step {
                    Step::Click(_) => CellMsg::Click { target },
                    _ => CellMsg::FocusIn { target },
                };
                self.send(&mut out, msg);
            }
            Step::Wait(ms) => {
                let msgs = self.scheduler.advance(*ms);
                self.elapsed_ms += ms;
                for msg in msgs {
                    self.send(&mut out, msg);
                }
            }
            Step::Type(text) => {
                for ch in text.chars() {
                    self.send(&mut out, CellMsg::Input(InputMsg::InsertChar(ch)));
                }
            }
            Step::Paste(text) => {
                self.send(&mut out, CellMsg::Input(InputMsg::InsertText(text.clone())))
            }
            Step::Key(key) => self.send(&mut out, CellMsg::KeyDown(*key)),
            Step::SelectAll => self.send(&mut out, CellMsg::Input(InputMsg::SelectAll)),
            Step::Blur => self.send(&mut out, CellMsg::Blur),
            Step::FocusOut => self.send(&mut out, CellMsg::FocusOut),
            Step::UpdateCell { row, column, value } => {
                let address = CellAddress::new(*row, column.as_str());
                if self.grid.overwrite(&address, value) {
                    let msg = CellMsg::ModelChanged {
                        address,
                        changed: vec![CellAttribute::Value],
                    };
                    self.send(&mut out, msg);
                } else {
                    out.errors.push(format!("no cell at {}", address));
                }
            }
            Step::SetReadonly(flag) => {
                self.grid.set_column_readonly(&flag.column, flag.value);
                for msg in self.column_changed(&flag.column, CellAttribute::Editable) {
                    self.send(&mut out, msg);
                }
            }
            Step::SetDisabled(flag) => {
                self.grid.set_column_disabled(&flag.column, flag.value);
                for msg in self.column_changed(&flag.column, CellAttribute::Disabled) {
                    self.send(&mut out, msg);
                }
            }
            Step::HideRow(row) => self.layout.hide_row(*row),
        }

        TranscriptEntry {
            at_ms: self.elapsed_ms,
            step: describe_step(step),
            commands: out.commands,
            errors: out.errors,
            editing: self.controller.editing_address().map(|a| a.to_string()),
        }
    }

    fn send(&mut self, out: &mut StepOutput, msg: CellMsg) {
        let (cmds, error) = self.dispatch(msg);
        out.commands.extend(cmds);
        out.errors.extend(error);
    }

    /// Send one message to the controller and execute what it returns
    ///
    /// Returns the executed commands and the error message of a failed commit.
    pub fn dispatch(&mut self, msg: CellMsg) -> (Vec<Cmd>, Option<String>) {
        let result = {
            let mut ctx = GridContext::new(
                &mut self.grid,
                &self.layout,
                &mut self.renderer,
                &mut self.selection,
            );
            self.controller.update(&mut ctx, msg)
        };

        let (cmd, error) = match result {
            Ok(cmd) => (cmd, None),
            Err(mut err) => {
                tracing::warn!("{:#}", err);
                let followup = err.take_followup();
                (followup, Some(err.to_string()))
            }
        };

        let executed = match cmd {
            Some(cmd) => {
                let leaves = cmd.clone().flatten();
                self.process_cmd(cmd);
                leaves
            }
            None => Vec::new(),
        };
        (executed, error)
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::ArmClickTimer {
                generation,
                delay_ms,
            } => self.scheduler.arm(generation, delay_ms),
            Cmd::CancelClickTimer { generation } => self.scheduler.cancel(generation),
            Cmd::ReplaceCell {
                address, markup, ..
            } => {
                let element = SheetLayout::element_id(&address).0;
                self.surface.inputs.remove(&element);
                self.surface.cells.insert(element, markup);
            }
            Cmd::FocusInput {
                address,
                caret,
                selection,
            } => {
                self.surface.clipboard_focused = false;
                self.surface.focused = Some(FocusedInput {
                    element: SheetLayout::element_id(&address).0,
                    caret,
                    selection,
                });
            }
            Cmd::SyncInput {
                address,
                value,
                disabled,
            } => {
                let element = SheetLayout::element_id(&address).0;
                self.surface
                    .inputs
                    .insert(element, SyncedInput { value, disabled });
            }
            Cmd::FocusClipboard => {
                self.surface.focused = None;
                self.surface.clipboard_focused = true;
            }
        }
    }

    fn editing_other_than(&self, address: &CellAddress) -> bool {
        self.controller
            .editing_address()
            .is_some_and(|editing| editing != address)
    }

    fn column_changed(&self, column: &str, attribute: CellAttribute) -> Vec<CellMsg> {
        self.layout
            .column_cells(column)
            .map(|address| CellMsg::ModelChanged {
                address,
                changed: vec![attribute],
            })
            .collect()
    }
}

fn describe_step(step: &Step) -> String {
    match step {
        Step::Click(cell) => format!("click {}", cell.address()),
        Step::Wait(ms) => format!("wait {}ms", ms),
        Step::Type(text) => format!("type {:?}", text),
        Step::Paste(text) => format!("paste {:?}", text),
        Step::Key(key) => format!("key {:?}", key),
        Step::SelectAll => "select-all".to_string(),
        Step::Blur => "blur".to_string(),
        Step::FocusIn(cell) => format!("focus-in {}", cell.address()),
        Step::FocusOut => "focus-out".to_string(),
        Step::UpdateCell { row, column, value } => {
            format!("update ({}, {}) = {:?}", row, column, value)
        }
        Step::SetReadonly(flag) => format!("readonly {} = {}", flag.column, flag.value),
        Step::SetDisabled(flag) => format!("disabled {} = {}", flag.column, flag.value),
        Step::HideRow(row) => format!("hide row {}", row),
    }
}
