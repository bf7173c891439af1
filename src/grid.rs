//! Grid collaborators
//!
//! The controller never owns grid data, layout or focus. It talks to the
//! surrounding grid through these traits, bundled per call in a
//! [`GridContext`].

use crate::cell::{Activation, CellAddress, CellRenderState, ElementId, InputKind};

/// Read and write access to cell values and state
pub trait GridDataSource {
    /// Current state of a cell, or None if the grid does not track it
    fn get(&self, address: &CellAddress) -> Option<CellRenderState>;

    /// Write a committed value
    fn set(&mut self, address: &CellAddress, value: &str) -> anyhow::Result<()>;
}

/// Maps rendered elements to cell addresses and back
pub trait CellAddressResolver {
    fn resolve(&self, element: &ElementId) -> Option<CellAddress>;

    /// Element currently rendering the cell, or None if the cell is gone
    fn element_for(&self, address: &CellAddress) -> Option<ElementId>;
}

/// Global focus/selection hooks toggled around an edit session
pub trait FocusCoordinator {
    fn suspend_global_selection(&mut self);
    fn resume_global_selection(&mut self);
}

/// Which markup the renderer should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Display,
    Edit,
}

/// Everything a renderer needs to produce the markup of one cell
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub address: &'a CellAddress,
    pub mode: RenderMode,
    pub state: &'a CellRenderState,
    pub input_kind: InputKind,
    pub edit_tag: &'static str,
    pub activation: Activation,
}

/// Produces cell markup
pub trait Renderer {
    fn render(&mut self, request: RenderRequest<'_>) -> String;
}

/// Collaborators handed to the controller for one update
pub struct GridContext<'a> {
    pub data: &'a mut dyn GridDataSource,
    pub resolver: &'a dyn CellAddressResolver,
    pub renderer: &'a mut dyn Renderer,
    pub focus: &'a mut dyn FocusCoordinator,
}

impl<'a> GridContext<'a> {
    pub fn new(
        data: &'a mut dyn GridDataSource,
        resolver: &'a dyn CellAddressResolver,
        renderer: &'a mut dyn Renderer,
        focus: &'a mut dyn FocusCoordinator,
    ) -> Self {
        Self {
            data,
            resolver,
            renderer,
            focus,
        }
    }
}

/// Focus coordinator that only counts calls
///
/// Useful for hosts without a global selection layer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionToggle {
    pub suspended: bool,
    pub suspend_calls: usize,
    pub resume_calls: usize,
}

impl FocusCoordinator for SelectionToggle {
    fn suspend_global_selection(&mut self) {
        self.suspended = true;
        self.suspend_calls += 1;
    }

    fn resume_global_selection(&mut self) {
        self.suspended = false;
        self.resume_calls += 1;
    }
}
