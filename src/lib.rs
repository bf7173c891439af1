//! gridedit - edit-mode controller for text grid cells
//!
//! This crate implements the edit-mode state machine shared by the text,
//! password and convertible cell types of a spreadsheet-like grid, using the
//! Elm Architecture: messages go into [`update::update`], which mutates the
//! controller and returns [`Cmd`]s for the host to execute.

pub mod cell;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod grid;
pub mod messages;
pub mod model;
pub mod render;
pub mod runtime;
pub mod sheet;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use cell::{CellAddress, CellKind, CellRenderState, ElementId, RowKey};
pub use commands::Cmd;
pub use config::GridEditConfig;
pub use grid::{CellAddressResolver, FocusCoordinator, GridContext, GridDataSource, Renderer};
pub use messages::{CellMsg, EditKey, InputMsg};
pub use model::{CommitError, EditCellController};
pub use render::HtmlRenderer;
