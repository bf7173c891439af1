//! Command-line argument parsing
//!
//! Supports:
//! - Replaying a scenario of clicks, keys and timer waits against a CSV file
//! - Printing the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Edit-mode state machine for text grid cells
#[derive(Parser, Debug)]
#[command(
    name = "gridedit",
    version,
    about = "Replay cell editing sessions against a CSV grid"
)]
pub struct CliArgs {
    /// Config file to use instead of ~/.config/gridedit/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replay a YAML scenario against a CSV file
    Replay {
        /// CSV (or TSV/PSV) file holding the grid
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// YAML scenario with the cell kind and steps
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,

        /// Use wall-clock timers instead of a virtual clock
        #[arg(long)]
        realtime: bool,

        /// Write the edited grid here instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as YAML
    Config,
}
