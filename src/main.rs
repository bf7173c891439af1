use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use gridedit::cli::{CliArgs, Command};
use gridedit::config::GridEditConfig;
use gridedit::runtime::{App, ManualScheduler, Scheduler, ThreadScheduler, TranscriptEntry};
use gridedit::sheet::{CsvGrid, Scenario};

fn main() -> Result<()> {
    gridedit::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => GridEditConfig::load_from(path),
        None => GridEditConfig::load(),
    };

    match args.command {
        Command::Replay {
            csv,
            scenario,
            json,
            realtime,
            output,
        } => {
            let grid = CsvGrid::load(&csv)?;
            let scenario = Scenario::load(&scenario)?;
            let (transcript, grid) = if realtime {
                replay(grid, &scenario, &config, ThreadScheduler::new())?
            } else {
                replay(grid, &scenario, &config, ManualScheduler::new())?
            };

            print_transcript(&transcript, json)?;

            match output {
                Some(path) => grid.save(&path)?,
                None => print!("{}", grid.to_csv_string()?),
            }
        }
        Command::Config => {
            let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn replay<S: Scheduler>(
    grid: CsvGrid,
    scenario: &Scenario,
    config: &GridEditConfig,
    scheduler: S,
) -> Result<(Vec<TranscriptEntry>, CsvGrid)> {
    let mut app = App::from_scenario(grid, scenario, config, scheduler)?;
    let transcript = app.replay(&scenario.steps);
    tracing::info!(
        "Replayed {} steps in {}ms of simulated time",
        transcript.len(),
        app.elapsed_ms()
    );
    Ok((transcript, app.grid().clone()))
}

fn print_transcript(transcript: &[TranscriptEntry], json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, transcript)?;
        writeln!(out)?;
        return Ok(());
    }

    for entry in transcript {
        let editing = entry.editing.as_deref().unwrap_or("-");
        writeln!(
            out,
            "{:>6}ms  {:<32} editing={}",
            entry.at_ms, entry.step, editing
        )?;
        for cmd in &entry.commands {
            writeln!(out, "          {:?}", cmd)?;
        }
        for error in &entry.errors {
            writeln!(out, "          error: {}", error)?;
        }
    }
    Ok(())
}
