//! # miniko
//!
//! Terminal front-end for the task journal: loads settings, sets up
//! logging, opens the store and runs one command.

#![deny(unsafe_code)]

mod cli;
mod journal;
mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use miniko_core::Task;
use miniko_logging::{LogFormat, LoggingConfig};
use miniko_settings::{LoggingSettings, MinikoSettings};
use miniko_store::TaskStore;

use crate::cli::{Cli, Command};
use crate::journal::{Clock, Journal, Removed, SystemClock};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    miniko_logging::init_logging(&logging_config(&settings.logging))
        .context("failed to initialize logging")?;

    let db = db_path(&cli, &settings);
    let store = TaskStore::initialize(&db)
        .with_context(|| format!("failed to open journal at {}", db.display()))?;
    let journal = Journal::new(
        store,
        SystemClock::new(settings.journal.timestamp_format.clone()),
    );

    let mut stdout = std::io::stdout().lock();
    run(&journal, cli.command(), &mut stdout)
}

fn load_settings(cli: &Cli) -> Result<MinikoSettings> {
    match &cli.settings {
        Some(path) => miniko_settings::load_settings_from_path(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => miniko_settings::load_settings().context("failed to load settings"),
    }
}

fn logging_config(settings: &LoggingSettings) -> LoggingConfig {
    LoggingConfig {
        level: settings.level.clone(),
        format: if settings.json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        },
    }
}

/// `--db` wins; otherwise the settings decide, which already folds in
/// `MINIKO_DB_PATH` and the location next to the executable.
fn db_path(cli: &Cli, settings: &MinikoSettings) -> PathBuf {
    cli.db
        .clone()
        .unwrap_or_else(|| settings.database.resolve_path())
}

fn run<C: Clock>(journal: &Journal<C>, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Add { words } => {
            let task = journal.add(&words.join(" "))?;
            writeln!(out, "Added task {}: {}", task.id, task.description)?;
        }
        Command::List { json } => {
            let listing = journal.listing()?;
            if json {
                writeln!(out, "{}", render::render_json(&listing)?)?;
            } else {
                write!(out, "{}", render::render_listing(&listing))?;
            }
        }
        Command::Done { id } => match journal.complete(id)? {
            Some(Task::Done(task)) => {
                writeln!(
                    out,
                    "Completed task {}: {} ({})",
                    task.id, task.description, task.completed_at
                )?;
            }
            Some(Task::Open(task)) => {
                writeln!(out, "Task {} is still open", task.id)?;
            }
            None => writeln!(out, "No task with id {id}")?,
        },
        Command::Rm { id } => match journal.delete(id)? {
            Some(Removed::Task(task)) => {
                writeln!(out, "Deleted task {}: {}", task.id(), task.description())?;
            }
            Some(Removed::Unreadable(id)) => writeln!(out, "Deleted unreadable task {id}")?,
            None => writeln!(out, "No task with id {id}")?,
        },
    }
    Ok(())
}
