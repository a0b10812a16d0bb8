use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miniko_core::TaskId;

/// A simple daily tasks journal.
#[derive(Parser, Debug)]
#[command(name = "miniko", version, about = "A simple daily tasks journal")]
pub struct Cli {
    /// Path to the journal database (overrides settings).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Settings file to read instead of `~/.miniko/settings.json`.
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Record a new task.
    Add {
        /// Task text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Show open and finished tasks.
    #[command(alias = "ls")]
    List {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as done.
    Done { id: TaskId },
    /// Delete a task, open or done.
    #[command(alias = "delete")]
    Rm { id: TaskId },
}

impl Cli {
    /// The requested command; a bare `miniko` lists tasks.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::List { json: false })
    }
}
