//! CLI command definitions using clap

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flowwright - design Coze/Dify-style workflows from a plain-language goal
#[derive(Parser)]
#[command(name = "flowwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, table)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<OutputFormat>,

    /// Configuration file path
    #[arg(short = 'c', long, global = true, env = "FLOWWRIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a workflow for a goal and print it
    Generate {
        /// What the bot or workflow should achieve
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },

    /// Generate a workflow, then ask questions about it interactively
    Chat {
        /// Goal to start from (prompted when omitted)
        goal: Vec<String>,
    },

    /// Copy a step's code snippet from a saved workflow to the clipboard
    Copy {
        /// Workflow saved with `generate --output json`
        file: PathBuf,

        /// Step number, starting at 1
        step: usize,
    },
}
