//! Command-line interface for triagem.
//!
//! This module provides the CLI structure and command definitions for the
//! `triagem` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AssessCommand, ConditionArg, ConfigCommand, DurationArg, ExitArg, FinishCommand,
    HistoryCommand, OpenCommand, OutputFormat, SexArg, ViewCommand,
};

/// triagem - Preliminary symptom assessment with local history
///
/// Records a symptom questionnaire, shows a preliminary assessment and keeps
/// a history of past consultations on this machine.
#[derive(Debug, Parser)]
#[command(name = "triagem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the questionnaire, submit it and show the results
    Assess(AssessCommand),

    /// Show the results of the pending assessment
    Results(ViewCommand),

    /// Leave the results view, saving the assessment to history
    Finish(FinishCommand),

    /// Show the consultation history
    History(HistoryCommand),

    /// Navigate to a route (/, /resultado, /historico)
    Open(OpenCommand),

    /// Show what is stored locally
    Status(ViewCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
