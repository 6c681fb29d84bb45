//! CLI module - Command-line interface for Homestead
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::{cmd_init, cmd_list_agents, cmd_validate};

/// Homestead - Real-estate listing backend
#[derive(Parser)]
#[command(name = "homestead")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API until Ctrl+C
    #[command(alias = "daemon", alias = "-d", alias = "--daemon")]
    Serve,

    /// Write a default config.toml if none exists
    Init,

    /// Validate a JSON insert payload and print its canonical form
    #[command(alias = "v")]
    Validate {
        /// Entity kind: user, property, appointment or agent
        kind: String,

        /// Path to a JSON file holding one payload object
        file: PathBuf,
    },

    /// List agent profiles, highest rated first
    Agents,
}
