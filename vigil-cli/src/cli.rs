//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Vigil -- network intrusion detection daemon control CLI.
///
/// Use `vigil <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
pub struct Cli {
    /// Path to the vigil.toml configuration file.
    #[arg(short, long, default_value = "vigil.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the vigil daemon.
    Start(StartArgs),

    /// Check status of the detector and collaborator modules.
    Status(StatusArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- start ----

/// Start the vigil daemon.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Run as a background daemon (default: foreground).
    #[arg(short = 'd', long)]
    pub daemonize: bool,

    /// Override PID file location (daemon mode only).
    #[arg(long)]
    pub pid_file: Option<PathBuf>,
}

// ---- status ----

/// Display module health and uptime.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show detailed per-module configuration.
    #[arg(short, long)]
    pub verbose: bool,
}

// ---- config ----

/// Manage vigil configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, detector, collaborators, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}
