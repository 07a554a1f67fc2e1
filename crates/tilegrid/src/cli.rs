//! Command-line interface definitions for tilegrid.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `tilegrid` binary.
#[derive(Parser, Debug)]
#[command(
    name = "tilegrid",
    about = "Drive the tilegrid layout engine from the command line",
    version
)]
pub struct Cli {
    /// Logging controls shared across tilegrid binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a gesture script against a layout, printing every save as a JSON line.
    Replay(ReplayArgs),
    /// Check a layout for overlapping or out-of-grid widgets.
    Check(CheckArgs),
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Initial layout as JSON: a record array or `{ "layout": [...] }`.
    #[arg(long, value_name = "PATH")]
    pub layout: PathBuf,

    /// Gesture script in RON syntax, e.g. `[edit(true), down(widget: 1, kind: drag, x: 0.0, y: 0.0)]`.
    #[arg(long, value_name = "PATH")]
    pub script: PathBuf,

    /// Optional path to a tilegrid configuration file (RON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Container width in pixels.
    #[arg(long, default_value_t = 1000.0, value_name = "PX")]
    pub width: f64,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Layout as JSON: a record array or `{ "layout": [...] }`.
    #[arg(long, value_name = "PATH")]
    pub layout: PathBuf,

    /// Optional path to a tilegrid configuration file (RON), for the column count.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
