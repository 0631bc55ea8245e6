//! CLI argument definitions
//!
//! All Clap derive structs for `xercise` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Interval workout timer.
#[derive(Parser, Debug)]
#[command(name = "xercise", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "XERCISE_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true, env = "XERCISE_LOG_FORMAT")]
    pub log_format: LogFormatArg,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a workout in the terminal.
    Run(RunArgs),

    /// Validate plan files without running them.
    Validate(ValidateArgs),

    /// Print every phase of a plan with its start offset.
    Outline(OutlineArgs),
}

// ============================================================================
// Subcommand Arguments
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a YAML or JSON workout plan.
    #[arg(short, long, env = "XERCISE_PLAN")]
    pub plan: PathBuf,

    /// Write workout events as JSON lines to this file.
    #[arg(long, env = "XERCISE_EVENTS")]
    pub events: Option<PathBuf>,

    /// Record completion and streak in this JSON history file.
    #[arg(long, env = "XERCISE_HISTORY")]
    pub history: Option<PathBuf>,

    /// Start with announcements muted.
    #[arg(long)]
    pub mute: bool,

    /// Serve Prometheus metrics on this port.
    #[arg(long, env = "XERCISE_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Plan files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `outline`.
#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Plan file to outline.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}
