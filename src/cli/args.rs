//! CLI argument definitions
//!
//! All Clap derive structs for `tabata` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::parse_seconds;

// ============================================================================
// Root CLI
// ============================================================================

/// Interval workout timer for the terminal.
#[derive(Parser, Debug)]
#[command(name = "tabata", author, version, about)]
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
    #[arg(long, default_value = "auto", global = true, env = "TABATA_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a workout.
    Run(RunArgs),

    /// Show the total duration and phase schedule of a workout.
    Plan(PlanArgs),

    /// Validate workout files without running them.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Workout Settings
// ============================================================================

/// Workout settings shared by `run` and `plan`.
///
/// Flags override values from the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Path to a YAML workout file.
    #[arg(short, long, env = "TABATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Work interval (e.g. 20, 20s, 1m).
    #[arg(short, long, value_parser = seconds_arg)]
    pub work: Option<u32>,

    /// Rest interval.
    #[arg(short, long, value_parser = seconds_arg)]
    pub rest: Option<u32>,

    /// Rounds per circuit.
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Number of circuits.
    #[arg(long)]
    pub circuits: Option<u32>,

    /// Rest between circuits.
    #[arg(long, value_parser = seconds_arg)]
    pub between_circuits_rest: Option<u32>,

    /// Exercises, one per round (comma-separated, cycled).
    #[arg(long, value_delimiter = ',')]
    pub exercises: Option<Vec<String>>,

    /// Lead-in countdown start value.
    #[arg(long)]
    pub lead_in: Option<u32>,
}

fn seconds_arg(s: &str) -> Result<u32, String> {
    parse_seconds(s).map_err(|e| e.to_string())
}

// ============================================================================
// Run / Plan / Validate
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Workout settings.
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// How to render the countdown.
    #[arg(long, default_value = "human", env = "TABATA_DISPLAY")]
    pub display: DisplayMode,

    /// Do not ring the terminal bell for cues.
    #[arg(long)]
    pub no_bell: bool,

    /// Write structured events (JSONL) to this file.
    #[arg(long, env = "TABATA_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Expose Prometheus metrics on this port.
    #[arg(long, env = "TABATA_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Clock period in milliseconds.
    #[arg(
        long,
        default_value_t = 1000,
        env = "TABATA_TICK_MS",
        hide = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_ms: u64,
}

/// Arguments for `plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Workout settings.
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Workout files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
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

/// Countdown rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayMode {
    /// Terminal status line.
    #[default]
    Human,
    /// One JSON frame per line on stdout.
    Json,
    /// No display.
    None,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
