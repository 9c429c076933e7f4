//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Smart-home device watcher
///
/// Checks reachability, link quality and battery state of smart-home
/// devices, publishes the results and sends alerts.
#[derive(Parser, Debug)]
#[command(name = "devwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DEVWATCH_CONFIG")]
    pub config: Option<String>,

    /// Path to the state snapshot file
    #[arg(long, global = true, env = "DEVWATCH_STORE")]
    pub store: Option<String>,

    /// Namespace of the published states
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Dry run mode - evaluate everything but write and send nothing
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one check pass
    Run(RunArgs),

    /// List adapter profiles
    Profiles(ProfilesArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Evaluate at this instant instead of now (RFC 3339)
    #[arg(long)]
    pub at: Option<String>,

    /// Also print the device lists
    #[arg(short, long)]
    pub lists: bool,
}

/// Arguments for the profiles command
#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    /// Include disabled profiles
    #[arg(short, long)]
    pub all: bool,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
