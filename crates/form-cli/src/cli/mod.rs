use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `formctl` binary.
#[derive(Debug, Parser)]
#[command(name = "formctl", version, about = "formwork - form schema tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the JSON Schema of the UI schema contract consumed by renderers.
    DescriptorSchema,
    /// Validate a JSON instance against an exported composite rule.
    Check(CheckArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Composite rule file (JSON)
    #[arg(long)]
    pub schema: PathBuf,

    /// Instance file (JSON)
    #[arg(long)]
    pub instance: PathBuf,
}
