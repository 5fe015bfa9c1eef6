//! CLI command definitions.

pub mod sushi;

use clap::{Parser, ValueEnum};

use crate::client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};

/// CLI client for the sushi menu API.
#[derive(Debug, Parser)]
#[command(name = "sushisync-client")]
#[command(about = "CLI client for the sushi menu API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "SUSHI_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API version path segment.
    #[arg(long, env = "SUSHI_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Serve from seeded in-memory data instead of the server.
    #[arg(long)]
    pub demo: bool,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: sushi::Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}
