//! CLI commands and argument parsing

use crate::decode::DecoderFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Schema-reconciling transactional batch loader
#[derive(Parser, Debug)]
#[command(name = "batchload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load job definition file (YAML)
    #[arg(short, long, global = true)]
    pub job: Option<PathBuf>,

    /// Template configuration file (JSON), read by `{{ config.* }}`
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load records into the destination table in one transaction
    Load {
        /// Input file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Input format (jsonl or json)
        #[arg(long, default_value = "jsonl")]
        input_format: DecoderFormat,

        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Show the destination table's column catalog
    Schema {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Test connection to the destination
    Check {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// List destination tables
    Tables {
        /// Inline config JSON
        #[arg(long)]
        config_json: Option<String>,
    },

    /// Validate the job definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
