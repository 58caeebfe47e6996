//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// casegen - generate structured test cases from a requirement
#[derive(Parser)]
#[command(name = "casegen")]
#[command(about = "Generate positive, negative, and edge test cases from a requirement using an LLM provider")]
#[command(long_about = r#"
casegen turns a natural-language requirement into structured test-case
records: batched category prompts, layered parsing of the provider's
unreliable output, bounded retries, and follow-up rounds for whatever the
quota is still missing.

EXAMPLES:
  # Generate with default quota (3 positive, 2 negative, 1 edge) from stdin
  echo "Users log in with email and password" | casegen generate

  # Generate from a requirement file with an explicit quota
  casegen generate --input login.txt --positive 20 --negative 20 --edge 5

  # Print records as JSON instead of a table
  casegen generate --input login.txt --json

  # Check provider configuration and credentials
  casegen doctor

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .casegen/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate test cases for a requirement
    ///
    /// Reads the requirement from --input or stdin, drives the generation
    /// orchestrator against the requested quota, and prints the resulting
    /// records. A partial result is still printed when the provider cannot
    /// satisfy the full quota.
    Generate {
        /// Requirement text file (reads stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Requested count of positive test cases
        #[arg(long)]
        positive: Option<u32>,

        /// Requested count of negative test cases
        #[arg(long)]
        negative: Option<u32>,

        /// Requested count of edge test cases
        #[arg(long)]
        edge: Option<u32>,

        /// Write records as JSON to this file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Directory for the default timestamped output file
        #[arg(long, default_value = "outputs")]
        output_dir: PathBuf,

        /// Print records as JSON to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Skip writing an output file
        #[arg(long)]
        no_output_file: bool,
    },

    /// Check environment and provider configuration
    ///
    /// Verifies that a config file is discoverable, a provider is selected,
    /// and its API key environment variable is set, without making any
    /// provider calls.
    Doctor {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}
