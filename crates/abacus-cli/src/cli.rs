//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Abacus: natural-language questions over tabular data
#[derive(Parser)]
#[command(name = "abacus")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask one question about a data file and print the answer
    Ask {
        /// Path to a CSV/TSV file, or a directory of them (one sheet each)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// The question to answer
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Reasoning provider to drive the loop
        #[arg(long, default_value = "anthropic")]
        provider: ProviderChoice,

        /// Print the full call/result transcript after the answer
        #[arg(long)]
        transcript: bool,

        /// Override the tool-call step ceiling
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// List the sheets of a data file with schemas and previews
    Sheets {
        /// Path to a CSV/TSV file or directory
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print per-sheet column types instead of row previews
        #[arg(long)]
        schema: bool,
    },

    /// Interactive question loop over one data file
    Chat {
        /// Path to a CSV/TSV file or directory
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reasoning provider to drive the loop
        #[arg(long, default_value = "anthropic")]
        provider: ProviderChoice,

        /// Override the tool-call step ceiling
        #[arg(long)]
        max_steps: Option<usize>,
    },
}

/// Which reasoning provider drives the agent loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderChoice {
    /// Anthropic Claude (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Offline scripted provider (smoke runs only)
    Scripted,
}
