//! Command-line argument definitions for the DocInherit CLI.
//!
//! Every option that also exists in the configuration file overrides the
//! file's value when given.

use clap::Parser;

/// Command-line arguments for the DocInherit tool
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory searched for documentation files
    #[arg(help = "Directory searched for documentation files [default: current directory]")]
    pub base_path: Option<String>,

    /// File-name wildcard selecting documentation files (repeatable)
    #[arg(short = 'f', long = "file-pattern", value_name = "PATTERN")]
    pub file_patterns: Vec<String>,

    /// Reference documentation file searched but never written (repeatable)
    #[arg(short = 'r', long = "reference", value_name = "FILE")]
    pub reference_docs: Vec<String>,

    /// Type-name wildcard whose documentation is ignored (repeatable)
    #[arg(short = 'x', long = "exclude-type", value_name = "PATTERN")]
    pub exclude_types: Vec<String>,

    /// Replace the input files instead of writing `.new.xml` files
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
