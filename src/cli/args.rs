//! Command line argument parsing for the bulkload CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_HOST};
use crate::transform::extension::ExtensionKind;

/// bulkload - Bulk import delimited files into a search engine
#[derive(Parser, Debug, Clone)]
#[command(name = "bulkload")]
#[command(about = "Bulk import a delimited file (CSV, TSV, ...) into a search engine index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BulkloadArgs {
    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Minimize console output (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BulkloadArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import a delimited file into an index
    ///
    /// Example: bulkload import --index-name myindex --doc-type mydoc --import-file test.csv
    Import(ImportArgs),

    /// Print the normalized field names of a delimited file
    Headers(HeadersArgs),
}

/// Arguments for importing a file
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// The search engine host
    #[arg(long, env = "BULKLOAD_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Index name to load data into
    #[arg(long)]
    pub index_name: String,

    /// The document type (like user_records)
    #[arg(long)]
    pub doc_type: String,

    /// File to import (or '-' for stdin)
    #[arg(long, value_name = "FILE")]
    pub import_file: PathBuf,

    /// JSON mapping file for the document type
    #[arg(long, value_name = "FILE")]
    pub mapping_file: Option<PathBuf>,

    /// JSON settings file for the index
    #[arg(long, value_name = "FILE")]
    pub settings_file: Option<PathBuf>,

    /// Position of the column to use as document id
    #[arg(long, value_name = "N")]
    pub id_field_idx: Option<usize>,

    /// Delete the index first if it already exists
    #[arg(long)]
    pub delete_index: bool,

    /// Field delimiter (a single character, or "tab")
    #[arg(short, long, default_value = ",")]
    pub delimiter: String,

    /// Trim whitespace around values
    #[arg(long)]
    pub trim: bool,

    /// Operations per bulk request
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Keep H:M[:S] values as text instead of converting them to minutes
    #[arg(long)]
    pub no_duration_heuristic: bool,

    /// Row extensions to run (default: selected by document type)
    #[arg(long = "extension", value_name = "NAME")]
    pub extensions: Vec<ExtensionKind>,

    /// Run against an in-memory index instead of the host
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for printing headers
#[derive(Parser, Debug, Clone)]
pub struct HeadersArgs {
    /// The file to get headers from
    #[arg(long, value_name = "FILE")]
    pub filename: PathBuf,

    /// Field delimiter (a single character, or "tab")
    #[arg(short, long, default_value = ",")]
    pub delimiter: String,

    /// Extra field name to insert into the list
    #[arg(long, value_name = "NAME")]
    pub insert_field: Option<String>,

    /// Position for the inserted field (default: append)
    #[arg(long, value_name = "N", requires = "insert_field")]
    pub position: Option<usize>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
