//! CLI argument definitions for the medbase pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "medbase",
    version,
    about = "Reconcile registry and pricing extracts into a normalized product database",
    long_about = "Reconcile a regulatory registry extract with a pricing/presentation\n\
                  extract on the canonical registration key, parse dose and dosage form\n\
                  out of free presentation text, and decompose the result into a\n\
                  normalized SQLite schema (companies, ingredients, products, links)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full extraction-merge-normalization pipeline.
    Run(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the regulatory registry extract.
    #[arg(value_name = "REGISTRY_FILE")]
    pub registry: PathBuf,

    /// Path to the pricing/presentation extract.
    #[arg(value_name = "PRICING_FILE")]
    pub pricing: PathBuf,

    /// SQLite database to populate (created when absent).
    #[arg(long = "db", value_name = "PATH", default_value = "medbase.db")]
    pub db: PathBuf,

    /// Field delimiter of the registry extract.
    #[arg(long = "registry-delimiter", default_value = ";")]
    pub registry_delimiter: char,

    /// Character encoding of the registry extract.
    #[arg(long = "registry-encoding", value_enum, default_value = "latin1")]
    pub registry_encoding: EncodingArg,

    /// Field delimiter of the pricing extract.
    #[arg(long = "pricing-delimiter", default_value = ",")]
    pub pricing_delimiter: char,

    /// Character encoding of the pricing extract.
    #[arg(long = "pricing-encoding", value_enum, default_value = "utf8")]
    pub pricing_encoding: EncodingArg,

    /// Name of the pricing column carrying the registration number.
    #[arg(long = "registration-column", value_name = "NAME")]
    pub registration_column: Option<String>,

    /// Name of the pricing column carrying the presentation text.
    #[arg(long = "presentation-column", value_name = "NAME")]
    pub presentation_column: Option<String>,

    /// Run every stage and report counts without writing to the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Source-file encodings the loaders understand.
#[derive(Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    Utf8,
    Latin1,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
