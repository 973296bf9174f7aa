//! CLI argument definitions for the attribute dependency tool.

use std::path::PathBuf;

use attrdep_io::Delimiter;
use attrdep_model::Culture;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "attrdep",
    version,
    about = "Attribute dependency rule tables - check, import and export",
    long_about = "Check attribute dependency rule tables against dataset schemas.\n\n\
                  Rule sets are JSON documents; mapping tables can be exchanged as\n\
                  CSV/TSV or as 'source => target' text files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Validate rule sets against their dataset schemas.
    Check(CheckArgs),

    /// Write the mappings of a rule set to a table file.
    Export(ExportArgs),

    /// Replace the mappings of a rule set with those of a table file.
    Import(ImportArgs),

    /// Show the fields, domains and subtypes of a dataset.
    Show(ShowArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Schema document (default: $ATTRDEP_SCHEMA).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Rule set document with one rule set or an array of them.
    #[arg(long, value_name = "PATH")]
    pub dependency: PathBuf,

    /// Mapping table to check instead of the stored mappings.
    ///
    /// Only valid when the document holds a single rule set.
    #[arg(long, value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    #[command(flatten)]
    pub table: TableArgs,

    /// How to print findings.
    #[arg(long = "output-format", value_enum, default_value = "table")]
    pub output_format: OutputFormatArg,

    /// Treat warnings as errors for the exit code.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Rule set document.
    #[arg(long, value_name = "PATH")]
    pub dependency: PathBuf,

    /// Mapping table to write (.csv, .tsv, .tab or .txt).
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Field separator for delimited tables (default: from the extension).
    #[arg(long, value_enum)]
    pub delimiter: Option<DelimiterArg>,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Rule set document.
    #[arg(long, value_name = "PATH")]
    pub dependency: PathBuf,

    /// Mapping table to read (.csv, .tsv, .tab or .txt).
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the updated rule set (default: overwrite --dependency).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub table: TableArgs,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Schema document (default: $ATTRDEP_SCHEMA).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Dataset name (case-insensitive).
    #[arg(long)]
    pub dataset: String,
}

/// Options for reading mapping tables.
#[derive(Args, Clone, Copy, Default)]
pub struct TableArgs {
    /// Field separator for delimited tables (default: from the extension).
    #[arg(long, value_enum)]
    pub delimiter: Option<DelimiterArg>,

    /// Culture for numbers and dates in table cells (invariant, en-US,
    /// de-DE, de-CH, fr-FR).
    #[arg(long, default_value = "invariant")]
    pub culture: Culture,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DelimiterArg {
    Comma,
    Semicolon,
    Tab,
}

impl From<DelimiterArg> for Delimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Comma => Delimiter::Comma,
            DelimiterArg::Semicolon => Delimiter::Semicolon,
            DelimiterArg::Tab => Delimiter::Tab,
        }
    }
}

/// Finding output choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Tables for terminals.
    Table,
    /// One line per finding.
    Text,
    /// JSON for machine parsing.
    Json,
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
