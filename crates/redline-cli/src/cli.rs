use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "redline",
    about = "Redline: visual diffs of HTML documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the new document with changes marked up
    Diff(DiffArgs),
    /// List the aligned regions of two documents
    Ops(OpsArgs),
    /// Show how a document is tokenized
    Tokens(TokensArgs),
}

/// Diff options. Flags override values loaded from `--config`.
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// TOML file with diff options
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Tokens per block on the first matching attempt
    #[arg(long, global = true)]
    pub granularity: Option<usize>,
    /// Drop short matches stranded between long changes
    #[arg(long, global = true)]
    pub orphan_threshold: Option<f64>,
    /// Merge replacements separated only by whitespace
    #[arg(long, global = true)]
    pub combine_words: bool,
    /// Treat all whitespace variants as equal while matching
    #[arg(long, global = true)]
    pub ignore_whitespace: bool,
    /// Regex whose matches are kept as single tokens (repeatable)
    #[arg(long = "block", global = true, value_name = "REGEX")]
    pub blocks: Vec<String>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct OpsArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
pub struct TokensArgs {
    pub file: PathBuf,
}
