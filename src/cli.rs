use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{canonical::MatchPolicy, tools::ToolKind};

#[derive(Debug, Parser)]
#[command(author, version, about = "Canonicalize and profile CSV datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Describe a CSV file and map its headers onto the canonical vocabulary
    Process(ProcessArgs),
    /// Produce summary statistics and data-quality recommendations
    Summary(SummaryArgs),
    /// List the canonical vocabulary with normalized forms
    Canonical(CanonicalArgs),
    /// Invoke a tool by its registered name and print the JSON result
    Tool(ToolArgs),
    /// List the registered tool names and descriptions
    Tools,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Character encoding of the input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Render aligned tables instead of JSON
    #[arg(long = "table")]
    pub table: bool,
    /// Emit single-line JSON
    #[arg(long = "compact", conflicts_with = "table")]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// YAML file listing canonical headers (replaces the built-in HR vocabulary)
    #[arg(long = "vocabulary")]
    pub vocabulary: Option<PathBuf>,
    /// How headers are matched against the vocabulary
    #[arg(long = "match-policy", value_enum, default_value = "prioritized")]
    pub match_policy: MatchPolicy,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Maximum categories shown per column in table output (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct CanonicalArgs {
    /// YAML file listing canonical headers (replaces the built-in HR vocabulary)
    #[arg(long = "vocabulary")]
    pub vocabulary: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ToolArgs {
    /// Registered tool name
    #[arg(value_enum)]
    pub name: ToolKind,
    #[command(flatten)]
    pub input: InputArgs,
}
