//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;
use crate::domain::{DecoderKind, DomainResult, PrueferSequence};

/// Decode Prüfer sequences into labeled trees
#[derive(Parser, Debug)]
#[command(name = "pruefer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .pruefer.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// A Prüfer sequence given either as separate labels or as one string.
#[derive(Args, Debug, Clone, Default)]
pub struct SequenceArgs {
    /// Vertex labels of the sequence (none = the single-edge tree)
    pub labels: Vec<usize>,

    /// Sequence as one string, e.g. "[2, 3, 5, 5]"
    #[arg(short, long, conflicts_with = "labels")]
    pub sequence: Option<String>,
}

impl SequenceArgs {
    pub fn to_sequence(&self) -> DomainResult<PrueferSequence> {
        match &self.sequence {
            Some(text) => text.parse(),
            None => PrueferSequence::new(self.labels.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a sequence into its tree
    Decode {
        #[command(flatten)]
        input: SequenceArgs,
        /// Decoding algorithm
        #[arg(short, long, value_enum)]
        algorithm: Option<DecoderKind>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Root vertex for --format tree
        #[arg(short, long)]
        root: Option<usize>,
        /// Cross-check against the other algorithm
        #[arg(long)]
        verify: bool,
    },

    /// Decode with both algorithms and compare
    Check {
        #[command(flatten)]
        input: SequenceArgs,
    },

    /// Encode a tree, given as edges u-v, into its sequence
    Encode {
        /// Edges of a tree on 1..=n, n = number of edges + 1
        #[arg(num_args = 1..)]
        edges: Vec<String>,
    },

    /// Decode one sequence per line of a file ("-" for stdin)
    Batch {
        /// Input file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Decoding algorithm
        #[arg(short, long, value_enum)]
        algorithm: Option<DecoderKind>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
