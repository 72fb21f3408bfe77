//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - add / edit / toggle / delete: mutate loops
//! - list / show / stats: read derived views
//! - tags: print the tag catalog

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Loops - close your open loops, reclaim your mental energy
#[derive(Parser, Debug)]
#[command(name = "loops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new open loop
    Add {
        /// What's on your mind
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// How much this drains you, 1-5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        energy: Option<u8>,
    },

    /// List loops
    #[command(group(ArgGroup::new("which").args(["closed", "all"])))]
    List {
        /// Show closed loops instead of open ones
        #[arg(long)]
        closed: bool,

        /// Show open and closed loops
        #[arg(short, long)]
        all: bool,

        /// Only loops with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Keep newest-first order instead of sorting by energy
        #[arg(short, long)]
        newest: bool,
    },

    /// Show a single loop
    Show {
        /// Loop ID or unique prefix
        id: String,
    },

    /// Edit a loop's content, tags or energy
    #[command(group(ArgGroup::new("energy_change").args(["energy", "clear_energy"])))]
    Edit {
        /// Loop ID or unique prefix
        id: String,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// Replace tags with these (repeatable)
        #[arg(short, long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,

        /// New energy level, 1-5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        energy: Option<u8>,

        /// Remove the energy level
        #[arg(long)]
        clear_energy: bool,
    },

    /// Close an open loop or reopen a closed one
    #[command(visible_alias = "done")]
    Toggle {
        /// Loop ID or unique prefix
        id: String,
    },

    /// Delete a loop permanently
    #[command(visible_alias = "rm")]
    Delete {
        /// Loop ID or unique prefix
        id: String,
    },

    /// List available tags
    Tags,

    /// Show open/closed counts and total energy drain
    Stats,
}

/// Which partition `list` shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Open,
    Closed,
    All,
}

impl ListScope {
    pub fn from_flags(closed: bool, all: bool) -> Self {
        match (closed, all) {
            (_, true) => ListScope::All,
            (true, false) => ListScope::Closed,
            (false, false) => ListScope::Open,
        }
    }
}
