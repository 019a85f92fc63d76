//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::TotalPolicy;

/// Reference trees: turn dash-indented label outlines into ordered forests and back
#[derive(Parser, Debug)]
#[command(name = "reftree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Local config file (default: ./.reftree.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an outline into leveled entries (JSON)
    Parse {
        /// Outline file, `-` for stdin
        #[arg(default_value = "-", value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Build a forest from an outline (JSON)
    Build {
        /// Outline file, `-` for stdin
        #[arg(default_value = "-", value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Store ` :: ` joined branch paths on every node
        #[arg(short, long)]
        branch: bool,
    },

    /// Serialize a forest (JSON) back to outline text
    Outline {
        /// Forest JSON file, `-` for stdin
        #[arg(default_value = "-", value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Show a forest, block or outline as a tree
    Tree {
        /// Outline, forest JSON or block JSON, `-` for stdin
        #[arg(default_value = "-", value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// List every node in pre-order with its depth (JSON)
    Flatten {
        /// Outline, forest JSON or block JSON, `-` for stdin
        #[arg(default_value = "-", value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Render display rows with reference counts (JSON)
    Render {
        /// Outline, forest JSON or block JSON, `-` for stdin
        #[arg(default_value = "-", value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// JSON object mapping match keys to reference counts
        #[arg(long, value_hint = ValueHint::FilePath)]
        counts: Option<PathBuf>,

        /// Show nested labels expanded
        #[arg(short, long)]
        expanded: bool,

        /// What the total counts
        #[arg(long, value_enum)]
        total: Option<TotalPolicy>,
    },

    /// Convert the outline text of a block file into a forest, in place
    Hydrate {
        /// Block JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Edit the outline of a block file in $EDITOR
    Edit {
        /// Block JSON file (created if missing)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}
