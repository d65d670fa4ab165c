//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Mode;

/// Navigable decision trees: walk a questionnaire, record the path, replay it into recommendations
#[derive(Parser, Debug)]
#[command(name = "decision-guide")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory with data.json and recommendations.json (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Page to show.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Questionnaire page: first layer open
    Entry,
    /// Result page: recorded path open and highlighted
    Replay,
}

impl From<Page> for Mode {
    fn from(page: Page) -> Self {
        match page {
            Page::Entry => Mode::Entry,
            Page::Replay => Mode::Replay,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree as a page initially shows it
    Show {
        /// Page to render
        #[arg(long, value_enum, default_value_t = Page::Entry)]
        page: Page,
    },

    /// Walk the questionnaire interactively
    Walk {
        /// Print the destination instead of opening it
        #[arg(long)]
        no_open: bool,
    },

    /// Click nodes by id on the questionnaire page, in order
    Click {
        /// Node ids
        #[arg(required = true)]
        ids: Vec<usize>,
        /// Print the destination instead of opening it
        #[arg(long)]
        no_open: bool,
    },

    /// Replay the recorded path and list its recommendations
    Replay {
        /// Node ids to toggle after the path is restored
        ids: Vec<usize>,
        /// Emit frame and recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or reset the recorded path
    Path {
        #[command(subcommand)]
        command: PathCommands,
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
pub enum PathCommands {
    /// Show the recorded path
    Show,
    /// Forget the recorded path
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}
