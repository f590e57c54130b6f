//! CLI module for tldw.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// tldw - YouTube summaries for Markdown notes
///
/// Fetches a video's transcript, summarizes it with the selected language
/// model and writes a formatted summary into your notes.
#[derive(Parser, Debug)]
#[command(name = "tldw")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TLDW_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a video and insert the summary into a note
    Summarize {
        /// YouTube URL (prompted for when missing or invalid)
        reference: Option<String>,

        /// Note to insert the summary into (stdout if not specified)
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Handle a pasted video URL as the editor would
    Paste {
        /// The pasted text
        text: String,

        /// Note the text was pasted into
        #[arg(short, long)]
        note: String,
    },

    /// Summarize web-clipped notes whose front-matter source is a video
    Clip {
        /// Note files to process
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Watch a notes directory and summarize new web clips
    Watch {
        /// Directory to watch
        dir: String,

        /// Polling interval in seconds
        #[arg(short, long, default_value = "2")]
        interval: u64,

        /// Also process notes that already exist when watching starts
        #[arg(long)]
        initial: bool,
    },

    /// Check configuration and provider setup
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Open configuration file in editor
    Edit,

    /// List available models
    Models,

    /// Select the model used for summaries
    Select {
        /// Model name (see `tldw config models`)
        name: String,
    },
}
