//! CLI definitions for jobfill.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jobfill CLI.
#[derive(Parser)]
#[command(name = "jobfill")]
#[command(about = "Fill job application forms in a Chrome tab")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.jobfill/config.toml)
    #[arg(short, long, global = true, env = "JOBFILL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fill the application page once
    Run {
        /// Open this URL in a new tab instead of using the current one
        url: Option<String>,

        /// Print the full fill report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow the tab and fill every application page it lands on
    Watch {
        /// Open this URL in a new tab instead of using the current one
        url: Option<String>,
    },

    /// List unanswered questions without filling anything
    Scan {
        /// Open this URL in a new tab instead of using the current one
        url: Option<String>,
    },

    /// Validate the configuration and applicant files
    Check,
}
