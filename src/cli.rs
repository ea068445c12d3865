// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "release-recovery")]
#[command(about = "Run deployment plugins and delete the release tag when publishing fails")]
#[command(version)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding installed plugins (overrides plugin_dir in the config)
    #[arg(long, global = true)]
    pub plugin_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new release-recovery.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Resolve the configured plugins and run their verify-conditions step
    Verify {
        /// Only simulate destructive commands
        #[arg(long)]
        dry_run: bool,
    },

    /// Run every release phase through the configured plugins
    Run {
        /// Version being released
        #[arg(long, value_name = "VERSION")]
        next_version: String,

        /// Git tag of the release (default: v<VERSION>)
        #[arg(long)]
        tag: Option<String>,

        /// Distribution channel; also runs the add-channel phase
        #[arg(long)]
        channel: Option<String>,

        /// Only simulate destructive commands
        #[arg(long)]
        dry_run: bool,
    },
}
