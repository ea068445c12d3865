// ABOUTME: Entry point for the release-recovery CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use release_recovery::NextRelease;
use release_recovery::config::{self, CONFIG_FILENAME};
use release_recovery::error::Result;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Plugin narration is logged at info, so info is the quietest useful level.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            println!("Created {CONFIG_FILENAME}");
            Ok(())
        }
        Commands::Verify { dry_run } => {
            commands::verify(&cwd, cli.plugin_dir.as_deref(), dry_run).await
        }
        Commands::Run {
            next_version,
            tag,
            channel,
            dry_run,
        } => {
            let mut release = match tag {
                Some(tag) => NextRelease::new(next_version, tag),
                None => NextRelease::from_version(next_version),
            };
            release.channel = channel;
            commands::release(&cwd, cli.plugin_dir.as_deref(), release, dry_run).await
        }
    }
}
