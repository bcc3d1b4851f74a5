//! ADG Analyzer - CLI entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};

/// Log to stderr, filtered by RUST_LOG (default: warn). stdout carries JSON only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze(args) => {
            let all_valid = commands::analyze::handle(&args, config_path)?;
            if !all_valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Classify { tag } => commands::classify::handle(&tag, config_path),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Path => commands::config::handle_path(config_path),
        },
    }
}
