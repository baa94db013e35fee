#![forbid(unsafe_code)]

//! ZPL CLI
//!
//! Renders ZPL label files to PNG and manages the viewer configuration.

mod cli;
mod commands;
mod config_handlers;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Args, AssetsAction, Command};
use zpl::ZplConfig;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,zpl=debug,zpl_parser=debug,zpl_interpreter=debug,zpl_renderer=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config_path = args.config.as_deref().filter(|path| !path.is_empty());
    match args.command {
        Command::Render { file, output, all } => {
            let config = ZplConfig::load(config_path)?;
            commands::render(&config, &file, output.as_deref(), all)
        }
        Command::Parse { file, json, label } => commands::parse(&file, json, label),
        Command::Assets {
            action: AssetsAction::Check { root },
        } => commands::assets_check(&root),
        Command::Config { action } => {
            config_handlers::handle_config_command(config_path, action)?;
            Ok(())
        }
    }
}
