//! Folio - render a personal site page assembled from Markdown sources.

#![allow(dead_code)]

mod bootstrap;
mod cli;
mod config;
mod content;
mod core;
mod fetch;
mod logger;
mod page;
mod reload;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Render { .. } => cli::render::render_site(&config),
        Commands::Serve { .. } => cli::serve::serve_site(&config),
        Commands::Validate { args } => cli::validate::validate_site(&config, args),
    }
}
