//! refers - keep documentation in sync with tagged source code
//!
//! refers provides:
//! - Tag scanning with `@tag:<name>` comments, refined to full Python statements
//! - Reference resolution of `@ref:<name>[:<option>]` placeholders
//! - Atomic `_refers` outputs that never hold partial substitutions
//! - Unified output format (jsonl/json/md)

use anyhow::Result;
use clap::Parser;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod backends;
mod cli;
mod core;
mod flows;
mod refs;
mod segment;
mod tags;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(&cli)?;
    cli::run(cli)
}

/// Logs go to stderr so stdout only ever carries the rendered ResultSet
fn init_logging(cli: &cli::Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if no_color {
        color_control::set_override(false);
    }
    Ok(())
}
