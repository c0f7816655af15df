//! Binary crate for the `weatherdash` terminal dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive map dashboard (ratatui)
//! - Plain-text output and interactive configuration

use clap::Parser;

mod app;
mod cli;
mod configure;
mod input;
mod logging;
mod render;
mod text;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
