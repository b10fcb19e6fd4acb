//! Binary crate for the `heatwatch` monitor.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging initialization
//! - Wiring the core monitor loop to the host's notification facility

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
