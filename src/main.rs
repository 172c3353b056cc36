//! Music Recognition - identify songs from audio.
//!
//! Recognition is done by the AudD API. The recognition can run locally
//! (`recognize`) or as a job on Apify (`run`, `serve`), in which case this
//! program submits the job, waits for it and renders the stored result.

pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod recognition;
pub mod render;
pub mod server;
#[cfg(test)]
pub mod test_utils;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_recognition=info".parse()?))
        .init();

    if !cli::run_command(&args)? {
        cli::Cli::command().print_help()?;
    }
    Ok(())
}
