//! Command-line interface for music-recognition.
//!
//! Runs recognitions locally or through the job platform, normalizes saved
//! provider responses, and starts the web UI.

mod commands;

pub use commands::{Cli, Commands, run_command};
