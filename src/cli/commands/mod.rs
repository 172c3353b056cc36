//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `recognize`: the job body run locally, plus offline normalization
//! - `actor`: the job body run on the platform
//! - `run`: a full submit/poll/fetch cycle through the job platform
//! - `serve`: the web UI and a config check

mod actor;
mod recognize;
mod run;
mod serve;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::{self, Config};
use crate::recognition::RecognitionInput;

pub use actor::cmd_actor;
pub use recognize::{cmd_normalize, cmd_recognize};
pub use run::cmd_run;
pub use serve::{cmd_check_config, cmd_serve};

/// Music Recognition CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// AudD API token (overrides the config file)
    #[arg(long, global = true, env = "AUDD_API_TOKEN", hide_env_values = true)]
    pub audd_token: Option<String>,

    /// Apify API token (overrides the config file)
    #[arg(long, global = true, env = "APIFY_TOKEN", hide_env_values = true)]
    pub apify_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the audio comes from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// URL of hosted audio
    #[arg(long)]
    pub url: Option<String>,

    /// Local audio file, sent base64-encoded
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Include the untouched provider response in the output
    #[arg(long)]
    pub include_raw: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Recognize audio locally by calling the provider directly
    Recognize {
        #[command(flatten)]
        source: SourceArgs,
        /// Job input as JSON (`-` reads stdin); replaces the source flags
        #[arg(long, conflicts_with_all = ["url", "file"])]
        input: Option<PathBuf>,
        /// Write the result JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run as the platform job: read the run's input record, recognize,
    /// store the result as its OUTPUT record
    Actor {
        /// The run's default key-value store (set by the platform)
        #[arg(long, env = "APIFY_DEFAULT_KEY_VALUE_STORE_ID")]
        store_id: String,
        /// Key of the input record (set by the platform)
        #[arg(long, env = "APIFY_INPUT_KEY", default_value = crate::jobs::actor::DEFAULT_INPUT_KEY)]
        input_key: String,
    },
    /// Normalize a saved provider response
    Normalize {
        /// Path to the provider response JSON
        path: PathBuf,
        /// Keep the response under `raw` in the output
        #[arg(long)]
        include_raw: bool,
    },
    /// Recognize audio through the job platform
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Start the web UI
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show the effective configuration
    CheckConfig {
        /// Write the effective configuration (without tokens) to the config file
        #[arg(long)]
        save: bool,
    },
}

impl Cli {
    /// Load the config file and fold in command-line/environment overrides
    pub fn load_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };

        if let Some(token) = &self.audd_token {
            config.credentials.audd_api_token = Some(token.clone());
        }
        if let Some(token) = &self.apify_token {
            config.credentials.apify_token = Some(token.clone());
        }
        config
    }

    /// Config file location in effect
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(config::config_path)
    }
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let Some(command) = &cli.command else {
        return Ok(false);
    };

    let rt = Runtime::new()?;
    let mut config = cli.load_config();

    match command {
        Commands::Recognize {
            source,
            input,
            output,
        } => {
            let input = match input {
                Some(path) => read_input(path)?,
                None => source_input(source)?,
            };
            cmd_recognize(&rt, &config, &input, output.as_deref())?;
        }
        Commands::Actor {
            store_id,
            input_key,
        } => {
            let storage = crate::jobs::actor::RunStorage {
                store_id: store_id.clone(),
                input_key: input_key.clone(),
            };
            cmd_actor(&rt, &config, &storage)?;
        }
        Commands::Normalize { path, include_raw } => {
            cmd_normalize(path, *include_raw)?;
        }
        Commands::Run { source, json } => {
            let input = source_input(source)?;
            cmd_run(&rt, &config, &input, *json)?;
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
            cmd_serve(&rt, &config)?;
        }
        Commands::CheckConfig { save } => {
            cmd_check_config(&config, cli.config_path().as_deref(), *save)?;
        }
    }
    Ok(true)
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Build a job input from the source flags.
///
/// Both or neither source is passed through as-is; validation rejects it.
pub(crate) fn source_input(source: &SourceArgs) -> anyhow::Result<RecognitionInput> {
    let audio_b64 = match &source.file {
        Some(path) => {
            let bytes = std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            RecognitionInput::from_audio(&bytes, source.include_raw).audio_b64
        }
        None => None,
    };

    Ok(RecognitionInput {
        audio_url: source.url.clone(),
        audio_b64,
        include_raw: source.include_raw,
    })
}

/// Read a job input JSON document from a file, or stdin for `-`
pub(crate) fn read_input(path: &Path) -> anyhow::Result<RecognitionInput> {
    let contents = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?
    };

    serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Invalid job input in {}: {}", path.display(), e))
}

/// Cancel `token` when Ctrl+C is pressed. Must be called inside the runtime.
pub(crate) fn cancel_on_ctrl_c(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C, cancelling");
                token.cancel();
            }
            Err(e) => tracing::warn!("Failed to install Ctrl+C handler: {}", e),
        }
    })
}
