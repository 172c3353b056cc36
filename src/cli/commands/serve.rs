//! Web UI and configuration commands.

use std::path::Path;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::{self, Config};
use crate::server;

/// Serve the web UI until Ctrl+C or SIGTERM
pub fn cmd_serve(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            signal_token.cancel();
        });

        println!("Web UI: http://{}", config.server.bind);
        server::serve(config, shutdown).await?;
        Ok::<(), anyhow::Error>(())
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}

/// Report what is configured. Tokens are never printed.
pub fn cmd_check_config(config: &Config, path: Option<&Path>, save: bool) -> anyhow::Result<()> {
    match path {
        Some(path) if path.exists() => println!("Config file: {} (found)", path.display()),
        Some(path) => println!("Config file: {} (not found, using defaults)", path.display()),
        None => println!("Config file: no config directory available"),
    }
    println!();

    let credentials = &config.credentials;
    print_credential("AudD token", credentials.require_audd().is_ok(), "AUDD_API_TOKEN");
    print_credential("Apify token", credentials.require_apify().is_ok(), "APIFY_TOKEN");
    println!();

    let sources: Vec<&str> = config.provider.return_sources.iter().map(|p| p.as_str()).collect();
    println!("Provider:");
    println!("  Endpoint:       {}", config.provider.endpoint);
    println!("  Return sources: {}", sources.join(", "));
    println!("  Timeout:        {}s", config.provider.timeout_secs);
    println!();

    let platform = &config.platform;
    println!("Job platform:");
    println!("  Base URL:       {}", platform.base_url);
    println!("  Actor:          {}", platform.actor_id);
    println!("  Wait on submit: {}s", platform.wait_for_finish_secs);
    println!("  Poll interval:  {}s", platform.poll_interval_secs);
    println!(
        "  Max polls:      {}",
        platform
            .max_poll_attempts
            .map_or("unlimited".to_string(), |n| n.to_string())
    );
    println!(
        "  Max wait:       {}",
        platform
            .max_wait_secs
            .map_or("unlimited".to_string(), |s| format!("{}s", s))
    );
    if let Err(e) = platform.validate() {
        println!("  ⚠ {}", e);
    }
    if platform.wait_for_finish_secs >= platform.request_timeout_secs {
        println!(
            "  ⚠ wait_for_finish_secs ({}) is not below request_timeout_secs ({})",
            platform.wait_for_finish_secs, platform.request_timeout_secs
        );
    }
    println!();

    println!("Web UI:");
    println!("  Bind:           {}", config.server.bind);

    if save {
        // Tokens given by flag or environment stay out of the file
        let mut to_save = config.clone();
        to_save.credentials = path.map(config::load_from).unwrap_or_default().credentials;
        match path {
            Some(path) => config::save_to(&to_save, path)?,
            None => config::save(&to_save)?,
        }
        println!();
        println!("✓ Configuration saved");
    }
    Ok(())
}

fn print_credential(name: &str, present: bool, env_var: &str) {
    if present {
        println!("✓ {}: configured", name);
    } else {
        println!("✗ {}: missing (set {} or add it to [credentials])", name, env_var);
    }
}
