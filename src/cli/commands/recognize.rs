//! Local recognition and offline normalization commands.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::recognition::{self, RecognitionInput, RecognitionService};

/// Run the recognition job body locally: input in, normalized JSON out
pub fn cmd_recognize(
    rt: &Runtime,
    config: &Config,
    input: &RecognitionInput,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let service = RecognitionService::from_config(config)?;
    let result = rt.block_on(service.run(input))?;

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
            eprintln!("✓ Result written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Normalize a provider response saved as JSON
pub fn cmd_normalize(path: &Path, include_raw: bool) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let response: serde_json::Value = serde_json::from_str(&contents)?;

    let mut result = recognition::normalize(&response)?;
    if include_raw {
        result.raw = Some(response);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
