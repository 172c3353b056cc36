//! Platform-side job command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::jobs::{PlatformClient, actor};
use crate::recognition::RecognitionService;

/// Run the recognition job against the platform's storage for this run
pub fn cmd_actor(rt: &Runtime, config: &Config, storage: &actor::RunStorage) -> anyhow::Result<()> {
    let token = config.credentials.require_apify()?;
    let platform = PlatformClient::new(token, &config.platform)?;
    let service = RecognitionService::from_config(config)?;

    let result = rt.block_on(actor::run(&platform, &service, storage))?;
    eprintln!(
        "✓ Output stored ({})",
        if result.is_recognized() { "recognized" } else { "nothing recognized" }
    );
    Ok(())
}
