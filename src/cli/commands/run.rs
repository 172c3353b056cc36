//! Full recognition cycle through the job platform.

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use super::cancel_on_ctrl_c;
use crate::config::Config;
use crate::jobs::JobOrchestrator;
use crate::recognition::RecognitionInput;
use crate::render;

/// Submit `input`, wait for the run and print its result.
///
/// Progress goes to stderr so `--json` output can be piped.
pub fn cmd_run(
    rt: &Runtime,
    config: &Config,
    input: &RecognitionInput,
    json: bool,
) -> anyhow::Result<()> {
    let orchestrator = JobOrchestrator::from_config(config)?;

    rt.block_on(async {
        let cancel = CancellationToken::new();
        let ctrl_c = cancel_on_ctrl_c(cancel.clone());

        eprintln!("Recognizing music... (Ctrl+C to cancel)");
        let result = orchestrator.run(input, &cancel).await;
        ctrl_c.abort();

        let result = result?;
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", render::render_result(&result, input.include_raw));
        }
        Ok::<(), anyhow::Error>(())
    })
}
