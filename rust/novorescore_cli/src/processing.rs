use super::config::Config;
use novorescore::run_configured_pipeline;
use std::time::Instant;
use tracing::info;

use crate::errors::CliError;

/// Output directory creation happens inside the pipeline, before the first
/// dataset is read.
pub fn process(config: &Config) -> std::result::Result<(), CliError> {
    let start = Instant::now();

    let summary = run_configured_pipeline(
        &config.pipeline,
        &config.target.inputs(),
        &config.decoy.inputs(),
        &config.output.directory,
    )?;

    info!(
        "Wrote {} target and {} decoy feature rows, {} scoring rows to {:?}",
        summary.target_rows, summary.decoy_rows, summary.pin_rows, summary.pin_path
    );
    info!("All done in {:?}", start.elapsed());
    Ok(())
}
