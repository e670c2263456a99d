use agreplay_runtime::replay_file;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle(file: &Path, output: Option<&Path>) -> Result<()> {
    let replay =
        replay_file(file).with_context(|| format!("failed to replay {}", file.display()))?;

    tracing::info!(
        path = %file.display(),
        records = replay.report.decoded,
        skipped = replay.report.skipped,
        elements = replay.state.len(),
        "rendered session"
    );

    super::write_transcript(&replay.transcript(), output)
}
