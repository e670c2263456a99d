pub mod render;
pub mod watch;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Print to stdout, or replace the contents of `output`.
fn write_transcript(transcript: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut content = transcript.to_string();
            if !content.is_empty() {
                content.push('\n');
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            if transcript.is_empty() {
                return Ok(());
            }
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", transcript)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
