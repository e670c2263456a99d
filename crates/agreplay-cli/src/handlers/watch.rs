use agreplay_runtime::{SessionWatcher, StreamEvent, WatchConfig};
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

const DIVIDER_WIDTH: usize = 60;
const TICK: Duration = Duration::from_millis(200);

pub fn handle(file: &Path, output: Option<&Path>, config: &WatchConfig) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })?;

    let watcher = SessionWatcher::new(
        file.to_path_buf(),
        Duration::from_millis(config.poll_interval_ms),
    )
    .with_context(|| format!("failed to watch {}", file.display()))?;

    let mut snapshots = 0usize;
    while running.load(Ordering::SeqCst) {
        match watcher.receiver().recv_timeout(TICK) {
            Ok(StreamEvent::Attached { path }) => {
                tracing::info!(path = %path.display(), "attached to session");
            }
            Ok(StreamEvent::Rendered(transcript)) => {
                if output.is_none() && config.divider && snapshots > 0 {
                    print_divider()?;
                }
                super::write_transcript(&transcript, output)?;
                snapshots += 1;
            }
            Ok(StreamEvent::Reset) => {
                tracing::info!(path = %file.display(), "session file was reset, replaying from the start");
            }
            Ok(StreamEvent::Error(msg)) => {
                tracing::error!("{}", msg);
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => bail!("session watcher stopped unexpectedly"),
        }
    }

    tracing::info!(snapshots, "stopped watching");
    Ok(())
}

fn print_divider() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", "─".repeat(DIVIDER_WIDTH))?;
    Ok(())
}
