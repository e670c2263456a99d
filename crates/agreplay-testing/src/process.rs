//! Background process management for long-running commands.
//!
//! `agreplay watch` never exits on its own, so tests spawn it, read its
//! stdout on a helper thread, and kill it when done.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

/// A background process handle. The child is killed on drop.
pub struct BackgroundProcess {
    child: Child,
    lines: Option<Receiver<String>>,
}

impl BackgroundProcess {
    /// Spawn with stdout piped and collected line by line as it arrives.
    ///
    /// Stderr is discarded so a chatty log level cannot fill an unread pipe.
    pub fn spawn_piped(mut command: Command) -> std::io::Result<Self> {
        command.stdout(Stdio::piped());
        command.stderr(Stdio::null());
        let mut child = command.spawn()?;

        let lines = child.stdout.take().map(|stdout| {
            let (tx, rx) = channel();
            std::thread::spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
            rx
        });

        Ok(Self { child, lines })
    }

    /// Read stdout lines until one satisfies `pred` or `timeout` passes.
    ///
    /// Returns every line consumed, including the matching one, or `None`
    /// on timeout or when the process closed stdout first.
    pub fn wait_for_line(
        &mut self,
        timeout: Duration,
        pred: impl Fn(&str) -> bool,
    ) -> Option<Vec<String>> {
        let lines = self.lines.as_ref()?;
        let deadline = Instant::now() + timeout;
        let mut seen = Vec::new();

        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let line = lines.recv_timeout(remaining).ok()?;
            let matched = pred(&line);
            seen.push(line);
            if matched {
                return Some(seen);
            }
        }
    }

    pub fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill()
    }
}

impl Drop for BackgroundProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
