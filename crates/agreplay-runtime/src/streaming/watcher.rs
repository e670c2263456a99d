use crate::Result;
use crate::session::LiveSession;
use notify::{EventKind, PollWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Attached { path: PathBuf },
    /// Full transcript after the latest change
    Rendered(String),
    /// The file was truncated or replaced; the next `Rendered` starts over
    Reset,
    Error(String),
}

/// Follows one session file and emits a fresh transcript whenever it changes.
pub struct SessionWatcher {
    _watcher: PollWatcher,
    rx: Receiver<StreamEvent>,
}

impl SessionWatcher {
    pub fn new(path: PathBuf, poll_interval: Duration) -> Result<Self> {
        // The poll watcher reports a missing path through its handler, not as an error
        std::fs::metadata(&path)?;

        let (tx_out, rx_out) = channel();
        let (tx_fs, rx_fs) = channel();

        let config = notify::Config::default()
            .with_poll_interval(poll_interval)
            .with_compare_contents(true);

        let mut watcher = PollWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    let _ = tx_fs.send(event);
                }
            },
            config,
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        let mut live = LiveSession::open(path.clone());
        let _ = tx_out.send(StreamEvent::Attached { path: path.clone() });
        refresh_and_send(&mut live, &tx_out);

        let tx_worker = tx_out.clone();
        std::thread::Builder::new()
            .name("session-watcher-worker".to_string())
            .spawn(move || {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    while let Ok(event) = rx_fs.recv() {
                        match event.kind {
                            EventKind::Create(_) | EventKind::Modify(_) => {
                                refresh_and_send(&mut live, &tx_worker);
                            }
                            EventKind::Remove(_) => {
                                let _ = tx_worker.send(StreamEvent::Error(format!(
                                    "Session file removed: {}",
                                    live.path().display()
                                )));
                            }
                            _ => {}
                        }
                    }
                }));

                if let Err(panic_err) = result {
                    let panic_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_err.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Worker thread panicked with unknown error".to_string()
                    };
                    let _ = tx_worker.send(StreamEvent::Error(format!(
                        "FATAL: Worker thread panicked: {}",
                        panic_msg
                    )));
                }
            })?;

        Ok(Self {
            _watcher: watcher,
            rx: rx_out,
        })
    }

    pub fn receiver(&self) -> &Receiver<StreamEvent> {
        &self.rx
    }
}

fn refresh_and_send(live: &mut LiveSession, tx: &Sender<StreamEvent>) {
    match live.refresh() {
        Ok(Some(refresh)) => {
            if refresh.reset {
                let _ = tx.send(StreamEvent::Reset);
            }
            tracing::debug!(
                path = %live.path().display(),
                applied = refresh.applied,
                elements = live.state().len(),
                "session transcript changed"
            );
            let _ = tx.send(StreamEvent::Rendered(refresh.transcript));
        }
        Ok(None) => {}
        Err(e) => {
            let _ = tx.send(StreamEvent::Error(format!(
                "Failed to read {}: {}",
                live.path().display(),
                e
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agreplay_testing::{SessionLog, TestWorld, records};
    use serde_json::json;

    const WAIT: Duration = Duration::from_secs(10);

    fn next_rendered(rx: &Receiver<StreamEvent>) -> String {
        loop {
            match rx.recv_timeout(WAIT).expect("watcher went quiet") {
                StreamEvent::Rendered(text) => return text,
                StreamEvent::Error(e) => panic!("watcher error: {}", e),
                _ => continue,
            }
        }
    }

    #[test]
    fn test_watcher_renders_initial_and_appended_records() -> anyhow::Result<()> {
        let world = TestWorld::new();
        let path = world.write_session(
            "watched.jsonl",
            &SessionLog::new().push(records::user_text("start")),
        )?;

        let watcher = SessionWatcher::new(path.clone(), Duration::from_millis(20))?;
        let rx = watcher.receiver();

        assert_eq!(
            rx.recv_timeout(WAIT)?,
            StreamEvent::Attached { path: path.clone() }
        );
        assert_eq!(next_rendered(rx), "❯ start");

        let more = SessionLog::new()
            .push(records::tool_use(
                "r1",
                "t1",
                "Glob",
                json!({"pattern": "**/*.rs"}),
            ))
            .to_jsonl();
        world.append_raw(&path, &more)?;

        assert_eq!(next_rendered(rx), "❯ start\n\n● Glob(**/*.rs)");
        Ok(())
    }

    #[test]
    fn test_missing_file_fails_to_attach() {
        let result = SessionWatcher::new(
            PathBuf::from("/definitely/not/here.jsonl"),
            Duration::from_millis(20),
        );
        assert!(result.is_err());
    }
}
