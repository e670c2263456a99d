use crate::Result;
use agreplay_engine::{ReplayState, apply, render};
use agreplay_providers::{ReadReport, TailReader, read_session_file};
use std::path::{Path, PathBuf};

/// A finished one-shot replay of a session file
#[derive(Debug, Clone)]
pub struct FileReplay {
    pub state: ReplayState,
    pub report: ReadReport,
}

impl FileReplay {
    pub fn transcript(&self) -> String {
        render(&self.state)
    }
}

/// Decode a whole session file and fold every record, in file order.
pub fn replay_file(path: &Path) -> Result<FileReplay> {
    let read = read_session_file(path)?;

    let mut state = ReplayState::new();
    for event in &read.events {
        apply(&mut state, event);
    }

    if read.report.skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = read.report.skipped,
            lines = ?read.skipped_lines,
            "some lines could not be decoded and were skipped"
        );
    }

    Ok(FileReplay {
        state,
        report: read.report,
    })
}

/// Fresh transcript produced by a `LiveSession::refresh`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    /// The file was truncated or replaced and replay started over
    pub reset: bool,
    /// Records folded by this refresh
    pub applied: usize,
    pub transcript: String,
}

/// One session file replayed incrementally as it grows.
///
/// Owns its `ReplayState` exclusively; replaying several sessions at once
/// means one `LiveSession` per file.
#[derive(Debug)]
pub struct LiveSession {
    reader: TailReader,
    state: ReplayState,
    last_transcript: Option<String>,
    report: ReadReport,
}

impl LiveSession {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            reader: TailReader::new(path),
            state: ReplayState::new(),
            last_transcript: None,
            report: ReadReport::default(),
        }
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    pub fn state(&self) -> &ReplayState {
        &self.state
    }

    /// Decode counts accumulated since the last reset
    pub fn report(&self) -> ReadReport {
        self.report
    }

    /// Fold newly appended records; returns the transcript only when it changed.
    pub fn refresh(&mut self) -> Result<Option<Refresh>> {
        let update = self.reader.poll()?;

        if update.reset {
            self.state = ReplayState::new();
            self.report = ReadReport::default();
            self.last_transcript = None;
        }

        for event in &update.events {
            apply(&mut self.state, event);
        }
        self.report.decoded += update.report.decoded;
        self.report.skipped += update.report.skipped;

        let transcript = render(&self.state);
        if self.last_transcript.as_deref() == Some(transcript.as_str()) {
            return Ok(None);
        }
        self.last_transcript = Some(transcript.clone());

        Ok(Some(Refresh {
            reset: update.reset,
            applied: update.events.len(),
            transcript,
        }))
    }
}
