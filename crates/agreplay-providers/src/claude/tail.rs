use crate::Result;
use agreplay_types::Event;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::io::{ReadReport, SessionRead};

/// Records appended since the previous poll
#[derive(Debug, Clone, Default)]
pub struct TailUpdate {
    /// The file shrank (truncated or replaced); events start from the top again
    pub reset: bool,
    pub events: Vec<Event>,
    pub report: ReadReport,
    /// File line numbers of the lines this poll skipped
    pub skipped_lines: Vec<usize>,
}

impl TailUpdate {
    pub fn is_empty(&self) -> bool {
        !self.reset && self.events.is_empty()
    }
}

/// Incremental reader for a JSONL file that is still being written.
///
/// Remembers a byte offset between polls. A trailing line without its
/// newline is held back until the writer finishes it.
#[derive(Debug)]
pub struct TailReader {
    path: PathBuf,
    offset: u64,
    pending: Vec<u8>,
    lines_seen: usize,
}

impl TailReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            pending: Vec::new(),
            lines_seen: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll(&mut self) -> Result<TailUpdate> {
        let mut update = TailUpdate::default();

        let len = std::fs::metadata(&self.path)?.len();
        if len < self.offset {
            tracing::info!(path = %self.path.display(), "session file shrank, rereading from start");
            self.offset = 0;
            self.pending.clear();
            self.lines_seen = 0;
            update.reset = true;
        }

        if len == self.offset {
            return Ok(update);
        }

        let mut file = std::fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut appended = Vec::new();
        file.read_to_end(&mut appended)?;
        self.offset += appended.len() as u64;
        self.pending.extend_from_slice(&appended);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Ok(update);
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();

        let mut read = SessionRead::default();
        // The final segment after the last newline is always empty
        let mut segments: Vec<&[u8]> = complete.split(|b| *b == b'\n').collect();
        segments.pop();
        for line in segments {
            self.lines_seen += 1;
            read.accept(&self.path, self.lines_seen, &String::from_utf8_lossy(line));
        }

        update.events = read.events;
        update.report = read.report;
        update.skipped_lines = read.skipped_lines;
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn append(path: &Path, text: &str) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    #[test]
    fn test_poll_returns_only_new_records() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("live.jsonl");
        append(&path, "{\"type\":\"user\",\"n\":1}\n")?;

        let mut reader = TailReader::new(&path);
        assert_eq!(reader.poll()?.events.len(), 1);
        assert!(reader.poll()?.is_empty());

        append(&path, "{\"type\":\"user\",\"n\":2}\n{\"type\":\"user\",\"n\":3}\n")?;
        let update = reader.poll()?;
        assert_eq!(update.events.len(), 2);
        assert_eq!(update.events[0].u64_at("/n"), Some(2));
        Ok(())
    }

    #[test]
    fn test_partial_line_is_held_back() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("live.jsonl");
        append(&path, "{\"type\":\"us")?;

        let mut reader = TailReader::new(&path);
        let update = reader.poll()?;
        assert!(update.events.is_empty());
        assert_eq!(update.report.skipped, 0);

        append(&path, "er\"}\n")?;
        let update = reader.poll()?;
        assert_eq!(update.events.len(), 1);
        assert_eq!(update.events[0].tag(), Some("user"));
        Ok(())
    }

    #[test]
    fn test_truncated_file_resets() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("live.jsonl");
        append(&path, "{\"type\":\"user\",\"n\":1}\n{\"type\":\"user\",\"n\":2}\n")?;

        let mut reader = TailReader::new(&path);
        assert_eq!(reader.poll()?.events.len(), 2);

        std::fs::write(&path, "{\"type\":\"system\"}\n")?;
        let update = reader.poll()?;
        assert!(update.reset);
        assert_eq!(update.events.len(), 1);
        assert_eq!(update.events[0].tag(), Some("system"));
        Ok(())
    }

    #[test]
    fn test_skipped_lines_keep_file_numbering() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("live.jsonl");
        append(&path, "{\"type\":\"user\"}\n\n\nbad\n")?;

        let mut reader = TailReader::new(&path);
        let update = reader.poll()?;
        assert_eq!(update.events.len(), 1);
        assert_eq!(update.skipped_lines, vec![4]);

        append(&path, "\nalso bad\n")?;
        assert_eq!(reader.poll()?.skipped_lines, vec![6]);

        let whole = crate::read_session_file(&path)?;
        assert_eq!(whole.skipped_lines, vec![4, 6]);
        Ok(())
    }

    #[test]
    fn test_bad_lines_are_counted() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("live.jsonl");
        append(&path, "garbage\n{\"type\":\"user\"}\n")?;

        let update = TailReader::new(&path).poll()?;
        assert_eq!(
            update.report,
            ReadReport {
                decoded: 1,
                skipped: 1
            }
        );
        Ok(())
    }
}
