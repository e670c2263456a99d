use crate::Result;
use agreplay_types::Event;
use serde_json::Value;
use std::path::Path;

/// Outcome of decoding one JSONL line
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    /// Empty or whitespace-only line
    Blank,
    Record(Event),
    /// Not JSON, or JSON that is not an object
    Invalid(String),
}

/// Decode one line of a session log.
pub fn decode_line(line: &str) -> DecodedLine {
    let line = line.trim();
    if line.is_empty() {
        return DecodedLine::Blank;
    }

    match serde_json::from_str::<Value>(line) {
        Ok(value @ Value::Object(_)) => DecodedLine::Record(Event::new(value)),
        Ok(_) => DecodedLine::Invalid("record is not a JSON object".to_string()),
        Err(err) => DecodedLine::Invalid(err.to_string()),
    }
}

/// Counts from one pass over a session log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadReport {
    pub decoded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SessionRead {
    pub events: Vec<Event>,
    pub report: ReadReport,
    /// 1-based numbers of the lines that were skipped
    pub skipped_lines: Vec<usize>,
}

impl SessionRead {
    /// Decode `line` (1-based `line_no`) and keep it if it is a record
    pub(crate) fn accept(&mut self, source: &Path, line_no: usize, line: &str) {
        match decode_line(line) {
            DecodedLine::Blank => {}
            DecodedLine::Record(event) => {
                self.events.push(event);
                self.report.decoded += 1;
            }
            DecodedLine::Invalid(reason) => {
                tracing::warn!(
                    path = %source.display(),
                    line = line_no,
                    %reason,
                    "skipping undecodable line"
                );
                self.report.skipped += 1;
                self.skipped_lines.push(line_no);
            }
        }
    }
}

/// Read a whole Claude Code JSONL session file.
///
/// A bad line is skipped with a warning; only I/O failure aborts the read.
pub fn read_session_file(path: &Path) -> Result<SessionRead> {
    let text = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&text);

    let mut read = SessionRead::default();
    for (idx, line) in text.lines().enumerate() {
        read.accept(path, idx + 1, line);
    }

    tracing::debug!(
        path = %path.display(),
        decoded = read.report.decoded,
        skipped = read.report.skipped,
        "read session file"
    );

    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line("   "), DecodedLine::Blank);
        assert_eq!(
            decode_line(r#"{"type":"user"}"#),
            DecodedLine::Record(Event::new(json!({"type": "user"})))
        );
        assert!(matches!(decode_line("[1,2]"), DecodedLine::Invalid(_)));
        assert!(matches!(decode_line("{\"type\":"), DecodedLine::Invalid(_)));
    }

    #[test]
    fn test_read_session_file_skips_bad_lines() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("session.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"user\"}\n\nnot json\n{\"type\":\"assistant\"}\n\"string\"\n",
        )?;

        let read = read_session_file(&path)?;
        assert_eq!(read.events.len(), 2);
        assert_eq!(
            read.report,
            ReadReport {
                decoded: 2,
                skipped: 2
            }
        );
        assert_eq!(read.events[1].tag(), Some("assistant"));
        assert_eq!(read.skipped_lines, vec![3, 5]);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_session_file(Path::new("/definitely/not/here.jsonl"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
