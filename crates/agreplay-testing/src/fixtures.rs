//! Fixtures for session log generation.
//!
//! Provides utilities to:
//! - Build individual records in the shape Claude Code writes them
//! - Assemble records into a `SessionLog` and serialize it as JSONL

use agreplay_types::Event;
use serde_json::{Value, json};

const SESSION_ID: &str = "00000000-0000-4000-8000-000000000001";
const TIMESTAMP: &str = "2025-01-01T00:00:00.000Z";

/// Builders for single records.
pub mod records {
    use super::*;

    fn envelope(kind: &str, body: Value) -> Event {
        let mut record = json!({
            "type": kind,
            "sessionId": SESSION_ID,
            "timestamp": TIMESTAMP,
            "isSidechain": false,
            "userType": "external",
            "cwd": "/work/project",
        });
        if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), body) {
            target.extend(fields);
        }
        Event::new(record)
    }

    /// Typed user input
    pub fn user_text(text: &str) -> Event {
        envelope(
            "user",
            json!({"message": {"role": "user", "content": text}}),
        )
    }

    /// Injected message (expanded command template)
    pub fn user_meta(text: &str) -> Event {
        envelope(
            "user",
            json!({"isMeta": true, "message": {"role": "user", "content": text}}),
        )
    }

    pub fn local_command_stdout(output: &str) -> Event {
        user_text(&format!(
            "<local-command-stdout>{}</local-command-stdout>",
            output
        ))
    }

    fn assistant_block(group: &str, block: Value) -> Event {
        envelope(
            "assistant",
            json!({
                "requestId": format!("req-{}", group),
                "message": {
                    "id": group,
                    "type": "message",
                    "role": "assistant",
                    "model": "claude-sonnet-4-5",
                    "content": [block]
                }
            }),
        )
    }

    pub fn assistant_text(group: &str, text: &str) -> Event {
        assistant_block(group, json!({"type": "text", "text": text}))
    }

    pub fn thinking(group: &str, text: &str) -> Event {
        assistant_block(
            group,
            json!({"type": "thinking", "thinking": text, "signature": "sig"}),
        )
    }

    pub fn tool_use(group: &str, id: &str, name: &str, input: Value) -> Event {
        assistant_block(
            group,
            json!({"type": "tool_use", "id": id, "name": name, "input": input}),
        )
    }

    fn tool_result_record(id: &str, content: Value, is_error: bool, extra: Value) -> Event {
        let mut body = json!({
            "message": {
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": id,
                    "content": content,
                    "is_error": is_error
                }]
            }
        });
        if let (Some(target), Value::Object(fields)) = (body.as_object_mut(), extra) {
            target.extend(fields);
        }
        envelope("user", body)
    }

    pub fn tool_result(id: &str, content: impl Into<Value>) -> Event {
        tool_result_record(id, content.into(), false, json!({}))
    }

    pub fn tool_error(id: &str, content: impl Into<Value>) -> Event {
        tool_result_record(id, content.into(), true, json!({}))
    }

    /// Result of a delegated sub-agent, carrying the agent's own final text
    pub fn delegated_result(id: &str, content: impl Into<Value>, agent_text: &str) -> Event {
        tool_result_record(
            id,
            content.into(),
            false,
            json!({
                "toolUseResult": {
                    "status": "completed",
                    "content": [{"type": "text", "text": agent_text}]
                }
            }),
        )
    }

    pub fn progress(parent_id: &str, data: Value) -> Event {
        envelope(
            "progress",
            json!({
                "toolUseID": format!("progress-{}", parent_id),
                "parentToolUseID": parent_id,
                "data": data
            }),
        )
    }

    pub fn bash_progress(parent_id: &str, full_output: &str) -> Event {
        progress(
            parent_id,
            json!({
                "type": "bash_progress",
                "output": full_output.lines().last().unwrap_or(""),
                "fullOutput": full_output,
                "elapsedTimeSeconds": 1,
                "totalLines": full_output.lines().count()
            }),
        )
    }

    pub fn turn_duration(duration_ms: u64) -> Event {
        envelope(
            "system",
            json!({"subtype": "turn_duration", "durationMs": duration_ms, "isMeta": false}),
        )
    }

    pub fn compact_boundary() -> Event {
        envelope(
            "system",
            json!({
                "subtype": "compact_boundary",
                "content": "Conversation compacted",
                "compactMetadata": {"trigger": "auto", "preTokens": 150000}
            }),
        )
    }

    pub fn file_history_snapshot() -> Event {
        Event::new(json!({
            "type": "file-history-snapshot",
            "messageId": "msg-snapshot",
            "snapshot": {"messageId": "msg-snapshot", "trackedFileBackups": {}},
            "isSnapshotUpdate": false
        }))
    }

    /// Mark a record as belonging to a collapsed sub-conversation
    pub fn sidechain(event: Event) -> Event {
        let mut raw = event.into_raw();
        if let Some(fields) = raw.as_object_mut() {
            fields.insert("isSidechain".to_string(), Value::Bool(true));
        }
        Event::new(raw)
    }
}

/// Ordered collection of records, written out as a session file.
///
/// # Example
/// ```
/// use agreplay_testing::{SessionLog, records};
///
/// let log = SessionLog::new()
///     .push(records::user_text("hello"))
///     .push(records::assistant_text("msg_1", "Hi!"));
/// assert_eq!(log.events().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    events: Vec<Event>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn extend(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// One JSON object per line, newline-terminated
    pub fn to_jsonl(&self) -> String {
        self.events
            .iter()
            .map(|event| format!("{}\n", event.raw()))
            .collect()
    }
}
