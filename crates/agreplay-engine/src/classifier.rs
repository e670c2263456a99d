use agreplay_types::*;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Output captured from a locally executed command, embedded in user text
static LOCAL_COMMAND_OUTPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<local-command-(?:stdout|stderr)>(.*?)(?:</local-command-(?:stdout|stderr)>|\z)",
    )
    .unwrap()
});

/// Top-level tags that never produce transcript output
const BOOKKEEPING_TAGS: &[&str] = &[
    "file-history-snapshot",
    "queue-operation",
    "summary",
    "pr-link",
];

/// Map one decoded record to its semantic kind.
///
/// Total: unrecognized or malformed shapes become `Invisible`, never errors.
pub fn classify(event: &Event) -> EventKind {
    let kind = match event.tag() {
        Some("user") => classify_user(event),
        Some("assistant") => classify_assistant(event),
        Some("system") => classify_system(event),
        Some("progress") => classify_progress(event),
        Some(tag) if BOOKKEEPING_TAGS.contains(&tag) => {
            EventKind::Invisible(Invisibility::Bookkeeping)
        }
        _ => EventKind::Invisible(Invisibility::Unrecognized),
    };

    // Collapsed sub-conversations surface only through their owning tool's result
    if event.flag("/isSidechain") && is_conversational(&kind) {
        return EventKind::Invisible(Invisibility::Sidechain);
    }

    kind
}

fn is_conversational(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::PlainInput(_)
            | EventKind::ToolResult(_)
            | EventKind::LocalCommandOutput(_)
            | EventKind::AssistantText(_)
            | EventKind::ToolInvocationRequested(_)
            | EventKind::ReasoningBlock(_)
    )
}

fn classify_user(event: &Event) -> EventKind {
    if event.flag("/isMeta") {
        return EventKind::Invisible(Invisibility::Synthetic);
    }

    match event.at("/message/content") {
        Some(Value::String(text)) => match extract_local_command_output(text) {
            Some(output) => EventKind::LocalCommandOutput(LocalCommandPayload { text: output }),
            None => EventKind::PlainInput(UserInputPayload { text: text.clone() }),
        },
        Some(Value::Array(blocks)) => {
            let results: Vec<ToolResultBlock> = blocks
                .iter()
                .filter(|block| block_type(block) == Some("tool_result"))
                .map(|block| ToolResultBlock {
                    tool_use_id: str_field(block, "tool_use_id").unwrap_or_default(),
                    content: block.get("content").cloned().unwrap_or(Value::Null),
                    is_error: block
                        .get("is_error")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                })
                .collect();

            if results.is_empty() {
                EventKind::PlainInput(UserInputPayload {
                    text: join_text_blocks(blocks),
                })
            } else {
                EventKind::ToolResult(ToolResultPayload {
                    blocks: results,
                    delegated_text: extract_delegated_text(event),
                })
            }
        }
        _ => EventKind::Invisible(Invisibility::Unrecognized),
    }
}

fn classify_assistant(event: &Event) -> EventKind {
    let group = event
        .str_at("/message/id")
        .or_else(|| event.str_at("/requestId"))
        .map(str::to_string);

    // The source writes one content block per record; extra blocks are not expected
    let Some(block) = event
        .at("/message/content")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
    else {
        return EventKind::Invisible(Invisibility::Unrecognized);
    };

    match block_type(block) {
        Some("text") => EventKind::AssistantText(AssistantTextPayload {
            group,
            text: str_field(block, "text").unwrap_or_default(),
        }),
        Some("tool_use") => EventKind::ToolInvocationRequested(ToolInvocationPayload {
            group,
            id: str_field(block, "id").unwrap_or_default(),
            name: str_field(block, "name").unwrap_or_default(),
            params: block
                .get("input")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
        }),
        Some("thinking") | Some("redacted_thinking") => {
            EventKind::ReasoningBlock(ReasoningPayload { group })
        }
        _ => EventKind::Invisible(Invisibility::Unrecognized),
    }
}

fn classify_system(event: &Event) -> EventKind {
    match event.str_at("/subtype") {
        Some("turn_duration") => EventKind::TurnTiming(TurnTimingPayload {
            duration_ms: event.u64_at("/durationMs").unwrap_or(0),
        }),
        Some("compact_boundary") => EventKind::CompactionBoundary,
        _ => EventKind::Invisible(Invisibility::Unrecognized),
    }
}

fn classify_progress(event: &Event) -> EventKind {
    let text = |pointer: &str| event.str_at(pointer).unwrap_or_default().to_string();

    let update = match event.str_at("/data/type") {
        Some("bash_progress") => ProgressUpdate::ShellOutput {
            output: event
                .str_at("/data/fullOutput")
                .or_else(|| event.str_at("/data/output"))
                .unwrap_or_default()
                .to_string(),
        },
        Some("hook_progress") => ProgressUpdate::Hook {
            name: event
                .str_at("/data/hookName")
                .or_else(|| event.str_at("/data/hookEvent"))
                .unwrap_or_default()
                .to_string(),
        },
        Some("agent_progress") => ProgressUpdate::SubAgent,
        Some("query_update") => ProgressUpdate::SearchQueryStarted {
            query: text("/data/query"),
        },
        Some("search_results_received") => ProgressUpdate::SearchResultsReceived {
            count: event.u64_at("/data/resultCount").unwrap_or(0),
        },
        Some("waiting_for_task") => ProgressUpdate::TaskWaiting {
            description: text("/data/taskDescription"),
        },
        _ => return EventKind::Invisible(Invisibility::Unrecognized),
    };

    EventKind::Progress(ProgressPayload {
        parent_id: event.str_at("/parentToolUseID").map(str::to_string),
        update,
    })
}

fn extract_local_command_output(text: &str) -> Option<String> {
    let captured: Vec<&str> = LOCAL_COMMAND_OUTPUT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if captured.is_empty() && !LOCAL_COMMAND_OUTPUT.is_match(text) {
        return None;
    }
    Some(captured.join("\n"))
}

/// Final text of a delegated sub-agent (`toolUseResult.content`)
fn extract_delegated_text(event: &Event) -> Option<String> {
    let text = match event.at("/toolUseResult/content")? {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => join_text_blocks(blocks),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Concatenate the `text` blocks of a content array, ignoring everything else
pub(crate) fn join_text_blocks(blocks: &[Value]) -> String {
    blocks
        .iter()
        .filter(|block| block_type(block) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

fn block_type(block: &Value) -> Option<&str> {
    block.get("type").and_then(Value::as_str)
}

fn str_field(block: &Value, key: &str) -> Option<String> {
    block.get(key).and_then(Value::as_str).map(str::to_string)
}
