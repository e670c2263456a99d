use agreplay_types::*;
use serde_json::Value;

use crate::abbreviate::abbreviate;
use crate::classifier::{classify, join_text_blocks};
use crate::state::ReplayState;
use crate::text::{last_non_blank_line, or_no_output, truncate_chars, truncate_lines};

/// Lines kept from a tool result before it is cut
pub const MAX_RESULT_LINES: usize = 5;

/// Characters kept from the final text of a delegated sub-agent
pub const MAX_DELEGATED_CHARS: usize = 80;

/// Characters kept from the latest line of shell output
pub const MAX_SHELL_PROGRESS_CHARS: usize = 76;

/// Tool names whose invocations run a delegated sub-agent
const DELEGATING_TOOLS: &[&str] = &["Task", "Agent"];

const SUB_AGENT_PROGRESS: &str = "agent running…";

/// Fold one event into the state, in place.
pub fn apply<'a>(state: &'a mut ReplayState, event: &Event) -> &'a mut ReplayState {
    apply_kind(state, classify(event))
}

/// Fold an already classified event into the state.
pub fn apply_kind(state: &mut ReplayState, kind: EventKind) -> &mut ReplayState {
    tracing::trace!(kind = kind.name(), elements = state.len(), "applying event");

    match kind {
        EventKind::PlainInput(input) => {
            state.push(RenderedElement::UserMessage { text: input.text });
            state.close_group();
        }

        EventKind::LocalCommandOutput(output) => {
            state.push(RenderedElement::PlainOutput {
                text: or_no_output(&output.text),
            });
            state.close_group();
        }

        EventKind::AssistantText(message) => {
            state.set_open_group(message.group.clone());
            state.push(RenderedElement::AssistantText {
                text: message.text,
                group: message.group,
            });
        }

        EventKind::ReasoningBlock(reasoning) => {
            state.set_open_group(reasoning.group.clone());
            state.push(RenderedElement::ReasoningMarker {
                group: reasoning.group,
            });
        }

        EventKind::ToolInvocationRequested(call) => {
            let label = abbreviate(&call.name, &call.params);
            state.set_open_group(call.group.clone());
            state.push_invocation(ToolInvocation::new(call.name, call.id, label, call.group));
        }

        EventKind::ToolResult(result) => {
            for block in result.blocks {
                resolve_result(state, block, result.delegated_text.as_deref());
            }
            state.close_group();
        }

        EventKind::Progress(progress) => apply_progress(state, progress),

        EventKind::TurnTiming(timing) => {
            state.push(RenderedElement::TurnTiming {
                duration_ms: timing.duration_ms,
            });
            state.close_group();
        }

        EventKind::CompactionBoundary => {
            tracing::debug!(
                discarded = state.len(),
                epoch = state.epoch() + 1,
                "compaction boundary, starting new epoch"
            );
            state.reset();
        }

        EventKind::Invisible(_) => {}
    }

    state
}

fn resolve_result(state: &mut ReplayState, block: ToolResultBlock, delegated_text: Option<&str>) {
    let content = normalize_result_content(&block.content);

    if let Some(invocation) = state.invocation_mut(&block.tool_use_id) {
        let text = match delegated_text {
            Some(nested) if DELEGATING_TOOLS.contains(&invocation.name.as_str()) => {
                truncate_chars(nested.trim(), MAX_DELEGATED_CHARS)
            }
            _ => truncate_lines(&content, MAX_RESULT_LINES),
        };
        invocation.result = Some(text);
        invocation.is_error = block.is_error;
        return;
    }

    tracing::debug!(
        tool_use_id = %block.tool_use_id,
        "tool result for unknown invocation, emitting standalone output"
    );
    state.push(RenderedElement::PlainOutput { text: content });
}

fn apply_progress(state: &mut ReplayState, progress: ProgressPayload) {
    if let Some(parent_id) = progress.parent_id.as_deref()
        && let Some(invocation) = state.invocation_mut(parent_id)
    {
        // Shell output with nothing printed yet leaves the previous line in place
        if let Some(text) = progress_text(&progress.update) {
            invocation.progress = Some(text);
        }
        return;
    }

    match progress.update {
        ProgressUpdate::TaskWaiting { .. } => {
            if let Some(text) = progress_text(&progress.update) {
                state.push(RenderedElement::PlainOutput { text });
            }
        }
        _ => {
            tracing::trace!(
                parent_id = progress.parent_id.as_deref().unwrap_or(""),
                "dropping progress for unknown invocation"
            );
        }
    }
}

/// Display text for one progress update
fn progress_text(update: &ProgressUpdate) -> Option<String> {
    match update {
        ProgressUpdate::ShellOutput { output } => last_non_blank_line(output)
            .map(|line| truncate_chars(line, MAX_SHELL_PROGRESS_CHARS)),
        ProgressUpdate::Hook { name } => Some(format!("hook: {}", name)),
        ProgressUpdate::SubAgent => Some(SUB_AGENT_PROGRESS.to_string()),
        ProgressUpdate::SearchQueryStarted { query } => Some(format!("searching: {}", query)),
        ProgressUpdate::SearchResultsReceived { count } => Some(format!("{} results", count)),
        ProgressUpdate::TaskWaiting { description } => Some(format!("waiting: {}", description)),
    }
}

/// Plain string as-is, text blocks of an array concatenated, anything empty as the no-output marker
fn normalize_result_content(content: &Value) -> String {
    match content {
        Value::String(text) => or_no_output(text),
        Value::Array(blocks) => or_no_output(&join_text_blocks(blocks)),
        _ => or_no_output(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::NO_OUTPUT;
    use serde_json::json;

    fn invocation(state: &mut ReplayState, id: &str, name: &str, group: Option<&str>) {
        apply_kind(
            state,
            EventKind::ToolInvocationRequested(ToolInvocationPayload {
                group: group.map(str::to_string),
                id: id.to_string(),
                name: name.to_string(),
                params: json!({}),
            }),
        );
    }

    fn result(id: &str, content: Value, delegated: Option<&str>) -> EventKind {
        EventKind::ToolResult(ToolResultPayload {
            blocks: vec![ToolResultBlock {
                tool_use_id: id.to_string(),
                content,
                is_error: false,
            }],
            delegated_text: delegated.map(str::to_string),
        })
    }

    fn progress(parent: Option<&str>, update: ProgressUpdate) -> EventKind {
        EventKind::Progress(ProgressPayload {
            parent_id: parent.map(str::to_string),
            update,
        })
    }

    #[test]
    fn test_normalize_result_content() {
        assert_eq!(normalize_result_content(&json!("a\nb")), "a\nb");
        assert_eq!(
            normalize_result_content(&json!([
                {"type": "text", "text": "one"},
                {"type": "image", "source": {}},
                {"type": "text", "text": "two"}
            ])),
            "one\ntwo"
        );
        assert_eq!(normalize_result_content(&json!(null)), NO_OUTPUT);
        assert_eq!(normalize_result_content(&json!("")), NO_OUTPUT);
        assert_eq!(normalize_result_content(&json!([])), NO_OUTPUT);
    }

    #[test]
    fn test_result_is_cut_to_five_lines() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "Bash", None);
        apply_kind(&mut state, result("t1", json!("1\n2\n3\n4\n5\n6\n7"), None));

        let tool = state.lookup("t1").unwrap();
        assert_eq!(tool.result.as_deref(), Some("1\n2\n3\n4\n…"));
    }

    #[test]
    fn test_delegated_result_prefers_nested_text() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "Task", None);
        let nested = "n".repeat(100);
        apply_kind(&mut state, result("t1", json!("generic"), Some(&nested)));

        let tool = state.lookup("t1").unwrap();
        assert_eq!(tool.result, Some(format!("{}…", "n".repeat(79))));
    }

    #[test]
    fn test_nested_text_ignored_for_non_delegating_tool() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "Bash", None);
        apply_kind(&mut state, result("t1", json!("generic"), Some("nested")));

        assert_eq!(state.lookup("t1").unwrap().result.as_deref(), Some("generic"));
    }

    #[test]
    fn test_orphan_result_becomes_plain_output() {
        let mut state = ReplayState::new();
        apply_kind(&mut state, result("ghost", json!("late"), None));

        assert_eq!(
            state.elements(),
            &[RenderedElement::PlainOutput {
                text: "late".to_string()
            }]
        );
    }

    #[test]
    fn test_error_flag_is_recorded() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "Bash", None);
        apply_kind(
            &mut state,
            EventKind::ToolResult(ToolResultPayload {
                blocks: vec![ToolResultBlock {
                    tool_use_id: "t1".to_string(),
                    content: json!("permission denied"),
                    is_error: true,
                }],
                delegated_text: None,
            }),
        );

        assert!(state.lookup("t1").unwrap().is_error);
    }

    #[test]
    fn test_shell_progress_keeps_last_line() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "Bash", None);
        apply_kind(
            &mut state,
            progress(
                Some("t1"),
                ProgressUpdate::ShellOutput {
                    output: format!("step 1\n{}\n\n", "y".repeat(90)),
                },
            ),
        );

        let expected = format!("{}…", "y".repeat(75));
        assert_eq!(state.lookup("t1").unwrap().progress, Some(expected));
    }

    #[test]
    fn test_progress_replaces_previous_value() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "WebSearch", None);
        apply_kind(
            &mut state,
            progress(
                Some("t1"),
                ProgressUpdate::SearchQueryStarted {
                    query: "rust".to_string(),
                },
            ),
        );
        apply_kind(
            &mut state,
            progress(Some("t1"), ProgressUpdate::SearchResultsReceived { count: 3 }),
        );

        assert_eq!(
            state.lookup("t1").unwrap().progress.as_deref(),
            Some("3 results")
        );
    }

    #[test]
    fn test_progress_labels() {
        assert_eq!(
            progress_text(&ProgressUpdate::Hook {
                name: "PostToolUse".to_string()
            }),
            Some("hook: PostToolUse".to_string())
        );
        assert_eq!(
            progress_text(&ProgressUpdate::SubAgent),
            Some(SUB_AGENT_PROGRESS.to_string())
        );
        assert_eq!(
            progress_text(&ProgressUpdate::TaskWaiting {
                description: "tests".to_string()
            }),
            Some("waiting: tests".to_string())
        );
        assert_eq!(
            progress_text(&ProgressUpdate::ShellOutput {
                output: " \n".to_string()
            }),
            None
        );
    }

    #[test]
    fn test_unresolved_progress_is_dropped_except_task_waiting() {
        let mut state = ReplayState::new();
        apply_kind(
            &mut state,
            progress(
                Some("ghost"),
                ProgressUpdate::ShellOutput {
                    output: "x".to_string(),
                },
            ),
        );
        assert!(state.is_empty());

        apply_kind(
            &mut state,
            progress(
                None,
                ProgressUpdate::TaskWaiting {
                    description: "background build".to_string(),
                },
            ),
        );
        assert_eq!(
            state.elements(),
            &[RenderedElement::PlainOutput {
                text: "waiting: background build".to_string()
            }]
        );
    }

    #[test]
    fn test_group_marker_follows_model_blocks() {
        let mut state = ReplayState::new();
        apply_kind(
            &mut state,
            EventKind::AssistantText(AssistantTextPayload {
                group: Some("r1".to_string()),
                text: "Hi".to_string(),
            }),
        );
        assert_eq!(state.open_group(), Some("r1"));

        invocation(&mut state, "t1", "Bash", Some("r1"));
        assert_eq!(state.open_group(), Some("r1"));

        apply_kind(&mut state, result("t1", json!("ok"), None));
        assert_eq!(state.open_group(), None);

        apply_kind(
            &mut state,
            EventKind::ReasoningBlock(ReasoningPayload {
                group: Some("r2".to_string()),
            }),
        );
        assert_eq!(state.open_group(), Some("r2"));

        apply_kind(
            &mut state,
            EventKind::TurnTiming(TurnTimingPayload { duration_ms: 10 }),
        );
        assert_eq!(state.open_group(), None);
    }

    #[test]
    fn test_compaction_forgets_invocations() {
        let mut state = ReplayState::new();
        invocation(&mut state, "t1", "Bash", Some("r1"));
        apply_kind(&mut state, EventKind::CompactionBoundary);

        assert!(state.is_empty());
        assert_eq!(state.open_group(), None);

        apply_kind(&mut state, result("t1", json!("late"), None));
        assert_eq!(
            state.elements(),
            &[RenderedElement::PlainOutput {
                text: "late".to_string()
            }]
        );
    }

    #[test]
    fn test_invisible_is_a_no_op() {
        let mut state = ReplayState::new();
        apply_kind(&mut state, EventKind::Invisible(Invisibility::Bookkeeping));
        assert!(state.is_empty());
        assert_eq!(state.epoch(), 0);
    }
}
