use agreplay_types::{RenderedElement, ToolInvocation};

use crate::state::ReplayState;

pub const USER_MARKER: &str = "❯ ";
pub const ASSISTANT_MARKER: &str = "● ";
pub const CONTINUATION_INDENT: &str = "  ";
pub const RESULT_CONNECTOR: &str = "  ⎿  ";
pub const ERROR_CONNECTOR: &str = "  ✗  ";
pub const CONNECTOR_INDENT: &str = "     ";
pub const REASONING_LINE: &str = "✻ Thinking…";

/// Render the transcript folded so far.
///
/// Adjacent elements of the same response group are written flush; every
/// other pair is separated by one blank line.
pub fn render(state: &ReplayState) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous: Option<&RenderedElement> = None;

    for element in state.elements() {
        if let Some(prev) = previous
            && !element.continues(prev)
        {
            lines.push(String::new());
        }
        render_element(element, &mut lines);
        previous = Some(element);
    }

    lines.join("\n")
}

fn render_element(element: &RenderedElement, lines: &mut Vec<String>) {
    match element {
        RenderedElement::UserMessage { text } => {
            push_block(lines, USER_MARKER, CONTINUATION_INDENT, text)
        }
        RenderedElement::AssistantText { text, .. } => {
            push_block(lines, ASSISTANT_MARKER, CONTINUATION_INDENT, text)
        }
        RenderedElement::ReasoningMarker { .. } => lines.push(REASONING_LINE.to_string()),
        RenderedElement::ToolInvocation(invocation) => render_invocation(invocation, lines),
        RenderedElement::TurnTiming { duration_ms } => {
            lines.push(format!("✻ Worked for {}", format_duration(*duration_ms)))
        }
        RenderedElement::PlainOutput { text } => {
            lines.push(text.trim_end_matches(['\n', '\r']).to_string())
        }
    }
}

fn render_invocation(invocation: &ToolInvocation, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}{}({})",
        ASSISTANT_MARKER, invocation.name, invocation.label
    ));

    // A result always wins over progress, whichever arrived last
    if let Some(result) = &invocation.result {
        let connector = if invocation.is_error {
            ERROR_CONNECTOR
        } else {
            RESULT_CONNECTOR
        };
        push_block(lines, connector, CONNECTOR_INDENT, result);
    } else if let Some(progress) = &invocation.progress {
        push_block(lines, RESULT_CONNECTOR, CONNECTOR_INDENT, progress);
    }
}

/// First line after `marker`, the rest after `indent`; blank lines stay blank
fn push_block(lines: &mut Vec<String>, marker: &str, indent: &str, text: &str) {
    let mut text_lines = text.lines();

    match text_lines.next() {
        Some(first) => lines.push(format!("{}{}", marker, first).trim_end().to_string()),
        None => {
            lines.push(marker.trim_end().to_string());
            return;
        }
    }

    for line in text_lines {
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", indent, line));
        }
    }
}

/// Whole seconds below a minute, otherwise minutes and remaining seconds
pub fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    if seconds < 60 {
        format!("{}s", seconds)
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_truncates() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(60_000), "1m 0s");
        assert_eq!(format_duration(125_900), "2m 5s");
        assert_eq!(format_duration(3_725_000), "62m 5s");
    }

    #[test]
    fn test_push_block_indents_continuation_lines() {
        let mut lines = Vec::new();
        push_block(&mut lines, USER_MARKER, CONTINUATION_INDENT, "one\n\ntwo");
        assert_eq!(lines, vec!["❯ one", "", "  two"]);
    }

    #[test]
    fn test_push_block_empty_text_keeps_marker() {
        let mut lines = Vec::new();
        push_block(&mut lines, ASSISTANT_MARKER, CONTINUATION_INDENT, "");
        assert_eq!(lines, vec!["●"]);
    }

    #[test]
    fn test_empty_state_renders_empty_string() {
        assert_eq!(render(&ReplayState::new()), "");
    }
}
