use serde_json::Value;

use crate::text::{ELLIPSIS, truncate_chars};

/// Longest label shown next to a tool name, ellipsis included
pub const MAX_LABEL_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    /// Field value, cut to `MAX_LABEL_CHARS`
    Truncate,
    /// Final path segment of a file path
    Basename,
    /// Fixed text, no field lookup
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct ToolRule {
    tool: &'static str,
    field: &'static str,
    fallback: Option<&'static str>,
    transform: Transform,
}

const fn rule(tool: &'static str, field: &'static str, transform: Transform) -> ToolRule {
    ToolRule {
        tool,
        field,
        fallback: None,
        transform,
    }
}

const fn rule_or(
    tool: &'static str,
    field: &'static str,
    fallback: &'static str,
    transform: Transform,
) -> ToolRule {
    ToolRule {
        tool,
        field,
        fallback: Some(fallback),
        transform,
    }
}

const fn literal(tool: &'static str, label: &'static str) -> ToolRule {
    rule(tool, "", Transform::Literal(label))
}

// New tools are added here, not as new branches.
const RULES: &[ToolRule] = &[
    rule_or("Bash", "description", "command", Transform::Truncate),
    rule_or("Read", "file_path", "notebook_path", Transform::Basename),
    rule_or("Write", "file_path", "notebook_path", Transform::Basename),
    rule_or("Edit", "file_path", "notebook_path", Transform::Basename),
    rule_or("MultiEdit", "file_path", "notebook_path", Transform::Basename),
    rule_or("NotebookEdit", "file_path", "notebook_path", Transform::Basename),
    rule("Glob", "pattern", Transform::Truncate),
    rule("Grep", "pattern", Transform::Truncate),
    rule_or("Task", "description", "prompt", Transform::Truncate),
    rule_or("Agent", "description", "prompt", Transform::Truncate),
    rule("WebFetch", "url", Transform::Truncate),
    rule("WebSearch", "query", Transform::Truncate),
    rule("BashOutput", "bash_id", Transform::Truncate),
    rule("KillShell", "shell_id", Transform::Truncate),
    rule_or("Skill", "skill", "command", Transform::Truncate),
    rule("SlashCommand", "command", Transform::Truncate),
    literal("TodoWrite", "todos"),
    literal("ExitPlanMode", "plan"),
    literal("EnterPlanMode", "plan"),
    literal("AskUserQuestion", "question"),
];

/// Short display label for a tool invocation.
///
/// Unknown tools get a bare ellipsis; a known tool whose expected field is
/// missing falls back to its own name.
pub fn abbreviate(tool_name: &str, params: &Value) -> String {
    let Some(rule) = RULES.iter().find(|r| r.tool == tool_name) else {
        return ELLIPSIS.to_string();
    };

    let label = match rule.transform {
        Transform::Literal(label) => Some(label.to_string()),
        Transform::Truncate => rule
            .lookup(params)
            .map(|value| truncate_chars(&single_line(&value), MAX_LABEL_CHARS)),
        Transform::Basename => rule.lookup(params).and_then(|value| basename(&value)),
    };

    label.unwrap_or_else(|| tool_name.to_string())
}

impl ToolRule {
    fn lookup(&self, params: &Value) -> Option<String> {
        std::iter::once(self.field)
            .chain(self.fallback)
            .filter_map(|key| params.get(key))
            .find_map(format_value)
    }
}

fn format_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn basename(path: &str) -> Option<String> {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
