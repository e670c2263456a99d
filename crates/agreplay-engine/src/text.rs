//! Character-based truncation shared by the abbreviator and dispatcher.

pub const ELLIPSIS: &str = "…";

/// Shown in place of an empty tool result or command output
pub const NO_OUTPUT: &str = "(No output)";

/// Truncate to at most `max_chars` characters, the last one being an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}{}", kept, ELLIPSIS)
}

/// Keep `max_lines` lines; longer text keeps `max_lines - 1` lines plus an ellipsis line.
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max_lines {
        return text.to_string();
    }
    let mut kept = lines[..max_lines.saturating_sub(1)].to_vec();
    kept.push(ELLIPSIS);
    kept.join("\n")
}

/// Last line with visible content, trimmed
pub fn last_non_blank_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

/// Text with trailing whitespace removed, or the no-output marker when nothing is left
pub fn or_no_output(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.trim_start().is_empty() {
        NO_OUTPUT.to_string()
    } else {
        trimmed.to_string()
    }
}
