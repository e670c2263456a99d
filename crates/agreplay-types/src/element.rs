use serde::{Deserialize, Serialize};

/// One block of the rendered transcript.
///
/// Only `ToolInvocation` is mutated after it is appended; every other
/// variant is immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedElement {
    UserMessage {
        text: String,
    },
    AssistantText {
        text: String,
        group: Option<String>,
    },
    ToolInvocation(ToolInvocation),
    ReasoningMarker {
        group: Option<String>,
    },
    TurnTiming {
        duration_ms: u64,
    },
    PlainOutput {
        text: String,
    },
}

impl RenderedElement {
    /// Response group this element belongs to, if any
    pub fn group(&self) -> Option<&str> {
        match self {
            RenderedElement::AssistantText { group, .. }
            | RenderedElement::ReasoningMarker { group } => group.as_deref(),
            RenderedElement::ToolInvocation(invocation) => invocation.group.as_deref(),
            RenderedElement::UserMessage { .. }
            | RenderedElement::TurnTiming { .. }
            | RenderedElement::PlainOutput { .. } => None,
        }
    }

    /// True when both elements share the same non-null response group
    pub fn continues(&self, previous: &RenderedElement) -> bool {
        match (previous.group(), self.group()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A tool call and everything later learned about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub id: String,
    /// Abbreviated parameter label shown next to the tool name
    pub label: String,
    pub group: Option<String>,
    /// Latest progress text; kept after a result arrives but no longer shown
    pub progress: Option<String>,
    pub result: Option<String>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolInvocation {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        label: impl Into<String>,
        group: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            label: label.into(),
            group,
            progress: None,
            result: None,
            is_error: false,
        }
    }

    /// Text of the secondary line: the result if set, else the progress
    pub fn status_line(&self) -> Option<&str> {
        self.result.as_deref().or(self.progress.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(group: Option<&str>) -> RenderedElement {
        RenderedElement::AssistantText {
            text: "hi".to_string(),
            group: group.map(str::to_string),
        }
    }

    #[test]
    fn test_continues_requires_equal_non_null_groups() {
        assert!(assistant(Some("r1")).continues(&assistant(Some("r1"))));
        assert!(!assistant(Some("r1")).continues(&assistant(Some("r2"))));
        assert!(!assistant(None).continues(&assistant(None)));
        assert!(!assistant(Some("r1")).continues(&RenderedElement::PlainOutput {
            text: "x".to_string()
        }));
    }

    #[test]
    fn test_result_dominates_progress() {
        let mut invocation = ToolInvocation::new("Bash", "t1", "ls", None);
        assert_eq!(invocation.status_line(), None);

        invocation.result = Some("done".to_string());
        invocation.progress = Some("step 1".to_string());
        assert_eq!(invocation.status_line(), Some("done"));
    }
}
