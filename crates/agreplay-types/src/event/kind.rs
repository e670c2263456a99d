use serde::{Deserialize, Serialize};

use super::payload::*;

/// Semantic kind of one event, as decided by the classifier.
///
/// Closed on purpose: adding a variant breaks every exhaustive `match` in the
/// dispatcher and formatter until they handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EventKind {
    // User-originated
    PlainInput(UserInputPayload),
    ToolResult(ToolResultPayload),
    LocalCommandOutput(LocalCommandPayload),

    // Model-originated
    AssistantText(AssistantTextPayload),
    ToolInvocationRequested(ToolInvocationPayload),
    ReasoningBlock(ReasoningPayload),

    // System
    TurnTiming(TurnTimingPayload),
    CompactionBoundary,

    /// Progress report for a running tool invocation
    Progress(ProgressPayload),

    /// Produces no transcript output
    Invisible(Invisibility),
}

/// Why an event was classified as invisible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invisibility {
    /// Internal event of a collapsed sub-conversation
    Sidechain,
    /// Injected message (expanded command template and the like)
    Synthetic,
    /// File snapshots, queue records, summaries, link announcements
    Bookkeeping,
    /// Shape or sub-tag not recognized
    Unrecognized,
}

impl EventKind {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::PlainInput(_) => "plain_input",
            EventKind::ToolResult(_) => "tool_result",
            EventKind::LocalCommandOutput(_) => "local_command_output",
            EventKind::AssistantText(_) => "assistant_text",
            EventKind::ToolInvocationRequested(_) => "tool_invocation_requested",
            EventKind::ReasoningBlock(_) => "reasoning_block",
            EventKind::TurnTiming(_) => "turn_timing",
            EventKind::CompactionBoundary => "compaction_boundary",
            EventKind::Progress(p) => match p.update {
                ProgressUpdate::ShellOutput { .. } => "shell_output_progress",
                ProgressUpdate::Hook { .. } => "hook_progress",
                ProgressUpdate::SubAgent => "sub_agent_progress",
                ProgressUpdate::SearchQueryStarted { .. } => "search_query_started",
                ProgressUpdate::SearchResultsReceived { .. } => "search_results_received",
                ProgressUpdate::TaskWaiting { .. } => "task_waiting",
            },
            EventKind::Invisible(_) => "invisible",
        }
    }
}
