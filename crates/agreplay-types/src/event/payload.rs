use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInputPayload {
    /// User input text, verbatim
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCommandPayload {
    /// Captured output of a locally executed command, markers stripped
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantTextPayload {
    /// Response-correlation id shared by all blocks of one model response
    pub group: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPayload {
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationPayload {
    pub group: Option<String>,
    /// Provider-assigned invocation id, referenced later by results and progress
    pub id: String,
    pub name: String,
    /// Tool parameters as sent by the model
    pub params: Value,
}

/// One `tool_result` block inside a user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultBlock {
    pub tool_use_id: String,
    /// Raw result content: string, array of blocks, or null
    pub content: Value,
    #[serde(default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultPayload {
    pub blocks: Vec<ToolResultBlock>,
    /// Final text of a delegated sub-agent, when the record carries one
    pub delegated_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnTimingPayload {
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    /// Invocation id this update belongs to
    pub parent_id: Option<String>,
    pub update: ProgressUpdate,
}

/// The six progress variants a running tool can report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressUpdate {
    /// Accumulated shell output so far
    ShellOutput { output: String },
    Hook { name: String },
    SubAgent,
    SearchQueryStarted { query: String },
    SearchResultsReceived { count: u64 },
    TaskWaiting { description: String },
}
