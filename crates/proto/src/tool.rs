use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single named remote tool invocation.
///
/// Arguments are plain JSON values keyed by the snake_case names the remote
/// tool expects. The `id` is local only and never sent over the wire; it
/// correlates log lines belonging to one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Local correlation id.
    #[serde(skip)]
    pub id: String,
    /// Remote tool name, e.g. `click_mouse`.
    pub tool_name: String,
    /// Argument mapping, serialized as a JSON object.
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Creates a call with no arguments.
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    /// Adds one argument. Values are converted through `serde_json::Value`.
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }

    /// Serializes the argument map to the JSON string the transport sends.
    pub fn arguments_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.arguments)
    }
}

/// Uniform envelope returned for every tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Remote request id; empty when the call failed before reaching the service.
    pub request_id: String,
    /// Remote success flag.
    pub success: bool,
    /// Uninterpreted payload; JSON or plain text depending on the tool.
    pub data: String,
    /// Remote or transport error text.
    pub error_message: String,
}

impl ToolResult {
    /// Creates a successful envelope.
    pub fn success(request_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            data: data.into(),
            error_message: String::new(),
        }
    }

    /// Creates a remote failure envelope.
    pub fn failure(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            data: String::new(),
            error_message: error_message.into(),
        }
    }

    /// Creates a failure envelope for an error raised before any remote reply.
    pub fn local_failure(error: &crate::ToolError) -> Self {
        Self::failure("", error.to_string())
    }
}
