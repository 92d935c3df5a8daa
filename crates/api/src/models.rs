//! Request and response shapes of the AgentBay OpenAPI actions.

use proto::{ApiError, ToolResult};
use serde::{Deserialize, Deserializer, Serialize};

// ── Envelope ───────────────────────────────────────────────────────────────────

/// Response envelope shared by every action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<T> {
    /// Service-level status code, e.g. `ok` or an error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Action-specific payload.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// HTTP status echoed by the service.
    #[serde(default)]
    pub http_status_code: Option<u16>,
    /// Human-readable message, set on failure.
    #[serde(default)]
    pub message: Option<String>,
    /// Request id for correlation with service logs.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Service-level success flag.
    #[serde(default)]
    pub success: Option<bool>,
    /// Cursor for the next page of a list action; empty on the last page.
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub max_results: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_count: Option<u32>,
}

/// Page counters arrive either as numbers or as numeric strings.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Count::Number(n)) => Ok(Some(n)),
        Some(Count::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Count::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl<T> ApiResponse<T> {
    /// Request id, or an empty string when the service omitted it.
    pub fn request_id(&self) -> String {
        self.request_id.clone().unwrap_or_default()
    }

    /// A missing `Success` flag is treated as success; HTTP status was already checked.
    pub fn is_success(&self) -> bool {
        self.success != Some(false)
    }

    /// Best available failure text.
    pub fn error_text(&self) -> String {
        match (&self.message, &self.code) {
            (Some(message), _) if !message.is_empty() => message.clone(),
            (_, Some(code)) if !code.is_empty() => code.clone(),
            _ => "unknown error".to_string(),
        }
    }
}

/// One action of the OpenAPI surface; serialized as form parameters.
pub trait ApiRequest: Serialize + Send + Sync {
    /// `Action` query parameter.
    const ACTION: &'static str;
}

// ── CreateMcpSession ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMcpSessionRequest {
    pub authorization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    /// Labels as a JSON object string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Extra configs as a JSON object string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_configs: Option<String>,
}

impl ApiRequest for CreateMcpSessionRequest {
    const ACTION: &'static str = "CreateMcpSession";
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMcpSessionData {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub resource_url: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub app_instance_id: Option<String>,
    #[serde(default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

// ── ReleaseMcpSession ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseMcpSessionRequest {
    pub authorization: String,
    pub session_id: String,
}

impl ApiRequest for ReleaseMcpSessionRequest {
    const ACTION: &'static str = "ReleaseMcpSession";
}

// ── CallMcpTool ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallMcpToolRequest {
    pub authorization: String,
    pub session_id: String,
    /// Tool name.
    pub name: String,
    /// Arguments as a JSON object string.
    pub args: String,
}

impl ApiRequest for CallMcpToolRequest {
    const ACTION: &'static str = "CallMcpTool";
}

/// MCP tool output as returned inside `Data`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMcpToolData {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentItem {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ApiResponse<CallMcpToolData> {
    /// Converts the envelope into a [`ToolResult`].
    ///
    /// A missing `Data` object is a malformed reply and is reported as
    /// [`ApiError::MissingData`], which still carries the request id.
    pub fn into_tool_result(self) -> Result<ToolResult, ApiError> {
        let request_id = self.request_id();
        if !self.is_success() {
            return Ok(ToolResult::failure(request_id, self.error_text()));
        }

        let Some(data) = self.data else {
            return Err(ApiError::MissingData { request_id });
        };

        if data.is_error {
            let message = data
                .content
                .iter()
                .map(|item| item.text.as_deref().unwrap_or("Unknown error"))
                .collect::<Vec<_>>()
                .join("; ");
            return Ok(ToolResult::failure(request_id, message));
        }

        let text = data
            .content
            .into_iter()
            .next()
            .and_then(|item| item.text)
            .unwrap_or_default();
        Ok(ToolResult::success(request_id, text))
    }
}

// ── ListSession ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListSessionRequest {
    pub authorization: String,
    /// Label filter as a JSON object string.
    pub labels: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ApiRequest for ListSessionRequest {
    const ACTION: &'static str = "ListSession";
}

/// One entry of a `ListSession` reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionSummary {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Set on the single-object form when the listing itself failed.
    #[serde(default)]
    pub is_error: bool,
}

/// `ListSession` returns either an array of sessions or a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListSessionData {
    Many(Vec<SessionSummary>),
    One(SessionSummary),
}

impl ListSessionData {
    /// True when the service flagged the listing as failed inside `Data`.
    pub fn is_error(&self) -> bool {
        matches!(self, ListSessionData::One(item) if item.is_error)
    }

    /// Non-empty session ids in reply order.
    pub fn session_ids(&self) -> Vec<String> {
        let summaries: Vec<&SessionSummary> = match self {
            ListSessionData::Many(items) => items.iter().collect(),
            ListSessionData::One(item) => vec![item],
        };
        summaries
            .into_iter()
            .filter_map(|s| s.session_id.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

// ── SetLabel / GetLabel ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetLabelRequest {
    pub authorization: String,
    pub session_id: String,
    /// Labels as a JSON object string.
    pub labels: String,
}

impl ApiRequest for SetLabelRequest {
    const ACTION: &'static str = "SetLabel";
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLabelRequest {
    pub authorization: String,
    pub session_id: String,
}

impl ApiRequest for GetLabelRequest {
    const ACTION: &'static str = "GetLabel";
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetLabelData {
    /// Labels as a JSON object string.
    #[serde(default)]
    pub labels: Option<String>,
}

// ── Contexts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListContextsRequest {
    pub authorization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ApiRequest for ListContextsRequest {
    const ACTION: &'static str = "ListContexts";
}

/// A persistent context as returned by `ListContexts` and `GetContext`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContextData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub last_used_time: Option<String>,
    #[serde(default)]
    pub os_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetContextRequest {
    pub authorization: String,
    pub name: String,
    /// Create the context when no context with `name` exists.
    pub allow_create: bool,
}

impl ApiRequest for GetContextRequest {
    const ACTION: &'static str = "GetContext";
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyContextRequest {
    pub authorization: String,
    pub id: String,
    pub name: String,
}

impl ApiRequest for ModifyContextRequest {
    const ACTION: &'static str = "ModifyContext";
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteContextRequest {
    pub authorization: String,
    pub id: String,
}

impl ApiRequest for DeleteContextRequest {
    const ACTION: &'static str = "DeleteContext";
}
