//! In-crate test doubles for sessions and the API transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use api::{
    ApiClient, ApiResponse, CallMcpToolData, CallMcpToolRequest, ContextData,
    CreateMcpSessionData, CreateMcpSessionRequest, DeleteContextRequest, GetContextRequest,
    GetLabelData, GetLabelRequest, ListContextsRequest, ListSessionData, ListSessionRequest,
    ModifyContextRequest, ReleaseMcpSessionRequest, SetLabelRequest,
};
use async_trait::async_trait;
use proto::{ApiError, ToolResult};
use serde_json::Value;

use crate::McpSession;

/// One call observed by [`MockSession`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub name: String,
    pub args: Value,
}

/// Session double that records calls and replays scripted outcomes in order.
pub(crate) struct MockSession {
    replies: Mutex<VecDeque<Result<ToolResult, ApiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    client: Arc<ScriptedApiClient>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            client: Arc::new(ScriptedApiClient::default()),
        }
    }

    /// Queues a remote envelope.
    pub fn reply(self, result: ToolResult) -> Self {
        self.replies.lock().unwrap().push_back(Ok(result));
        self
    }

    /// Queues a transport failure.
    pub fn fail(self, error: ApiError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl McpSession for MockSession {
    fn api_key(&self) -> &str {
        "test-key"
    }

    fn client(&self) -> Arc<dyn ApiClient> {
        self.client.clone()
    }

    fn session_id(&self) -> &str {
        "session-test"
    }

    async fn call_mcp_tool(&self, name: &str, args: String) -> Result<ToolResult, ApiError> {
        let args: Value = serde_json::from_str(&args).expect("invoker sends JSON arguments");
        self.calls.lock().unwrap().push(RecordedCall {
            name: name.to_string(),
            args,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Http("no scripted reply".to_string())))
    }
}

/// Transport double; only `CallMcpTool` is scripted, other actions reply empty.
#[derive(Default)]
pub(crate) struct ScriptedApiClient {
    tool_reply: Option<String>,
    tool_requests: Mutex<Vec<CallMcpToolRequest>>,
}

impl ScriptedApiClient {
    pub fn with_tool_reply(envelope_json: &str) -> Self {
        Self {
            tool_reply: Some(envelope_json.to_string()),
            tool_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn tool_requests(&self) -> Vec<CallMcpToolRequest> {
        self.tool_requests.lock().unwrap().clone()
    }
}

fn empty<T>() -> Result<ApiResponse<T>, ApiError> {
    Ok(ApiResponse {
        code: None,
        data: None,
        http_status_code: Some(200),
        message: None,
        request_id: Some("req-empty".to_string()),
        success: Some(true),
        next_token: None,
        max_results: None,
        total_count: None,
    })
}

#[async_trait]
impl ApiClient for ScriptedApiClient {
    async fn create_mcp_session(
        &self,
        _req: CreateMcpSessionRequest,
    ) -> Result<ApiResponse<CreateMcpSessionData>, ApiError> {
        empty()
    }

    async fn release_mcp_session(
        &self,
        _req: ReleaseMcpSessionRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        empty()
    }

    async fn call_mcp_tool(
        &self,
        req: CallMcpToolRequest,
    ) -> Result<ApiResponse<CallMcpToolData>, ApiError> {
        self.tool_requests.lock().unwrap().push(req);
        match &self.tool_reply {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| ApiError::InvalidResponse(e.to_string())),
            None => Err(ApiError::Http("no scripted reply".to_string())),
        }
    }

    async fn list_session(
        &self,
        _req: ListSessionRequest,
    ) -> Result<ApiResponse<ListSessionData>, ApiError> {
        empty()
    }

    async fn set_label(&self, _req: SetLabelRequest) -> Result<ApiResponse<Value>, ApiError> {
        empty()
    }

    async fn get_label(
        &self,
        _req: GetLabelRequest,
    ) -> Result<ApiResponse<GetLabelData>, ApiError> {
        empty()
    }

    async fn list_contexts(
        &self,
        _req: ListContextsRequest,
    ) -> Result<ApiResponse<Vec<ContextData>>, ApiError> {
        empty()
    }

    async fn get_context(
        &self,
        _req: GetContextRequest,
    ) -> Result<ApiResponse<ContextData>, ApiError> {
        empty()
    }

    async fn modify_context(
        &self,
        _req: ModifyContextRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        empty()
    }

    async fn delete_context(
        &self,
        _req: DeleteContextRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        empty()
    }
}

/// Session that relies on the provided `call_mcp_tool` dispatch.
pub(crate) struct ClientSession {
    api_key: String,
    session_id: String,
    client: Arc<ScriptedApiClient>,
}

impl ClientSession {
    pub fn new(api_key: &str, session_id: &str, client: Arc<ScriptedApiClient>) -> Self {
        Self {
            api_key: api_key.to_string(),
            session_id: session_id.to_string(),
            client,
        }
    }
}

impl McpSession for ClientSession {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn client(&self) -> Arc<dyn ApiClient> {
        self.client.clone()
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}
