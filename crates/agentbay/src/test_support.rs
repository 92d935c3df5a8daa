//! Scripted [`ApiClient`] for client and session tests.

use std::sync::Mutex;

use api::{
    ApiClient, ApiResponse, CallMcpToolData, CallMcpToolRequest, ContextData,
    CreateMcpSessionData, CreateMcpSessionRequest, DeleteContextRequest, GetContextRequest,
    GetLabelData, GetLabelRequest, ListContextsRequest, ListSessionData, ListSessionRequest,
    ModifyContextRequest, ReleaseMcpSessionRequest, SetLabelRequest,
};
use async_trait::async_trait;
use proto::ApiError;
use serde_json::Value;

fn envelope<T>(request_id: &str, data: Option<T>) -> ApiResponse<T> {
    ApiResponse {
        code: None,
        data,
        http_status_code: Some(200),
        message: None,
        request_id: Some(request_id.to_string()),
        success: Some(true),
        next_token: None,
        max_results: None,
        total_count: None,
    }
}

fn paged<T>(request_id: &str, data: Option<T>, page: Option<&Page>) -> ApiResponse<T> {
    let mut resp = envelope(request_id, data);
    if let Some(page) = page {
        resp.next_token = Some(page.next_token.clone());
        resp.max_results = Some(page.max_results);
        resp.total_count = Some(page.total_count);
    }
    resp
}

#[derive(Clone)]
struct Page {
    next_token: String,
    max_results: u32,
    total_count: u32,
}

#[derive(Default)]
pub(crate) struct MockApiClient {
    created_session_id: Option<String>,
    listed_json: Option<String>,
    labels_json: Option<String>,
    tool_reply: Option<(String, String)>,
    release_fails: bool,
    page: Option<Page>,
    contexts_json: Option<String>,
    resolved_context_id: Option<String>,
    context_call_fails: bool,

    create_requests: Mutex<Vec<CreateMcpSessionRequest>>,
    release_requests: Mutex<Vec<ReleaseMcpSessionRequest>>,
    tool_requests: Mutex<Vec<CallMcpToolRequest>>,
    list_requests: Mutex<Vec<ListSessionRequest>>,
    set_label_requests: Mutex<Vec<SetLabelRequest>>,
    list_context_requests: Mutex<Vec<ListContextsRequest>>,
    get_context_requests: Mutex<Vec<GetContextRequest>>,
    modify_context_requests: Mutex<Vec<ModifyContextRequest>>,
    delete_context_requests: Mutex<Vec<DeleteContextRequest>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_created_session(mut self, session_id: &str) -> Self {
        self.created_session_id = Some(session_id.to_string());
        self
    }

    /// `ListSession` data as raw JSON (array or object).
    pub fn with_listed(mut self, data_json: &str) -> Self {
        self.listed_json = Some(data_json.to_string());
        self
    }

    /// `GetLabel` labels string.
    pub fn with_labels(mut self, labels_json: &str) -> Self {
        self.labels_json = Some(labels_json.to_string());
        self
    }

    pub fn with_tool_text(mut self, request_id: &str, text: &str) -> Self {
        self.tool_reply = Some((request_id.to_string(), text.to_string()));
        self
    }

    pub fn failing_release(mut self) -> Self {
        self.release_fails = true;
        self
    }

    /// Page counters attached to list replies.
    pub fn with_page(mut self, next_token: &str, max_results: u32, total_count: u32) -> Self {
        self.page = Some(Page {
            next_token: next_token.to_string(),
            max_results,
            total_count,
        });
        self
    }

    /// `ListContexts` data as a raw JSON array.
    pub fn with_contexts(mut self, data_json: &str) -> Self {
        self.contexts_json = Some(data_json.to_string());
        self
    }

    /// Id returned by `GetContext`.
    pub fn with_resolved_context(mut self, context_id: &str) -> Self {
        self.resolved_context_id = Some(context_id.to_string());
        self
    }

    /// Every context action answers with `Success: false`.
    pub fn failing_contexts(mut self) -> Self {
        self.context_call_fails = true;
        self
    }

    pub fn create_requests(&self) -> Vec<CreateMcpSessionRequest> {
        self.create_requests.lock().unwrap().clone()
    }

    pub fn release_requests(&self) -> Vec<ReleaseMcpSessionRequest> {
        self.release_requests.lock().unwrap().clone()
    }

    pub fn tool_requests(&self) -> Vec<CallMcpToolRequest> {
        self.tool_requests.lock().unwrap().clone()
    }

    pub fn list_requests(&self) -> Vec<ListSessionRequest> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn set_label_requests(&self) -> Vec<SetLabelRequest> {
        self.set_label_requests.lock().unwrap().clone()
    }

    pub fn list_context_requests(&self) -> Vec<ListContextsRequest> {
        self.list_context_requests.lock().unwrap().clone()
    }

    pub fn get_context_requests(&self) -> Vec<GetContextRequest> {
        self.get_context_requests.lock().unwrap().clone()
    }

    pub fn modify_context_requests(&self) -> Vec<ModifyContextRequest> {
        self.modify_context_requests.lock().unwrap().clone()
    }

    pub fn delete_context_requests(&self) -> Vec<DeleteContextRequest> {
        self.delete_context_requests.lock().unwrap().clone()
    }

    fn context_reply<T>(&self, request_id: &str, data: Option<T>) -> ApiResponse<T> {
        let mut resp = paged(request_id, data, self.page.as_ref());
        if self.context_call_fails {
            resp.success = Some(false);
            resp.code = Some("InvalidContext.NotFound".to_string());
            resp.message = Some("context not found".to_string());
        }
        resp
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn create_mcp_session(
        &self,
        req: CreateMcpSessionRequest,
    ) -> Result<ApiResponse<CreateMcpSessionData>, ApiError> {
        self.create_requests.lock().unwrap().push(req);
        let data = CreateMcpSessionData {
            session_id: self.created_session_id.clone(),
            resource_url: Some("https://resource.example/s".to_string()),
            success: Some(true),
            ..Default::default()
        };
        Ok(envelope("req-create", Some(data)))
    }

    async fn release_mcp_session(
        &self,
        req: ReleaseMcpSessionRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.release_requests.lock().unwrap().push(req);
        if self.release_fails {
            return Err(ApiError::Http("connection reset".to_string()));
        }
        Ok(envelope("req-release", None))
    }

    async fn call_mcp_tool(
        &self,
        req: CallMcpToolRequest,
    ) -> Result<ApiResponse<CallMcpToolData>, ApiError> {
        self.tool_requests.lock().unwrap().push(req);
        let Some((request_id, text)) = &self.tool_reply else {
            return Err(ApiError::Http("no scripted reply".to_string()));
        };
        let data: CallMcpToolData = serde_json::from_value(serde_json::json!({
            "content": [{"type": "text", "text": text}],
            "isError": false
        }))
        .expect("valid tool data");
        Ok(envelope(request_id, Some(data)))
    }

    async fn list_session(
        &self,
        req: ListSessionRequest,
    ) -> Result<ApiResponse<ListSessionData>, ApiError> {
        self.list_requests.lock().unwrap().push(req);
        let data = self
            .listed_json
            .as_deref()
            .map(|json| serde_json::from_str(json).expect("valid list data"));
        Ok(paged("req-list", data, self.page.as_ref()))
    }

    async fn set_label(&self, req: SetLabelRequest) -> Result<ApiResponse<Value>, ApiError> {
        self.set_label_requests.lock().unwrap().push(req);
        Ok(envelope("req-set-label", None))
    }

    async fn get_label(
        &self,
        _req: GetLabelRequest,
    ) -> Result<ApiResponse<GetLabelData>, ApiError> {
        let data = GetLabelData {
            labels: self.labels_json.clone(),
        };
        Ok(envelope("req-get-label", Some(data)))
    }

    async fn list_contexts(
        &self,
        req: ListContextsRequest,
    ) -> Result<ApiResponse<Vec<ContextData>>, ApiError> {
        self.list_context_requests.lock().unwrap().push(req);
        let data = self
            .contexts_json
            .as_deref()
            .map(|json| serde_json::from_str(json).expect("valid context list"));
        Ok(self.context_reply("req-list-contexts", data))
    }

    async fn get_context(
        &self,
        req: GetContextRequest,
    ) -> Result<ApiResponse<ContextData>, ApiError> {
        self.get_context_requests.lock().unwrap().push(req);
        let data = ContextData {
            id: self.resolved_context_id.clone(),
            ..Default::default()
        };
        Ok(self.context_reply("req-get-context", Some(data)))
    }

    async fn modify_context(
        &self,
        req: ModifyContextRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.modify_context_requests.lock().unwrap().push(req);
        Ok(self.context_reply("req-modify-context", None))
    }

    async fn delete_context(
        &self,
        req: DeleteContextRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.delete_context_requests.lock().unwrap().push(req);
        Ok(self.context_reply("req-delete-context", None))
    }
}
