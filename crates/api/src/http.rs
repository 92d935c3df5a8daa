//! reqwest-backed [`ApiClient`].

use std::time::Duration;

use async_trait::async_trait;
use proto::ApiError;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ApiClient;
use crate::models::{
    ApiRequest, ApiResponse, CallMcpToolData, CallMcpToolRequest, ContextData,
    CreateMcpSessionData, CreateMcpSessionRequest, DeleteContextRequest, GetContextRequest,
    GetLabelData, GetLabelRequest, ListContextsRequest, ListSessionData, ListSessionRequest,
    ModifyContextRequest, ReleaseMcpSessionRequest, SetLabelRequest,
};

/// OpenAPI version sent with every action.
pub const API_VERSION: &str = "2025-05-06";

/// HTTP client for the AgentBay OpenAPI endpoint.
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApiClient {
    /// Creates a client for `endpoint`. A bare host gets an `https://` scheme.
    pub fn new(endpoint: &str, timeout_ms: u64) -> Self {
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("https://{endpoint}")
        };
        Self::with_base_url(base_url, timeout_ms)
    }

    /// Creates a client targeting a full base URL (useful for proxies/tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<R, T>(&self, req: &R) -> Result<ApiResponse<T>, ApiError>
    where
        R: ApiRequest,
        T: DeserializeOwned,
    {
        let url = format!("{}/", self.base_url);
        debug!(action = R::ACTION, url = %url, "Sending AgentBay request");

        let response = self
            .client
            .post(&url)
            .query(&[("Action", R::ACTION), ("Version", API_VERSION)])
            .form(req)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let status = response.status();
        debug!(action = R::ACTION, status = %status.as_u16(), "AgentBay response received");

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        if !status.is_success() {
            let preview: String = body.chars().take(500).collect();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: preview,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Deserialization error: {e}; body: {}",
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn create_mcp_session(
        &self,
        req: CreateMcpSessionRequest,
    ) -> Result<ApiResponse<CreateMcpSessionData>, ApiError> {
        self.send(&req).await
    }

    async fn release_mcp_session(
        &self,
        req: ReleaseMcpSessionRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.send(&req).await
    }

    async fn call_mcp_tool(
        &self,
        req: CallMcpToolRequest,
    ) -> Result<ApiResponse<CallMcpToolData>, ApiError> {
        debug!(session_id = %req.session_id, tool = %req.name, "Calling MCP tool");
        self.send(&req).await
    }

    async fn list_session(
        &self,
        req: ListSessionRequest,
    ) -> Result<ApiResponse<ListSessionData>, ApiError> {
        self.send(&req).await
    }

    async fn set_label(
        &self,
        req: SetLabelRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.send(&req).await
    }

    async fn get_label(
        &self,
        req: GetLabelRequest,
    ) -> Result<ApiResponse<GetLabelData>, ApiError> {
        self.send(&req).await
    }

    async fn list_contexts(
        &self,
        req: ListContextsRequest,
    ) -> Result<ApiResponse<Vec<ContextData>>, ApiError> {
        self.send(&req).await
    }

    async fn get_context(
        &self,
        req: GetContextRequest,
    ) -> Result<ApiResponse<ContextData>, ApiError> {
        debug!(name = %req.name, allow_create = req.allow_create, "Resolving context");
        self.send(&req).await
    }

    async fn modify_context(
        &self,
        req: ModifyContextRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.send(&req).await
    }

    async fn delete_context(
        &self,
        req: DeleteContextRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        self.send(&req).await
    }
}
