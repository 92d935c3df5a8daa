//! Transport for the AgentBay OpenAPI.
//!
//! [`ApiClient`] is the seam between the SDK and the network; [`HttpApiClient`]
//! is the production implementation and tests substitute their own.

pub mod http;
pub mod models;

use async_trait::async_trait;
use proto::ApiError;

pub use http::{API_VERSION, HttpApiClient};
pub use models::{
    ApiRequest, ApiResponse, CallMcpToolData, CallMcpToolRequest, ContentItem, ContextData,
    CreateMcpSessionData, CreateMcpSessionRequest, DeleteContextRequest, GetContextRequest,
    GetLabelData, GetLabelRequest, ListContextsRequest, ListSessionData, ListSessionRequest,
    ModifyContextRequest, ReleaseMcpSessionRequest, SessionSummary, SetLabelRequest,
};

/// One method per OpenAPI action used by the SDK.
///
/// Implementations return `Err` only when no well-formed envelope was
/// obtained; service-level failures come back as an envelope with
/// `Success: false`.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn create_mcp_session(
        &self,
        req: CreateMcpSessionRequest,
    ) -> Result<ApiResponse<CreateMcpSessionData>, ApiError>;

    async fn release_mcp_session(
        &self,
        req: ReleaseMcpSessionRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError>;

    async fn call_mcp_tool(
        &self,
        req: CallMcpToolRequest,
    ) -> Result<ApiResponse<CallMcpToolData>, ApiError>;

    async fn list_session(
        &self,
        req: ListSessionRequest,
    ) -> Result<ApiResponse<ListSessionData>, ApiError>;

    async fn set_label(
        &self,
        req: SetLabelRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError>;

    async fn get_label(&self, req: GetLabelRequest)
    -> Result<ApiResponse<GetLabelData>, ApiError>;

    async fn list_contexts(
        &self,
        req: ListContextsRequest,
    ) -> Result<ApiResponse<Vec<ContextData>>, ApiError>;

    /// Resolves a context by name, creating it when `allow_create` is set.
    async fn get_context(
        &self,
        req: GetContextRequest,
    ) -> Result<ApiResponse<ContextData>, ApiError>;

    async fn modify_context(
        &self,
        req: ModifyContextRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError>;

    async fn delete_context(
        &self,
        req: DeleteContextRequest,
    ) -> Result<ApiResponse<serde_json::Value>, ApiError>;
}
