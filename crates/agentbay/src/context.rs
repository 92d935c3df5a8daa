//! Persistent contexts: named storage that outlives sessions and can be
//! mounted through `CreateSessionParams::with_context_id`.

use api::{
    ApiClient, ContextData, DeleteContextRequest, GetContextRequest, ListContextsRequest,
    ModifyContextRequest,
};
use proto::BoolResult;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::params::DEFAULT_MAX_RESULTS;

/// A persistent context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Context {
    pub id: String,
    pub name: String,
    /// e.g. `available` or `in-use`.
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
}

impl Context {
    /// Context known only by id and name, used when details are unavailable.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            state: "available".to_string(),
            ..Default::default()
        }
    }
}

impl From<ContextData> for Context {
    fn from(data: ContextData) -> Self {
        Self {
            id: data.id.unwrap_or_default(),
            name: data.name.unwrap_or_default(),
            state: data.state.unwrap_or_default(),
            created_at: data.create_time,
            last_used_at: data.last_used_time,
            os_type: data.os_type,
        }
    }
}

/// Page cursor for [`ContextService::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextListParams {
    pub max_results: u32,
    pub next_token: Option<String>,
}

impl Default for ContextListParams {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            next_token: None,
        }
    }
}

impl ContextListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_next_token(mut self, next_token: impl Into<String>) -> Self {
        let token = next_token.into();
        self.next_token = (!token.is_empty()).then_some(token);
        self
    }
}

/// Outcome of `get` and `create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextResult {
    pub request_id: String,
    pub success: bool,
    pub error_message: String,
    pub context_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl ContextResult {
    fn failure(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error_message: error_message.into(),
            ..Default::default()
        }
    }
}

/// Outcome of `list`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextListResult {
    pub request_id: String,
    pub success: bool,
    pub error_message: String,
    pub contexts: Vec<Context>,
    /// Cursor for the next page; empty on the last page.
    pub next_token: String,
    pub max_results: u32,
    pub total_count: u32,
}

impl ContextListResult {
    fn failure(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error_message: error_message.into(),
            ..Default::default()
        }
    }
}

/// Context operations, borrowed from [`crate::AgentBay::context`].
pub struct ContextService<'a> {
    api_key: &'a str,
    client: &'a dyn ApiClient,
}

impl<'a> ContextService<'a> {
    pub(crate) fn new(api_key: &'a str, client: &'a dyn ApiClient) -> Self {
        Self { api_key, client }
    }

    /// Lists one page of contexts.
    pub async fn list(&self, params: &ContextListParams) -> ContextListResult {
        let req = ListContextsRequest {
            authorization: proto::bearer(self.api_key),
            max_results: Some(params.max_results),
            next_token: params.next_token.clone(),
        };
        let resp = match self.client.list_contexts(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Context listing failed");
                return ContextListResult::failure(
                    e.request_id(),
                    format!("failed to list contexts: {e}"),
                );
            }
        };
        let request_id = resp.request_id();
        if !resp.is_success() {
            return ContextListResult::failure(request_id, resp.error_text());
        }

        let contexts: Vec<Context> = resp
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Context::from)
            .collect();
        debug!(count = contexts.len(), request_id = %request_id, "Listed contexts");
        ContextListResult {
            request_id,
            success: true,
            error_message: String::new(),
            total_count: resp.total_count.unwrap_or(contexts.len() as u32),
            contexts,
            next_token: resp.next_token.unwrap_or_default(),
            max_results: resp.max_results.unwrap_or(params.max_results),
        }
    }

    /// Resolves the context called `name`, creating it when `allow_create` is set.
    ///
    /// Details come from the first page of `list`; a context absent from that
    /// page is returned with only its id and name filled in.
    pub async fn get(&self, name: &str, allow_create: bool) -> ContextResult {
        let req = GetContextRequest {
            authorization: proto::bearer(self.api_key),
            name: name.to_string(),
            allow_create,
        };
        let resp = match self.client.get_context(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(name, error = %e, "Context lookup failed");
                return ContextResult::failure(
                    e.request_id(),
                    format!("failed to get context {name}: {e}"),
                );
            }
        };
        let request_id = resp.request_id();
        if !resp.is_success() {
            return ContextResult::failure(request_id, resp.error_text());
        }
        let Some(context_id) = resp.data.and_then(|d| d.id).filter(|id| !id.is_empty()) else {
            return ContextResult::failure(request_id, "Context ID not found in response");
        };

        let listed = self.list(&ContextListParams::new()).await;
        let context = listed
            .contexts
            .into_iter()
            .find(|c| c.id == context_id)
            .unwrap_or_else(|| Context::new(context_id.clone(), name));
        debug!(context_id = %context_id, name, "Context resolved");

        ContextResult {
            request_id,
            success: true,
            error_message: String::new(),
            context_id,
            context: Some(context),
        }
    }

    /// Creates the context called `name`, or returns it if it already exists.
    pub async fn create(&self, name: &str) -> ContextResult {
        let result = self.get(name, true).await;
        if result.success {
            info!(context_id = %result.context_id, name, "Context created");
        }
        result
    }

    /// Renames `context` to its current `name`.
    pub async fn update(&self, context: &Context) -> BoolResult {
        let req = ModifyContextRequest {
            authorization: proto::bearer(self.api_key),
            id: context.id.clone(),
            name: context.name.clone(),
        };
        match self.client.modify_context(req).await {
            Ok(resp) if resp.is_success() => BoolResult::ok(resp.request_id(), true),
            Ok(resp) => BoolResult::fail(resp.request_id(), resp.error_text()),
            Err(e) => BoolResult::fail(
                e.request_id(),
                format!("failed to update context {}: {e}", context.id),
            ),
        }
    }

    pub async fn delete(&self, context: &Context) -> BoolResult {
        let req = DeleteContextRequest {
            authorization: proto::bearer(self.api_key),
            id: context.id.clone(),
        };
        match self.client.delete_context(req).await {
            Ok(resp) if resp.is_success() => {
                info!(context_id = %context.id, "Context deleted");
                BoolResult::ok(resp.request_id(), true)
            }
            Ok(resp) => BoolResult::fail(resp.request_id(), resp.error_text()),
            Err(e) => BoolResult::fail(
                e.request_id(),
                format!("failed to delete context {}: {e}", context.id),
            ),
        }
    }
}
