//! A remote session and its domain managers.

use std::sync::Arc;

use api::{ApiClient, GetLabelRequest, ReleaseMcpSessionRequest, SetLabelRequest};
use chrono::{DateTime, Utc};
use proto::{BoolResult, Labels, OperationResult, SessionId, ToolError};
use tools::{
    Application, Command, Computer, FileSystem, McpSession, Mobile, Oss, WindowManager,
};
use tracing::{debug, warn};

/// Outcome of releasing a session remotely.
pub type DeleteResult = OperationResult<bool>;
pub type LabelsResult = OperationResult<Labels>;

/// Handle to one remote execution context.
///
/// Holds no automation logic; managers borrow it through [`McpSession`].
pub struct Session {
    api_key: String,
    client: Arc<dyn ApiClient>,
    session_id: SessionId,
    resource_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("resource_url", &self.resource_url)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wraps an existing remote session id; nothing is sent to the service.
    pub fn new(
        api_key: impl Into<String>,
        client: Arc<dyn ApiClient>,
        session_id: impl Into<SessionId>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client,
            session_id: session_id.into(),
            resource_url: None,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn with_resource_url(mut self, resource_url: Option<String>) -> Self {
        self.resource_url = resource_url.filter(|url| !url.is_empty());
        self
    }

    /// Remote session identifier.
    pub fn id(&self) -> &SessionId {
        &self.session_id
    }

    /// Remote desktop/stream URL returned at creation, if any.
    pub fn resource_url(&self) -> Option<&str> {
        self.resource_url.as_deref()
    }

    /// When this handle was created locally.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn computer(&self) -> Computer<'_> {
        Computer::new(self)
    }

    pub fn mobile(&self) -> Mobile<'_> {
        Mobile::new(self)
    }

    pub fn file_system(&self) -> FileSystem<'_> {
        FileSystem::new(self)
    }

    pub fn application(&self) -> Application<'_> {
        Application::new(self)
    }

    pub fn window(&self) -> WindowManager<'_> {
        WindowManager::new(self)
    }

    pub fn command(&self) -> Command<'_> {
        Command::new(self)
    }

    /// Object storage transfers run from inside the session.
    pub fn oss(&self) -> Oss<'_> {
        Oss::new(self)
    }

    /// Releases the session on the service. Registry bookkeeping is left to the caller.
    pub async fn release(&self) -> DeleteResult {
        let req = ReleaseMcpSessionRequest {
            authorization: proto::bearer(&self.api_key),
            session_id: self.session_id.to_string(),
        };
        debug!(session_id = %self.session_id, "Releasing session");

        match self.client.release_mcp_session(req).await {
            Ok(resp) if resp.is_success() => DeleteResult::ok(resp.request_id(), true),
            Ok(resp) => DeleteResult::fail(resp.request_id(), resp.error_text()),
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "Session release failed");
                DeleteResult::fail("", format!("failed to delete session: {e}"))
            }
        }
    }

    /// Replaces the session labels.
    pub async fn set_labels(&self, labels: &Labels) -> BoolResult {
        let labels = match serde_json::to_string(labels) {
            Ok(json) => json,
            Err(e) => return BoolResult::fail("", format!("failed to serialize labels: {e}")),
        };
        let req = SetLabelRequest {
            authorization: proto::bearer(&self.api_key),
            session_id: self.session_id.to_string(),
            labels,
        };

        match self.client.set_label(req).await {
            Ok(resp) if resp.is_success() => BoolResult::ok(resp.request_id(), true),
            Ok(resp) => BoolResult::fail(resp.request_id(), resp.error_text()),
            Err(e) => BoolResult::fail("", format!("failed to set labels: {e}")),
        }
    }

    pub async fn get_labels(&self) -> LabelsResult {
        let req = GetLabelRequest {
            authorization: proto::bearer(&self.api_key),
            session_id: self.session_id.to_string(),
        };

        let resp = match self.client.get_label(req).await {
            Ok(resp) => resp,
            Err(e) => return LabelsResult::fail("", format!("failed to get labels: {e}")),
        };
        let request_id = resp.request_id();
        if !resp.is_success() {
            return LabelsResult::fail(request_id, resp.error_text());
        }

        let raw = resp
            .data
            .and_then(|data| data.labels)
            .filter(|json| !json.trim().is_empty());
        let Some(raw) = raw else {
            return LabelsResult::ok(request_id, Labels::new());
        };
        match serde_json::from_str::<Labels>(&raw) {
            Ok(labels) => LabelsResult::ok(request_id, labels),
            Err(e) => LabelsResult::from_error(request_id, &ToolError::decode("labels", e)),
        }
    }
}

impl McpSession for Session {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn client(&self) -> Arc<dyn ApiClient> {
        self.client.clone()
    }

    fn session_id(&self) -> &str {
        self.session_id.as_str()
    }
}
