//! Top-level client: session creation, lookup and teardown.

use std::sync::Arc;

use api::{ApiClient, CreateMcpSessionRequest, HttpApiClient, ListSessionRequest};
use dashmap::DashMap;
use futures_util::future::join_all;
use proto::{ConfigError, Labels, SessionError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{API_KEY_ENV, Config, load_dotenv};
use crate::context::ContextService;
use crate::params::{CreateSessionParams, ListSessionParams};
use crate::session::{DeleteResult, Session};

/// Outcome of `create`.
#[derive(Debug, Clone, Default)]
pub struct SessionResult {
    pub request_id: String,
    pub success: bool,
    pub error_message: String,
    pub session: Option<Arc<Session>>,
}

impl SessionResult {
    fn failure(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error_message: error_message.into(),
            session: None,
        }
    }
}

/// Outcome of `list_by_labels` and `list_by_params`.
#[derive(Debug, Clone, Default)]
pub struct SessionListResult {
    pub request_id: String,
    pub success: bool,
    pub error_message: String,
    pub sessions: Vec<Arc<Session>>,
    /// Cursor for the next page; empty on the last page.
    pub next_token: String,
    pub max_results: u32,
    pub total_count: u32,
}

impl SessionListResult {
    fn failure(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error_message: error_message.into(),
            ..Default::default()
        }
    }

    /// Ids of the listed sessions.
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.id().to_string()).collect()
    }
}

/// Serializable summary used by front ends.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
    pub created_at: String,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            resource_url: session.resource_url().map(str::to_string),
            created_at: session.created_at().to_rfc3339(),
        }
    }
}

/// Entry point of the SDK. Owns the transport and the local session registry.
pub struct AgentBay {
    api_key: String,
    region_id: String,
    client: Arc<dyn ApiClient>,
    sessions: DashMap<String, Arc<Session>>,
}

impl AgentBay {
    /// Creates a client over HTTP.
    ///
    /// An empty `api_key` falls back to `AGENTBAY_API_KEY`. Without `config`
    /// the settings come from the environment (see [`Config::from_env`]).
    pub fn new(api_key: &str, config: Option<Config>) -> Result<Self, ConfigError> {
        let config = config.unwrap_or_else(Config::from_env);
        let api_key = if api_key.is_empty() {
            load_dotenv();
            std::env::var(API_KEY_ENV).unwrap_or_default()
        } else {
            api_key.to_string()
        };
        if api_key.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "api_key (pass it explicitly or set {API_KEY_ENV})"
            )));
        }

        debug!(
            region_id = %config.region_id,
            endpoint = %config.endpoint,
            timeout_ms = config.timeout_ms,
            "Creating AgentBay client"
        );
        let client = Arc::new(HttpApiClient::new(&config.endpoint, config.timeout_ms));
        Ok(Self::with_client(api_key, config.region_id, client))
    }

    /// Creates a client over a custom transport.
    pub fn with_client(
        api_key: impl Into<String>,
        region_id: impl Into<String>,
        client: Arc<dyn ApiClient>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            region_id: region_id.into(),
            client,
            sessions: DashMap::new(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// Persistent contexts owned by this account.
    pub fn context(&self) -> ContextService<'_> {
        ContextService::new(&self.api_key, self.client.as_ref())
    }

    /// Creates a remote session and registers it locally.
    pub async fn create(&self, params: CreateSessionParams) -> SessionResult {
        let labels = match params.labels_json() {
            Ok(labels) => labels,
            Err(e) => return SessionResult::failure("", format!("failed to serialize labels: {e}")),
        };
        let extra_configs = match params.extra_configs_json() {
            Ok(extra) => extra,
            Err(e) => {
                return SessionResult::failure(
                    "",
                    format!("failed to serialize extra configs: {e}"),
                );
            }
        };
        let req = CreateMcpSessionRequest {
            authorization: proto::bearer(&self.api_key),
            context_id: params.context_id.clone(),
            labels,
            image_id: params.image_id.clone(),
            extra_configs,
        };

        let resp = match self.client.create_mcp_session(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Session creation failed");
                return SessionResult::failure("", format!("failed to create session: {e}"));
            }
        };
        let request_id = resp.request_id();
        if !resp.is_success() {
            return SessionResult::failure(request_id, resp.error_text());
        }

        let data = resp.data.unwrap_or_default();
        if data.success == Some(false) {
            let reason = data
                .err_msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "session creation failed".to_string());
            return SessionResult::failure(request_id, reason);
        }
        let Some(session_id) = data.session_id.filter(|id| !id.is_empty()) else {
            return SessionResult::failure(request_id, "SessionId not found in response");
        };

        let session = Arc::new(
            Session::new(self.api_key.clone(), self.client.clone(), session_id.clone())
                .with_resource_url(data.resource_url),
        );
        self.sessions.insert(session_id.clone(), session.clone());
        info!(session_id = %session_id, request_id = %request_id, "Session created");

        SessionResult {
            request_id,
            success: true,
            error_message: String::new(),
            session: Some(session),
        }
    }

    /// Sessions currently held in the local registry.
    pub fn list(&self) -> Vec<Arc<Session>> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Asks the service for the first page of sessions carrying all of `labels`.
    ///
    /// Ids already in the registry reuse their handle; new ids are registered.
    pub async fn list_by_labels(&self, labels: &Labels) -> SessionListResult {
        self.list_by_params(&ListSessionParams::new().with_labels(labels.clone()))
            .await
    }

    /// Lists one page of sessions matching `params.labels`.
    pub async fn list_by_params(&self, params: &ListSessionParams) -> SessionListResult {
        let labels_json = match serde_json::to_string(&params.labels) {
            Ok(json) => json,
            Err(e) => {
                return SessionListResult::failure("", format!("failed to serialize labels: {e}"));
            }
        };
        let req = ListSessionRequest {
            authorization: proto::bearer(&self.api_key),
            labels: labels_json,
            max_results: Some(params.max_results),
            next_token: params.next_token.clone(),
        };

        let resp = match self.client.list_session(req).await {
            Ok(resp) => resp,
            Err(e) => {
                return SessionListResult::failure("", format!("failed to list sessions: {e}"));
            }
        };
        let request_id = resp.request_id();
        if !resp.is_success() {
            return SessionListResult::failure(request_id, resp.error_text());
        }
        if resp.data.as_ref().is_some_and(|data| data.is_error()) {
            warn!(request_id = %request_id, "Session listing flagged as error");
            return SessionListResult::failure(request_id, "Failed to list sessions by labels");
        }

        let next_token = resp.next_token.clone().unwrap_or_default();
        let max_results = resp.max_results.unwrap_or(params.max_results);
        let ids = resp.data.map(|data| data.session_ids()).unwrap_or_default();
        let total_count = resp.total_count.unwrap_or(ids.len() as u32);
        let sessions = ids
            .into_iter()
            .map(|id| {
                self.sessions
                    .entry(id.clone())
                    .or_insert_with(|| {
                        Arc::new(Session::new(self.api_key.clone(), self.client.clone(), id))
                    })
                    .clone()
            })
            .collect::<Vec<_>>();
        debug!(
            count = sessions.len(),
            total_count,
            has_next = !next_token.is_empty(),
            request_id = %request_id,
            "Listed sessions by labels"
        );

        SessionListResult {
            request_id,
            success: true,
            error_message: String::new(),
            sessions,
            next_token,
            max_results,
            total_count,
        }
    }

    /// Registry lookup.
    pub fn get(&self, session_id: &str) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Releases `session` remotely, then drops it from the registry.
    ///
    /// The registry entry is removed even when the remote release fails; the
    /// returned result reports the remote outcome.
    pub async fn delete(&self, session: &Session) -> DeleteResult {
        let result = session.release().await;
        let removed = self.sessions.remove(session.id().as_str()).is_some();

        if result.success {
            info!(session_id = %session.id(), request_id = %result.request_id, "Session deleted");
        } else {
            warn!(
                session_id = %session.id(),
                error = %result.error_message,
                removed,
                "Remote release failed; local registry entry dropped"
            );
        }
        result
    }

    /// Deletes every registered session concurrently.
    pub async fn delete_all(&self) -> Vec<(String, DeleteResult)> {
        let sessions = self.list();
        let deletions = sessions.iter().map(|session| async move {
            (session.id().to_string(), self.delete(session).await)
        });
        join_all(deletions).await
    }
}
