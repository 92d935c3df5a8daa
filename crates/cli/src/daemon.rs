//! Daemon lifecycle: PID file, health check loop and shutdown cleanup.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use agentbay::{AgentBay, CreateSessionParams};
use tokio::signal;
use tracing::{info, warn};

use crate::config::{DaemonConfig, state_dir};

/// PID file management
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Creates a PID file manager for a concrete path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default PID file path under `~/.agentbay/`.
    pub fn default_path() -> PathBuf {
        state_dir().join("agentbay.pid")
    }

    /// Writes the current process ID to the PID file.
    pub async fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let pid = std::process::id().to_string();
        tokio::fs::write(&self.path, pid).await?;
        info!("PID file written: {}", self.path.display());
        Ok(())
    }

    /// Removes the PID file if it exists.
    pub async fn remove(&self) {
        if self.path.exists() {
            let _ = tokio::fs::remove_file(&self.path).await;
            info!("PID file removed: {}", self.path.display());
        }
    }
}

/// Wait for SIGTERM or SIGINT shutdown signal
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => info!("Received SIGINT, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!("Failed to register SIGTERM handler: {e}"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => warn!("Failed to listen for ctrl-c: {e}"),
    }
}

/// Runs the daemon until `shutdown` resolves.
///
/// Creates one session, logs a health line every `health_check_secs`, then
/// deletes every registered session. Returns the number of sessions whose
/// remote release failed. If the PID file cannot be written the session is
/// released before the error is returned.
pub async fn run(
    agent_bay: &AgentBay,
    config: &DaemonConfig,
    pid_file: &PidFile,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<usize> {
    let mut params = CreateSessionParams::new().with_labels(config.labels.clone());
    if !config.image_id.is_empty() {
        params = params.with_image_id(config.image_id.clone());
    }
    let created = agent_bay.create(params).await;
    let Some(session) = created.session else {
        anyhow::bail!(
            "failed to create daemon session (request {}): {}",
            created.request_id,
            created.error_message
        );
    };
    info!(session_id = %session.id(), "Daemon session ready");

    if let Err(e) = pid_file.write().await {
        warn!(error = %e, "PID file write failed; releasing daemon session");
        for (session_id, result) in agent_bay.delete_all().await {
            if !result.success {
                warn!(
                    session_id = %session_id,
                    error = %result.error_message,
                    "Session delete failed"
                );
            }
        }
        return Err(e.into());
    }

    let period = Duration::from_secs(config.health_check_secs.max(1));
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let sessions = agent_bay.list();
                info!(sessions = sessions.len(), "Daemon health check");
            }
        }
    }

    let mut failed = 0;
    for (session_id, result) in agent_bay.delete_all().await {
        if result.success {
            info!(session_id = %session_id, "Session deleted");
        } else {
            failed += 1;
            warn!(
                session_id = %session_id,
                error = %result.error_message,
                "Session delete failed"
            );
        }
    }
    pid_file.remove().await;
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use api::HttpApiClient;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn mount_action(server: &MockServer, action: &str, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(query_param("Action", action))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn agent_bay_for(server: &MockServer) -> AgentBay {
        let client = Arc::new(HttpApiClient::with_base_url(server.uri(), 5_000));
        AgentBay::with_client("test-key", "cn-shanghai", client)
    }

    #[test]
    fn default_path_points_to_agentbay_pid() {
        let path = PidFile::default_path();
        let text = path.to_string_lossy();
        assert!(text.contains(".agentbay"));
        assert!(text.ends_with("agentbay.pid"));
    }

    #[tokio::test]
    async fn write_and_remove_pid_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let pid_path = tmp.path().join("nested/agentbay.pid");
        let pid_file = PidFile::new(&pid_path);

        pid_file.write().await.expect("pid write");
        assert!(pid_path.exists());

        let written = tokio::fs::read_to_string(&pid_path)
            .await
            .expect("read pid");
        let parsed_pid = written.parse::<u32>().expect("pid should be numeric");
        assert_eq!(parsed_pid, std::process::id());

        pid_file.remove().await;
        assert!(!pid_path.exists());
    }

    #[tokio::test]
    async fn run_deletes_sessions_on_shutdown() {
        let server = MockServer::start().await;
        mount_action(
            &server,
            "CreateMcpSession",
            json!({"RequestId": "req-create", "Success": true, "Data": {"SessionId": "s-daemon"}}),
        )
        .await;
        Mock::given(method("POST"))
            .and(query_param("Action", "ReleaseMcpSession"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"RequestId": "req-release", "Success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let agent_bay = agent_bay_for(&server);
        let tmp = tempfile::tempdir().expect("tempdir");
        let pid_path = tmp.path().join("agentbay.pid");
        let pid_file = PidFile::new(&pid_path);

        let failed = run(&agent_bay, &DaemonConfig::default(), &pid_file, async {})
            .await
            .expect("daemon run");
        assert_eq!(failed, 0);
        assert!(agent_bay.list().is_empty());
        assert!(!pid_path.exists());
    }

    #[tokio::test]
    async fn run_counts_failed_releases() {
        let server = MockServer::start().await;
        mount_action(
            &server,
            "CreateMcpSession",
            json!({"RequestId": "req-create", "Data": {"SessionId": "s-daemon"}}),
        )
        .await;
        mount_action(
            &server,
            "ReleaseMcpSession",
            json!({"RequestId": "req-release", "Success": false, "Message": "already gone"}),
        )
        .await;

        let agent_bay = agent_bay_for(&server);
        let tmp = tempfile::tempdir().expect("tempdir");
        let pid_file = PidFile::new(tmp.path().join("agentbay.pid"));

        let failed = run(&agent_bay, &DaemonConfig::default(), &pid_file, async {})
            .await
            .expect("daemon run");
        assert_eq!(failed, 1);
        assert!(agent_bay.list().is_empty());
    }

    #[tokio::test]
    async fn run_fails_when_session_cannot_be_created() {
        let server = MockServer::start().await;
        mount_action(
            &server,
            "CreateMcpSession",
            json!({"RequestId": "req-create", "Success": false, "Message": "quota exceeded"}),
        )
        .await;

        let agent_bay = agent_bay_for(&server);
        let tmp = tempfile::tempdir().expect("tempdir");
        let pid_path = tmp.path().join("agentbay.pid");
        let pid_file = PidFile::new(&pid_path);

        let err = run(&agent_bay, &DaemonConfig::default(), &pid_file, async {})
            .await
            .expect_err("create failure must abort");
        assert!(err.to_string().contains("quota exceeded"));
        assert!(!pid_path.exists());
    }

    #[tokio::test]
    async fn run_releases_session_when_pid_file_cannot_be_written() {
        let server = MockServer::start().await;
        mount_action(
            &server,
            "CreateMcpSession",
            json!({"RequestId": "req-create", "Data": {"SessionId": "s-daemon"}}),
        )
        .await;
        Mock::given(method("POST"))
            .and(query_param("Action", "ReleaseMcpSession"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"RequestId": "req-release", "Success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let agent_bay = agent_bay_for(&server);
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").expect("write blocker");
        let pid_file = PidFile::new(blocker.join("agentbay.pid"));

        let result = run(&agent_bay, &DaemonConfig::default(), &pid_file, async {}).await;
        assert!(result.is_err());
        assert!(agent_bay.list().is_empty());
    }
}
