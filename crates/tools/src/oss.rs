//! Object storage transfers between the session and OSS buckets.
//!
//! Credentials are installed once per session with [`Oss::env_init`]; the
//! anonymous variants work on pre-signed or public URLs and need none.

use proto::{OperationResult, ToolCall};

use crate::McpSession;
use crate::invoker::call_text;

/// Value is the tool's text reply: the client configuration for `env_init`,
/// a transfer summary for uploads and downloads.
pub type OssResult = OperationResult<String>;

/// Credentials and location for [`Oss::env_init`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OssCredentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// STS token for temporary credentials.
    pub security_token: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

pub struct Oss<'a> {
    session: &'a dyn McpSession,
}

impl<'a> Oss<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    /// Installs OSS credentials in the session environment.
    pub async fn env_init(&self, credentials: &OssCredentials) -> OssResult {
        let mut call = ToolCall::new("oss_env_init")
            .arg("access_key_id", credentials.access_key_id.as_str())
            .arg("access_key_secret", credentials.access_key_secret.as_str());
        let optional = [
            ("security_token", &credentials.security_token),
            ("endpoint", &credentials.endpoint),
            ("region", &credentials.region),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                call = call.arg(key, value);
            }
        }
        call_text(self.session, call).await
    }

    /// Uploads the session file at `path` to `bucket/object`.
    pub async fn upload(&self, bucket: &str, object: &str, path: &str) -> OssResult {
        let call = ToolCall::new("oss_upload")
            .arg("bucket", bucket)
            .arg("object", object)
            .arg("path", path);
        call_text(self.session, call).await
    }

    /// Uploads to a pre-signed URL without credentials.
    pub async fn upload_anonymous(&self, url: &str, path: &str) -> OssResult {
        let call = ToolCall::new("oss_upload_annon")
            .arg("url", url)
            .arg("path", path);
        call_text(self.session, call).await
    }

    /// Downloads `bucket/object` to the session file at `path`.
    pub async fn download(&self, bucket: &str, object: &str, path: &str) -> OssResult {
        let call = ToolCall::new("oss_download")
            .arg("bucket", bucket)
            .arg("object", object)
            .arg("path", path);
        call_text(self.session, call).await
    }

    pub async fn download_anonymous(&self, url: &str, path: &str) -> OssResult {
        let call = ToolCall::new("oss_download_annon")
            .arg("url", url)
            .arg("path", path);
        call_text(self.session, call).await
    }
}
