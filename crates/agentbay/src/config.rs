//! SDK connection settings.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_REGION_ID: &str = "cn-shanghai";
pub const DEFAULT_ENDPOINT: &str = "wuyingai.cn-shanghai.aliyuncs.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "AGENTBAY_API_KEY";
pub const REGION_ID_ENV: &str = "AGENTBAY_REGION_ID";
pub const ENDPOINT_ENV: &str = "AGENTBAY_ENDPOINT";
pub const TIMEOUT_MS_ENV: &str = "AGENTBAY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region_id: String,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region_id: DEFAULT_REGION_ID.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Defaults overridden by `AGENTBAY_*` variables.
    ///
    /// A `.env` file in the working directory is loaded first; variables
    /// already present in the process environment take precedence over it.
    pub fn from_env() -> Self {
        load_dotenv();
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unparsable timeouts are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(region_id) = lookup(REGION_ID_ENV).filter(|v| !v.is_empty()) {
            self.region_id = region_id;
        }
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(raw) = lookup(TIMEOUT_MS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => self.timeout_ms = timeout_ms,
                _ => warn!(value = %raw, "Ignoring invalid {TIMEOUT_MS_ENV}"),
            }
        }
        self
    }
}

/// Loads `.env` from the working directory without overriding set variables.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {e}"),
    }
}
