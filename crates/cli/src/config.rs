use agentbay::config::{
    API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_REGION_ID, DEFAULT_TIMEOUT_MS, ENDPOINT_ENV,
    REGION_ID_ENV, TIMEOUT_MS_ENV,
};
use proto::{ConfigError, Labels};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Top-level CLI configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agentbay: AgentBayConfig,
    pub daemon: DaemonConfig,
}

/// Connection settings for the AgentBay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentBayConfig {
    /// API key; `AGENTBAY_API_KEY` takes precedence.
    pub api_key: String,
    pub region_id: String,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for AgentBayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region_id: DEFAULT_REGION_ID.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AgentBayConfig {
    /// SDK view of these settings.
    pub fn sdk_config(&self) -> agentbay::Config {
        agentbay::Config {
            region_id: self.region_id.clone(),
            endpoint: self.endpoint.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Settings for `agentbay daemon`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Seconds between health check log lines.
    pub health_check_secs: u64,
    /// Labels attached to the daemon's session.
    pub labels: Labels,
    pub image_id: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            health_check_secs: 30,
            labels: Labels::from([("purpose".to_string(), "daemon".to_string())]),
            image_id: String::new(),
        }
    }
}

/// Base directory for CLI state (`~/.agentbay`).
pub fn state_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".agentbay")
}

impl Config {
    /// Loads config from `path`, then `./config.toml`, then `~/.agentbay/config.toml`,
    /// and applies `AGENTBAY_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map(|p| p.to_path_buf()).or_else(|| {
            let cwd = std::env::current_dir().ok()?.join("config.toml");
            if cwd.exists() {
                return Some(cwd);
            }
            let home_config = state_dir().join("config.toml");
            if home_config.exists() {
                return Some(home_config);
            }
            None
        });
        debug!(path = ?config_path, "Config file resolved");

        let mut config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(|e| ConfigError::Toml(e.to_string()))?
        } else {
            Config::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            config.agentbay.api_key = key;
        }
        if let Ok(region_id) = std::env::var(REGION_ID_ENV)
            && !region_id.is_empty()
        {
            config.agentbay.region_id = region_id;
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV)
            && !endpoint.is_empty()
        {
            config.agentbay.endpoint = endpoint;
        }
        if let Ok(raw) = std::env::var(TIMEOUT_MS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => config.agentbay.timeout_ms = timeout_ms,
                _ => warn!(value = %raw, "Ignoring invalid {TIMEOUT_MS_ENV}"),
            }
        }

        debug!(
            region_id = %config.agentbay.region_id,
            endpoint = %config.agentbay.endpoint,
            timeout_ms = config.agentbay.timeout_ms,
            has_api_key = !config.agentbay.api_key.is_empty(),
            "Config loaded"
        );
        Ok(config)
    }
}
