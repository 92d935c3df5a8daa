//! Parameters accepted when creating and listing sessions.

use proto::Labels;
use serde::{Deserialize, Serialize};

/// App access policy for mobile sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleType {
    /// Only the listed packages may run.
    White,
    /// The listed packages are blocked.
    Black,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManagerRule {
    pub rule_type: RuleType,
    pub app_package_name_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileExtraConfig {
    /// Keep a fixed resolution instead of adapting to the device type.
    pub lock_resolution: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_manager_rule: Option<AppManagerRule>,
    pub hide_navigation_bar: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uninstall_blacklist: Vec<String>,
}

/// Per-environment settings sent as `ExtraConfigs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraConfigs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<MobileExtraConfig>,
}

impl ExtraConfigs {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a JSON object; an empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSessionParams {
    pub labels: Labels,
    pub image_id: Option<String>,
    pub context_id: Option<String>,
    pub extra_configs: Option<ExtraConfigs>,
}

impl CreateSessionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels.extend(labels);
        self
    }

    pub fn with_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    pub fn with_extra_configs(mut self, extra_configs: ExtraConfigs) -> Self {
        self.extra_configs = Some(extra_configs);
        self
    }

    /// Labels as a JSON object, or `None` when there are none.
    pub(crate) fn labels_json(&self) -> Result<Option<String>, serde_json::Error> {
        if self.labels.is_empty() {
            return Ok(None);
        }
        serde_json::to_string(&self.labels).map(Some)
    }

    pub(crate) fn extra_configs_json(&self) -> Result<Option<String>, serde_json::Error> {
        self.extra_configs.as_ref().map(ExtraConfigs::to_json).transpose()
    }
}

/// Page size used when a list call does not set one.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Label filter and page cursor for `list_by_params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSessionParams {
    pub labels: Labels,
    pub max_results: u32,
    /// Cursor from the previous page; `None` starts from the first page.
    pub next_token: Option<String>,
}

impl Default for ListSessionParams {
    fn default() -> Self {
        Self {
            labels: Labels::new(),
            max_results: DEFAULT_MAX_RESULTS,
            next_token: None,
        }
    }
}

impl ListSessionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels.extend(labels);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// An empty token is treated as "first page".
    pub fn with_next_token(mut self, next_token: impl Into<String>) -> Self {
        let token = next_token.into();
        self.next_token = (!token.is_empty()).then_some(token);
        self
    }
}
