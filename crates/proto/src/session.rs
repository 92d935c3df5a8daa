use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of a remote session, as issued by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Returns the raw session identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session labels. Ordered so the serialized JSON is stable.
pub type Labels = BTreeMap<String, String>;

/// Parses `key=value` pairs into [`Labels`].
pub fn parse_labels<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Labels, String> {
    let mut labels = Labels::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("label '{pair}' is not in key=value form"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("label '{pair}' has an empty key"));
        }
        labels.insert(key.to_string(), value.trim().to_string());
    }
    Ok(labels)
}
