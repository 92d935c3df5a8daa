use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading/validation error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport error talking to the AgentBay API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session lifecycle error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Tool invocation error.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field has an invalid value and reason.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Filesystem read error.
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Errors raised by the HTTP transport before a remote envelope is available.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/connection-level failure, including timeouts.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request arguments could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Envelope was well-formed but lacked the `Data` the action requires.
    #[error("No data field in response")]
    MissingData { request_id: String },
}

impl ApiError {
    /// Request id carried by the failure, empty when no envelope was read.
    pub fn request_id(&self) -> &str {
        match self {
            ApiError::MissingData { request_id } => request_id,
            _ => "",
        }
    }
}

/// Session lifecycle errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session id unknown to the local registry.
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Remote service refused or failed a session operation.
    #[error("Session {session_id}: {reason}")]
    Remote { session_id: String, reason: String },
}

/// Failure categories of a single tool operation.
///
/// Every variant is converted into an [`crate::OperationResult`] at the
/// public API boundary instead of being returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Caller-supplied parameter outside its allowed set. No call was made.
    #[error("invalid {param}: {value}. Valid options: [{}]", .allowed.join(", "))]
    Validation {
        param: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A tool call was built without a tool name. No call was made.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// The call never produced a remote envelope.
    #[error("failed to call {tool}: {reason}")]
    Transport { tool: String, reason: String },

    /// Remote service reported `success=false`.
    #[error("{0}")]
    Remote(String),

    /// Remote call succeeded but its payload had an unexpected shape.
    #[error("failed to parse {what}: {reason}")]
    Decode { what: String, reason: String },
}

impl ToolError {
    /// Builds a validation error for `value` not being one of `allowed`.
    pub fn validation(param: &str, value: &str, allowed: &[&str]) -> Self {
        Self::Validation {
            param: param.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Wraps a transport failure with the tool name that triggered it.
    pub fn transport(tool: &str, reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            tool: tool.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Wraps a payload decode failure.
    pub fn decode(what: &str, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_config_error_variant() {
        let err = ConfigError::MissingField("agentbay.api_key".to_string());
        assert!(err.to_string().contains("Missing required field"));
    }

    #[test]
    fn wraps_api_error_into_top_level_error() {
        let err: Error = ApiError::Http("connection refused".to_string()).into();
        assert!(err.to_string().contains("API error"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn status_error_includes_code_and_body() {
        let err = ApiError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
        assert_eq!(err.request_id(), "");
    }

    #[test]
    fn missing_data_keeps_request_id() {
        let err = ApiError::MissingData {
            request_id: "req-9".to_string(),
        };
        assert_eq!(err.request_id(), "req-9");
        assert_eq!(err.to_string(), "No data field in response");
    }

    #[test]
    fn validation_error_lists_allowed_values() {
        let err = ToolError::validation("button", "invalid", &["left", "right", "middle"]);
        assert_eq!(
            err.to_string(),
            "invalid button: invalid. Valid options: [left, right, middle]"
        );
    }

    #[test]
    fn transport_and_decode_errors_name_their_subject() {
        let err = ToolError::transport("click_mouse", "timed out");
        assert_eq!(err.to_string(), "failed to call click_mouse: timed out");

        let err = ToolError::decode("cursor position", "expected value");
        assert_eq!(
            err.to_string(),
            "failed to parse cursor position: expected value"
        );
    }

    #[test]
    fn empty_tool_name_has_fixed_message() {
        assert_eq!(
            ToolError::EmptyToolName.to_string(),
            "tool name must not be empty"
        );
    }

    #[test]
    fn remote_error_is_verbatim() {
        assert_eq!(ToolError::Remote("busy".to_string()).to_string(), "busy");
    }

    #[test]
    fn wraps_session_and_tool_errors() {
        let session_err: Error = SessionError::NotFound("s-1".to_string()).into();
        assert!(session_err.to_string().contains("Session error"));

        let tool_err: Error = ToolError::Remote("busy".to_string()).into();
        assert!(tool_err.to_string().contains("Tool error"));
    }
}
