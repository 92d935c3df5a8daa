//! Shared types for the AgentBay SDK crates.
//!
//! This crate defines the tool-call envelope, the typed operation result,
//! session identity types and the error enums used across the workspace.

pub mod error;
pub mod result;
pub mod session;
pub mod tool;

/// Re-export of all error types.
pub use error::*;
/// Re-export of typed operation results.
pub use result::{BoolResult, OperationResult};
/// Re-export of session identity types.
pub use session::{Labels, SessionId, parse_labels};
/// Re-export of tool call and envelope types.
pub use tool::{ToolCall, ToolResult};

/// Formats an API key as the `Authorization` value the service expects.
pub fn bearer(api_key: &str) -> String {
    format!("Bearer {api_key}")
}
