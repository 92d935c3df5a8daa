use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tool::ToolResult;

/// Decoded, operation-specific outcome of a tool call.
///
/// `value` is only meaningful when `success` is `true`; on failure it is
/// always `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResult<T> {
    /// Request id of the underlying remote call, kept on failure as well.
    pub request_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error text; empty on success unless the service attached one.
    pub error_message: String,
    /// Decoded value.
    pub value: T,
}

impl<T: Default> OperationResult<T> {
    /// Successful result carrying `value`.
    pub fn ok(request_id: impl Into<String>, value: T) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            error_message: String::new(),
            value,
        }
    }

    /// Failed result with the zero value.
    pub fn fail(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            success: false,
            error_message: error_message.into(),
            value: T::default(),
        }
    }

    /// Failed result from a categorized tool error.
    pub fn from_error(request_id: impl Into<String>, error: &ToolError) -> Self {
        Self::fail(request_id, error.to_string())
    }

    /// Failed result mirroring a failed envelope; the remote text is kept verbatim.
    pub fn from_failed(result: &ToolResult) -> Self {
        Self::from_error(
            result.request_id.clone(),
            &ToolError::Remote(result.error_message.clone()),
        )
    }

    /// Returns the value when successful, otherwise the error text.
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.value)
        } else {
            Err(self.error_message)
        }
    }
}

/// Pure boolean outcome; `value` mirrors `success`.
pub type BoolResult = OperationResult<bool>;

impl BoolResult {
    /// Passes remote success and error text straight through.
    pub fn from_tool_result(result: &ToolResult) -> Self {
        Self {
            request_id: result.request_id.clone(),
            success: result.success,
            error_message: result.error_message.clone(),
            value: result.success,
        }
    }
}
