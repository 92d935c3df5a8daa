//! The generic tool invoker and the decoding helpers shared by every manager.

use proto::{BoolResult, OperationResult, ToolCall, ToolError, ToolResult};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::McpSession;

/// Invokes one remote tool and always returns an envelope.
///
/// Transport failures become `success == false` with a message prefixed by
/// the tool name; the request id is kept when the failure carries one (a
/// reply without `Data`), otherwise it is empty. Remote envelopes pass
/// through as-is.
pub async fn call_tool(session: &dyn McpSession, call: ToolCall) -> ToolResult {
    if call.tool_name.trim().is_empty() {
        return ToolResult::local_failure(&ToolError::EmptyToolName);
    }

    let args = match call.arguments_json() {
        Ok(args) => args,
        Err(e) => {
            warn!(tool = %call.tool_name, error = %e, "Failed to serialize tool arguments");
            return ToolResult::local_failure(&ToolError::transport(&call.tool_name, e));
        }
    };

    debug!(
        session_id = %session.session_id(),
        tool = %call.tool_name,
        call_id = %call.id,
        "Calling tool"
    );

    match session.call_mcp_tool(&call.tool_name, args).await {
        Ok(result) => {
            debug!(
                tool = %call.tool_name,
                call_id = %call.id,
                request_id = %result.request_id,
                success = result.success,
                "Tool call completed"
            );
            result
        }
        Err(e) => {
            warn!(
                session_id = %session.session_id(),
                tool = %call.tool_name,
                error = %e,
                "Tool call transport failure"
            );
            let error = ToolError::transport(&call.tool_name, &e);
            ToolResult::failure(e.request_id(), error.to_string())
        }
    }
}

/// Checks `value` against an enumerated parameter.
pub(crate) fn check_choice(param: &str, value: &str, allowed: &[&str]) -> Result<(), ToolError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ToolError::validation(param, value, allowed))
    }
}

/// Runs a call whose outcome is just the remote success flag.
pub(crate) async fn call_bool(session: &dyn McpSession, call: ToolCall) -> BoolResult {
    BoolResult::from_tool_result(&call_tool(session, call).await)
}

/// Runs a call whose payload is returned as text.
pub(crate) async fn call_text(session: &dyn McpSession, call: ToolCall) -> OperationResult<String> {
    let result = call_tool(session, call).await;
    if !result.success {
        return OperationResult::from_failed(&result);
    }
    OperationResult::ok(result.request_id, result.data)
}

/// Runs a call whose payload is JSON of type `T`.
pub(crate) async fn call_json<T>(
    session: &dyn McpSession,
    call: ToolCall,
    what: &str,
) -> OperationResult<T>
where
    T: DeserializeOwned + Default,
{
    let result = call_tool(session, call).await;
    decode_json(result, what)
}

pub(crate) fn decode_json<T>(result: ToolResult, what: &str) -> OperationResult<T>
where
    T: DeserializeOwned + Default,
{
    decode_with(result, what, |data| {
        serde_json::from_str(data).map_err(|e| e.to_string())
    })
}

/// Decodes a successful payload with `parse`; failures keep the request id.
pub(crate) fn decode_with<T, F>(result: ToolResult, what: &str, parse: F) -> OperationResult<T>
where
    T: Default,
    F: FnOnce(&str) -> Result<T, String>,
{
    if !result.success {
        return OperationResult::from_failed(&result);
    }
    match parse(&result.data) {
        Ok(value) => OperationResult::ok(result.request_id, value),
        Err(reason) => {
            debug!(request_id = %result.request_id, what, "Payload decode failed");
            OperationResult::from_error(result.request_id, &ToolError::decode(what, reason))
        }
    }
}
