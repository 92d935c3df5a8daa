//! Shell command execution inside the session.

use proto::{OperationResult, ToolCall};

use crate::McpSession;
use crate::invoker::call_text;

/// Default command timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Value is the combined command output.
pub type CommandResult = OperationResult<String>;

pub struct Command<'a> {
    session: &'a dyn McpSession,
}

impl<'a> Command<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    pub async fn execute_command(&self, command: &str, timeout_ms: u64) -> CommandResult {
        let call = ToolCall::new("execute_command")
            .arg("command", command)
            .arg("timeout_ms", timeout_ms);
        call_text(self.session, call).await
    }
}
