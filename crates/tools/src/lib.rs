//! Session capability trait, the tool invoker and the domain managers.
//!
//! Every manager borrows a `&dyn McpSession` and maps each operation onto a
//! single remote tool call, decoding the payload into a typed result.

pub mod application;
pub mod command;
pub mod computer;
pub mod filesystem;
pub mod invoker;
pub mod mobile;
pub mod oss;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use application::Application;
pub use command::Command;
pub use computer::Computer;
pub use filesystem::FileSystem;
pub use invoker::call_tool;
pub use mobile::Mobile;
pub use oss::{Oss, OssCredentials};
pub use window::WindowManager;

use std::sync::Arc;

use api::{ApiClient, CallMcpToolRequest};
use async_trait::async_trait;
use proto::{ApiError, ToolResult};

/// Capabilities a remote session lends to the managers.
#[async_trait]
pub trait McpSession: Send + Sync {
    /// API key used to authorize calls.
    fn api_key(&self) -> &str;
    /// Transport used for remote calls.
    fn client(&self) -> Arc<dyn ApiClient>;
    /// Remote session identifier.
    fn session_id(&self) -> &str;

    /// Dispatches one tool call. `args` is the JSON-encoded argument object.
    ///
    /// `Err` means no well-formed envelope was obtained; remote failures are
    /// returned as `Ok` with `success == false`.
    async fn call_mcp_tool(&self, name: &str, args: String) -> Result<ToolResult, ApiError> {
        let req = CallMcpToolRequest {
            authorization: proto::bearer(self.api_key()),
            session_id: self.session_id().to_string(),
            name: name.to_string(),
            args,
        };
        self.client().call_mcp_tool(req).await?.into_tool_result()
    }
}
