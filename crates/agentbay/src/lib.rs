//! AgentBay client SDK.
//!
//! [`AgentBay`] creates and tracks remote sessions and manages persistent
//! contexts; each [`Session`] hands out domain managers (computer, mobile,
//! filesystem, application, window, command, oss) that drive automation
//! inside it.

pub mod client;
pub mod config;
pub mod context;
pub mod params;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{AgentBay, SessionListResult, SessionResult, SessionSummary};
pub use config::Config;
pub use context::{Context, ContextListParams, ContextListResult, ContextResult, ContextService};
pub use params::{
    AppManagerRule, CreateSessionParams, DEFAULT_MAX_RESULTS, ExtraConfigs, ListSessionParams,
    MobileExtraConfig, RuleType,
};
pub use session::{DeleteResult, LabelsResult, Session};

pub use tools::McpSession;
