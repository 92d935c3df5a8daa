//! Application lifecycle: installed apps, launching and stopping processes.

use proto::{BoolResult, OperationResult, ToolCall};
use serde::{Deserialize, Serialize};

use crate::McpSession;
use crate::invoker::{call_bool, call_json};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstalledApp {
    pub name: String,
    pub start_cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_cmd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_directory: Option<String>,
}

/// A process started or observed in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Process {
    pub pname: String,
    pub pid: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmdline: Option<String>,
}

pub type InstalledAppListResult = OperationResult<Vec<InstalledApp>>;
pub type ProcessListResult = OperationResult<Vec<Process>>;

pub(crate) fn installed_apps_call(
    start_menu: bool,
    desktop: bool,
    ignore_system_apps: bool,
) -> ToolCall {
    ToolCall::new("get_installed_apps")
        .arg("start_menu", start_menu)
        .arg("desktop", desktop)
        .arg("ignore_system_apps", ignore_system_apps)
}

pub(crate) fn start_app_call(start_cmd: &str, work_directory: &str, activity: &str) -> ToolCall {
    ToolCall::new("start_app")
        .arg("start_cmd", start_cmd)
        .arg("work_directory", work_directory)
        .arg("activity", activity)
}

/// Desktop application management for one session.
pub struct Application<'a> {
    session: &'a dyn McpSession,
}

impl<'a> Application<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    pub async fn get_installed_apps(
        &self,
        start_menu: bool,
        desktop: bool,
        ignore_system_apps: bool,
    ) -> InstalledAppListResult {
        let call = installed_apps_call(start_menu, desktop, ignore_system_apps);
        call_json(self.session, call, "installed apps").await
    }

    /// Launches `start_cmd`; `work_directory` and `activity` may be empty.
    pub async fn start_app(
        &self,
        start_cmd: &str,
        work_directory: &str,
        activity: &str,
    ) -> ProcessListResult {
        let call = start_app_call(start_cmd, work_directory, activity);
        call_json(self.session, call, "processes").await
    }

    pub async fn stop_app_by_pname(&self, pname: &str) -> BoolResult {
        call_bool(
            self.session,
            ToolCall::new("stop_app_by_pname").arg("pname", pname),
        )
        .await
    }

    pub async fn stop_app_by_pid(&self, pid: i64) -> BoolResult {
        call_bool(self.session, ToolCall::new("stop_app_by_pid").arg("pid", pid)).await
    }

    pub async fn stop_app_by_cmd(&self, stop_cmd: &str) -> BoolResult {
        call_bool(
            self.session,
            ToolCall::new("stop_app_by_cmd").arg("stop_cmd", stop_cmd),
        )
        .await
    }

    /// Processes that currently own a visible window.
    pub async fn list_visible_apps(&self) -> ProcessListResult {
        call_json(
            self.session,
            ToolCall::new("list_visible_apps"),
            "visible apps",
        )
        .await
    }
}
