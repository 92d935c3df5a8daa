//! Mobile (Android) touch input, UI inspection and app lifecycle.

use proto::{BoolResult, OperationResult, ToolCall};
use serde::{Deserialize, Serialize};

use crate::McpSession;
use crate::application::{
    InstalledAppListResult, ProcessListResult, installed_apps_call, start_app_call,
};
use crate::computer::ScreenshotResult;
use crate::invoker::{call_bool, call_json, call_text};

/// Android key codes commonly sent with [`Mobile::send_key`].
pub mod key_code {
    pub const HOME: i32 = 3;
    pub const BACK: i32 = 4;
    pub const VOLUME_UP: i32 = 24;
    pub const VOLUME_DOWN: i32 = 25;
    pub const POWER: i32 = 26;
    pub const MENU: i32 = 82;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiBounds {
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    pub top: i32,
}

/// One node of the on-screen UI hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiElement {
    #[serde(default)]
    pub bounds: Option<UiBounds>,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub content_desc: String,
    #[serde(default)]
    pub element_id: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Populated by `get_all_ui_elements` only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UiElement>,
}

pub type UiElementsResult = OperationResult<Vec<UiElement>>;

pub struct Mobile<'a> {
    session: &'a dyn McpSession,
}

impl<'a> Mobile<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    /// Taps the screen at `(x, y)`.
    pub async fn tap(&self, x: i32, y: i32) -> BoolResult {
        call_bool(self.session, ToolCall::new("tap").arg("x", x).arg("y", y)).await
    }

    /// Swipes from the start point to the end point over `duration_ms`.
    pub async fn swipe(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        duration_ms: u64,
    ) -> BoolResult {
        let call = ToolCall::new("swipe")
            .arg("start_x", start_x)
            .arg("start_y", start_y)
            .arg("end_x", end_x)
            .arg("end_y", end_y)
            .arg("duration_ms", duration_ms);
        call_bool(self.session, call).await
    }

    pub async fn input_text(&self, text: &str) -> BoolResult {
        call_bool(self.session, ToolCall::new("input_text").arg("text", text)).await
    }

    /// Sends an Android key event, see [`key_code`].
    pub async fn send_key(&self, key: i32) -> BoolResult {
        call_bool(self.session, ToolCall::new("send_key").arg("key", key)).await
    }

    pub async fn get_clickable_ui_elements(&self, timeout_ms: u64) -> UiElementsResult {
        let call = ToolCall::new("get_clickable_ui_elements").arg("timeout_ms", timeout_ms);
        call_json(self.session, call, "UI elements").await
    }

    /// Full UI tree; each element carries its `children`.
    pub async fn get_all_ui_elements(&self, timeout_ms: u64) -> UiElementsResult {
        let call = ToolCall::new("get_all_ui_elements").arg("timeout_ms", timeout_ms);
        call_json(self.session, call, "UI elements").await
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

    /// Starts an app; `activity` selects an Android activity and may be empty.
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

    pub async fn screenshot(&self) -> ScreenshotResult {
        call_text(self.session, ToolCall::new("system_screenshot")).await
    }
}
