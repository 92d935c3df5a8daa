//! Desktop window management.

use proto::{BoolResult, OperationResult, ToolCall};
use serde::{Deserialize, Serialize};

use crate::McpSession;
use crate::invoker::{call_bool, call_json};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Window {
    pub window_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_upper_left_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_upper_left_y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pname: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_windows: Vec<Window>,
}

pub type WindowListResult = OperationResult<Vec<Window>>;
pub type WindowResult = OperationResult<Window>;

pub struct WindowManager<'a> {
    session: &'a dyn McpSession,
}

impl<'a> WindowManager<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    /// Top-level windows with their `child_windows`.
    pub async fn list_root_windows(&self, timeout_ms: u64) -> WindowListResult {
        let call = ToolCall::new("list_root_windows").arg("timeout_ms", timeout_ms);
        call_json(self.session, call, "windows").await
    }

    pub async fn get_active_window(&self, timeout_ms: u64) -> WindowResult {
        let call = ToolCall::new("get_active_window").arg("timeout_ms", timeout_ms);
        call_json(self.session, call, "window").await
    }

    pub async fn activate_window(&self, window_id: i64) -> BoolResult {
        self.window_op("activate_window", window_id).await
    }

    pub async fn maximize_window(&self, window_id: i64) -> BoolResult {
        self.window_op("maximize_window", window_id).await
    }

    pub async fn minimize_window(&self, window_id: i64) -> BoolResult {
        self.window_op("minimize_window", window_id).await
    }

    pub async fn restore_window(&self, window_id: i64) -> BoolResult {
        self.window_op("restore_window", window_id).await
    }

    pub async fn close_window(&self, window_id: i64) -> BoolResult {
        self.window_op("close_window", window_id).await
    }

    pub async fn fullscreen_window(&self, window_id: i64) -> BoolResult {
        self.window_op("fullscreen_window", window_id).await
    }

    pub async fn resize_window(&self, window_id: i64, width: i32, height: i32) -> BoolResult {
        let call = ToolCall::new("resize_window")
            .arg("window_id", window_id)
            .arg("width", width)
            .arg("height", height);
        call_bool(self.session, call).await
    }

    /// Toggles focus mode, which keeps other windows from stealing focus.
    pub async fn focus_mode(&self, on: bool) -> BoolResult {
        call_bool(self.session, ToolCall::new("focus_mode").arg("on", on)).await
    }

    async fn window_op(&self, tool: &str, window_id: i64) -> BoolResult {
        call_bool(
            self.session,
            ToolCall::new(tool).arg("window_id", window_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use proto::ToolResult;

    use super::*;
    use crate::test_support::MockSession;

    #[tokio::test]
    async fn list_root_windows_decodes_nested_children() {
        let payload = r#"[{
            "window_id": 101, "title": "Editor", "width": 800, "height": 600,
            "pid": 77, "pname": "gedit",
            "child_windows": [{"window_id": 102, "title": "Find"}]
        }]"#;
        let session = MockSession::new().reply(ToolResult::success("req-w", payload));
        let result = WindowManager::new(&session).list_root_windows(3000).await;

        assert!(result.success);
        let root = &result.value[0];
        assert_eq!(root.window_id, 101);
        assert_eq!(root.pname.as_deref(), Some("gedit"));
        assert_eq!(root.child_windows[0].title, "Find");
        assert_eq!(session.calls()[0].args["timeout_ms"], 3000);
    }

    #[tokio::test]
    async fn active_window_without_id_is_decode_error() {
        let session =
            MockSession::new().reply(ToolResult::success("req-a", r#"{"title":"nameless"}"#));
        let result = WindowManager::new(&session).get_active_window(1000).await;
        assert!(!result.success);
        assert_eq!(result.request_id, "req-a");
        assert!(result.error_message.starts_with("failed to parse window"));
        assert_eq!(result.value, Window::default());
    }

    #[tokio::test]
    async fn window_state_ops_send_window_id_to_their_tool() {
        let session = MockSession::new()
            .reply(ToolResult::success("r1", ""))
            .reply(ToolResult::success("r2", ""))
            .reply(ToolResult::success("r3", ""))
            .reply(ToolResult::success("r4", ""))
            .reply(ToolResult::success("r5", ""))
            .reply(ToolResult::success("r6", ""));
        let windows = WindowManager::new(&session);

        windows.activate_window(5).await;
        windows.maximize_window(5).await;
        windows.minimize_window(5).await;
        windows.restore_window(5).await;
        windows.fullscreen_window(5).await;
        windows.close_window(5).await;

        let calls = session.calls();
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "activate_window",
                "maximize_window",
                "minimize_window",
                "restore_window",
                "fullscreen_window",
                "close_window"
            ]
        );
        assert!(calls.iter().all(|c| c.args["window_id"] == 5));
    }

    #[tokio::test]
    async fn resize_and_focus_mode_arguments() {
        let session = MockSession::new()
            .reply(ToolResult::success("r1", ""))
            .reply(ToolResult::failure("r2", "focus mode unsupported"));
        let windows = WindowManager::new(&session);

        assert!(windows.resize_window(9, 640, 480).await.success);
        let focus = windows.focus_mode(true).await;
        assert!(!focus.success);
        assert_eq!(focus.error_message, "focus mode unsupported");

        let calls = session.calls();
        assert_eq!(calls[0].args["width"], 640);
        assert_eq!(calls[0].args["height"], 480);
        assert_eq!(calls[1].args["on"], true);
    }
}
