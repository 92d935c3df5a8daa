//! Desktop mouse, keyboard and screen operations.

use proto::{BoolResult, OperationResult, ToolCall};
use serde::{Deserialize, Serialize};

use crate::McpSession;
use crate::invoker::{call_bool, call_json, call_text, check_choice};

/// Buttons accepted by `click_mouse`.
pub const CLICK_BUTTONS: &[&str] = &["left", "right", "middle", "double_left"];
/// Buttons accepted by `drag_mouse`.
pub const DRAG_BUTTONS: &[&str] = &["left", "right", "middle"];
/// Directions accepted by `scroll`.
pub const SCROLL_DIRECTIONS: &[&str] = &["up", "down", "left", "right"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
    #[serde(rename = "dpiScalingFactor")]
    pub dpi_scaling_factor: f64,
}

pub type CursorPositionResult = OperationResult<CursorPosition>;
pub type ScreenSizeResult = OperationResult<ScreenSize>;
/// Value is the screenshot URL or encoded image returned by the service.
pub type ScreenshotResult = OperationResult<String>;

/// Desktop automation for one session.
pub struct Computer<'a> {
    session: &'a dyn McpSession,
}

impl<'a> Computer<'a> {
    pub fn new(session: &'a dyn McpSession) -> Self {
        Self { session }
    }

    /// Clicks `button` at `(x, y)`.
    pub async fn click_mouse(&self, x: i32, y: i32, button: &str) -> BoolResult {
        if let Err(e) = check_choice("button", button, CLICK_BUTTONS) {
            return BoolResult::from_error("", &e);
        }
        let call = ToolCall::new("click_mouse")
            .arg("x", x)
            .arg("y", y)
            .arg("button", button);
        call_bool(self.session, call).await
    }

    /// Moves the cursor to absolute screen coordinates.
    pub async fn move_mouse(&self, x: i32, y: i32) -> BoolResult {
        let call = ToolCall::new("move_mouse").arg("x", x).arg("y", y);
        call_bool(self.session, call).await
    }

    /// Drags from `(from_x, from_y)` to `(to_x, to_y)` holding `button`.
    pub async fn drag_mouse(
        &self,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        button: &str,
    ) -> BoolResult {
        if let Err(e) = check_choice("button", button, DRAG_BUTTONS) {
            return BoolResult::from_error("", &e);
        }
        let call = ToolCall::new("drag_mouse")
            .arg("from_x", from_x)
            .arg("from_y", from_y)
            .arg("to_x", to_x)
            .arg("to_y", to_y)
            .arg("button", button);
        call_bool(self.session, call).await
    }

    /// Scrolls `amount` steps in `direction` at `(x, y)`.
    pub async fn scroll(&self, x: i32, y: i32, direction: &str, amount: i32) -> BoolResult {
        if let Err(e) = check_choice("direction", direction, SCROLL_DIRECTIONS) {
            return BoolResult::from_error("", &e);
        }
        let call = ToolCall::new("scroll")
            .arg("x", x)
            .arg("y", y)
            .arg("direction", direction)
            .arg("amount", amount);
        call_bool(self.session, call).await
    }

    /// Current cursor position in screen coordinates.
    pub async fn get_cursor_position(&self) -> CursorPositionResult {
        call_json(
            self.session,
            ToolCall::new("get_cursor_position"),
            "cursor position",
        )
        .await
    }

    /// Types `text` into the focused element.
    pub async fn input_text(&self, text: &str) -> BoolResult {
        call_bool(self.session, ToolCall::new("input_text").arg("text", text)).await
    }

    /// Presses `keys` together; with `hold` they stay down until `release_keys`.
    pub async fn press_keys(&self, keys: &[&str], hold: bool) -> BoolResult {
        let call = ToolCall::new("press_keys")
            .arg("keys", keys.to_vec())
            .arg("hold", hold);
        call_bool(self.session, call).await
    }

    pub async fn release_keys(&self, keys: &[&str]) -> BoolResult {
        call_bool(
            self.session,
            ToolCall::new("release_keys").arg("keys", keys.to_vec()),
        )
        .await
    }

    pub async fn get_screen_size(&self) -> ScreenSizeResult {
        call_json(self.session, ToolCall::new("get_screen_size"), "screen size").await
    }

    pub async fn screenshot(&self) -> ScreenshotResult {
        call_text(self.session, ToolCall::new("system_screenshot")).await
    }
}
