use proto::{BoolResult, OperationResult, ToolError, ToolResult};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn failed_envelope_keeps_request_id_and_zero_value() {
    let envelope = ToolResult::failure("req-77", "session not ready");
    let typed: OperationResult<Point> = OperationResult::from_failed(&envelope);

    assert!(!typed.success);
    assert_eq!(typed.request_id, "req-77");
    assert_eq!(typed.error_message, "session not ready");
    assert_eq!(typed.value, Point::default());
}

#[test]
fn decode_failure_is_distinct_from_remote_failure() {
    let envelope = ToolResult::success("req-5", "not json");
    let decoded = serde_json::from_str::<Point>(&envelope.data)
        .map_err(|e| ToolError::decode("cursor position", e));

    let err = decoded.expect_err("payload should not decode");
    let typed: OperationResult<Point> = OperationResult::from_error(&envelope.request_id, &err);

    assert!(!typed.success);
    assert_eq!(typed.request_id, "req-5");
    assert!(typed.error_message.starts_with("failed to parse cursor position"));
}

#[test]
fn envelope_serializes_with_snake_case_fields() {
    let envelope = ToolResult::success("req-123", "");
    let json = serde_json::to_value(&envelope).expect("serialize envelope");

    assert_eq!(json["request_id"], "req-123");
    assert_eq!(json["success"], true);
    assert_eq!(json["error_message"], "");

    let back: ToolResult = serde_json::from_value(json).expect("deserialize envelope");
    assert_eq!(back, envelope);
}

#[test]
fn bool_result_value_tracks_success() {
    let ok = BoolResult::from_tool_result(&ToolResult::success("req-1", ""));
    assert!(ok.success && ok.value);

    let busy = BoolResult::from_tool_result(&ToolResult::failure("req-2", "busy"));
    assert!(!busy.success && !busy.value);
}
