//! Line-delimited JSON messages exchanged with the host process.

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmEvent;
use crate::tools::{ToolError, ToolResult};

/// Pseudo-tool that returns the schemas of every available tool.
pub const LIST_TOOLS: &str = "tools.list";

/// Error code for lines that are not valid requests.
pub const PARSE_ERROR: &str = "PARSE_ERROR";

/// One tool invocation read from stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque correlation id echoed in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub tool: String,
    #[serde(default = "empty_arguments")]
    pub arguments: serde_json::Value,
}

fn empty_arguments() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Error payload of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Response written to stdout for each [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    pub fn ok(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(
        id: Option<serde_json::Value>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Map a dispatch outcome onto the wire shape.
    pub fn from_outcome(
        id: Option<serde_json::Value>,
        outcome: Result<ToolResult, ToolError>,
    ) -> Self {
        match outcome {
            Ok(result) => Self::ok(id, result.content),
            Err(e) => Self::error(id, e.code(), e.message()),
        }
    }
}

/// Alarm side effect forwarded to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLine {
    pub event: AlarmEvent,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn call_without_arguments_gets_empty_object() {
        let call: ToolCall = serde_json::from_str(r#"{"tool":"self.alarm.list"}"#).unwrap();
        assert_eq!(call.tool, "self.alarm.list");
        assert_eq!(call.arguments, json!({}));
        assert!(call.id.is_none());
    }

    #[test]
    fn ok_response_omits_error() {
        let json = serde_json::to_value(ToolResponse::ok(Some(json!(7)), json!(true))).unwrap();
        assert_eq!(json, json!({"id": 7, "ok": true, "result": true}));
    }

    #[test]
    fn tool_errors_keep_their_code() {
        let resp = ToolResponse::from_outcome(
            None,
            Err(ToolError::Validation("hour must be 0-23".into())),
        );
        assert!(!resp.ok);
        let body = resp.error.unwrap();
        assert_eq!(body.code, "TOOL_VALIDATION");
        assert_eq!(body.message, "hour must be 0-23");
    }

    #[test]
    fn execution_errors_map_to_tool_failed() {
        let resp = ToolResponse::from_outcome(
            Some(json!("r9")),
            Err(ToolError::Execution("timer unavailable".into())),
        );
        assert_eq!(resp.id, Some(json!("r9")));
        assert_eq!(resp.error.unwrap().code, "TOOL_FAILED");
    }

    #[test]
    fn successful_outcome_carries_content() {
        let resp = ToolResponse::from_outcome(None, Ok(ToolResult::success(json!([1, 2]))));
        assert!(resp.ok);
        assert_eq!(resp.result, Some(json!([1, 2])));
    }

    #[test]
    fn event_line_wraps_tagged_event() {
        let line = EventLine {
            event: AlarmEvent::PlaySound {
                alarm_id: 2,
                cue: "popup".into(),
            },
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["event"]["kind"], "play_sound");
        assert_eq!(json["event"]["cue"], "popup");
    }
}
