//! Error types for the tool layer.
//!
//! Each variant carries a stable error code (SCREAMING_SNAKE_CASE) that is
//! included in the Display output and accessible via [`ToolError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Arguments missing, mistyped, or out of range.
    pub const TOOL_VALIDATION: &str = "TOOL_VALIDATION";

    /// The tool ran but the alarm manager reported a failure.
    pub const TOOL_FAILED: &str = "TOOL_FAILED";

    /// No tool is registered under the requested name.
    pub const TOOL_NOT_FOUND: &str = "TOOL_NOT_FOUND";

    /// The tool exists but the current mode does not allow it.
    pub const TOOL_BLOCKED: &str = "TOOL_BLOCKED";
}

/// Errors produced by tool execution and dispatch.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("[{}] {}", error_codes::TOOL_VALIDATION, .0)]
    Validation(String),

    #[error("[{}] {}", error_codes::TOOL_FAILED, .0)]
    Execution(String),

    #[error("[{}] {}", error_codes::TOOL_NOT_FOUND, .0)]
    NotFound(String),

    #[error("[{}] {}", error_codes::TOOL_BLOCKED, .0)]
    Blocked(String),
}

impl ToolError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => error_codes::TOOL_VALIDATION,
            Self::Execution(_) => error_codes::TOOL_FAILED,
            Self::NotFound(_) => error_codes::TOOL_NOT_FOUND,
            Self::Blocked(_) => error_codes::TOOL_BLOCKED,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Execution(m) | Self::NotFound(m) | Self::Blocked(m) => m,
        }
    }
}

impl From<crate::error::AlarmError> for ToolError {
    fn from(e: crate::error::AlarmError) -> Self {
        Self::Execution(e.to_string())
    }
}
