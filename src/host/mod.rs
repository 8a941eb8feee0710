//! Host-facing JSON-lines bridge for driving the alarm tools from another
//! process.

pub mod protocol;
pub mod stdio;

pub use protocol::{EventLine, ToolCall, ToolResponse};
pub use stdio::{handle_call, run_bridge, run_stdio_bridge};
