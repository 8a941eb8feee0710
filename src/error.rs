//! Error types for the alarm subsystem.

/// Top-level error type for alarm storage, scheduling, and configuration.
#[derive(Debug, thiserror::Error)]
pub enum AlarmError {
    /// Key/value storage read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The deadline timer could not be created or armed.
    #[error("timer error: {0}")]
    Timer(String),

    /// Alarm list could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AlarmError>;
