// Central Error Type for a check invocation

use thiserror::Error;

use crate::constants::{MAX_ECHOED_INPUT_CHARS, TRUNCATION_MARKER};

/// Everything a check can fail with.
///
/// Each variant carries a message that is safe to show to users and to
/// persist: subprocess text inside it has already been truncated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("Invalid service name '{name}': {reason}")]
    InvalidServiceName { name: String, reason: String },

    #[error("Invalid remote target: {0}")]
    InvalidTarget(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Non-zero exit, timeout or spawn failure; the message says which
    #[error("{0}")]
    CommandFailed(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),
}

/// Result type alias using CheckError
pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    /// Stable kind name for logs and machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::InvalidServiceName { .. } => "invalid_service_name",
            CheckError::InvalidTarget(_) => "invalid_target",
            CheckError::UnsupportedPlatform(_) => "unsupported_platform",
            CheckError::CommandFailed(_) => "command_failed",
            CheckError::MissingConfiguration(_) => "missing_configuration",
        }
    }
}

/// Caller-supplied text as it may appear inside an error: control characters
/// escaped, at most `MAX_ECHOED_INPUT_CHARS` characters plus the marker.
pub(crate) fn echo_input(raw: &str) -> String {
    let escaped = raw.escape_debug().to_string();
    match escaped.char_indices().nth(MAX_ECHOED_INPUT_CHARS) {
        Some((cut, _)) => format!("{}{}", &escaped[..cut], TRUNCATION_MARKER),
        None => escaped,
    }
}
