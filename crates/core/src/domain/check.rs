// Check Domain Model
// One CheckRequest in, one CheckOutcome out. Nothing here outlives a single check.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::DEFAULT_CHECK_TIMEOUT;
use crate::error::{echo_input, CheckError};

/// How the service is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMethod {
    #[default]
    Local,
    Remote,
}

/// Operating system family of a remote target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePlatform {
    #[default]
    Linux,
    Windows,
}

impl std::fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMethod::Local => write!(f, "local"),
            CheckMethod::Remote => write!(f, "remote"),
        }
    }
}

impl std::fmt::Display for RemotePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemotePlatform::Linux => write!(f, "linux"),
            RemotePlatform::Windows => write!(f, "windows"),
        }
    }
}

impl std::str::FromStr for RemotePlatform {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "linux" => Ok(RemotePlatform::Linux),
            "windows" => Ok(RemotePlatform::Windows),
            other => Err(CheckError::UnsupportedPlatform(format!(
                "remote platform '{}' (expected linux or windows)",
                echo_input(other)
            ))),
        }
    }
}

/// Input of a single check invocation.
///
/// Field names follow the wire format used by batch files:
///
/// ```text
/// { "service_name": "nginx", "method": "remote",
///   "remote_target": "ssh://ops@web-1:2222", "remote_platform": "linux",
///   "timeout_ms": 3000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub service_name: String,

    #[serde(default)]
    pub method: CheckMethod,

    #[serde(default)]
    pub remote_target: Option<String>,

    /// Kept as written so an unknown value fails this request only; None or
    /// empty means linux
    #[serde(default)]
    pub remote_platform: Option<String>,

    #[serde(
        rename = "timeout_ms",
        default = "default_timeout",
        with = "duration_millis"
    )]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_CHECK_TIMEOUT
}

impl CheckRequest {
    /// Local check with the default timeout
    pub fn local(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            method: CheckMethod::Local,
            remote_target: None,
            remote_platform: None,
            timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    /// Remote check over the remote-shell client
    pub fn remote(
        service_name: impl Into<String>,
        target: impl Into<String>,
        platform: impl ToString,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            method: CheckMethod::Remote,
            remote_target: Some(target.into()),
            remote_platform: Some(platform.to_string()),
            timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Effective remote platform (defaults to linux)
    pub fn platform(&self) -> crate::error::Result<RemotePlatform> {
        match &self.remote_platform {
            Some(raw) => raw.parse(),
            None => Ok(RemotePlatform::default()),
        }
    }
}

/// Normalized status reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Up,
    Down,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Up => write!(f, "UP"),
            CheckStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// Result handed back to the heartbeat collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckOutcome {
    pub fn up(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Up,
            message: message.into(),
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Down,
            message: message.into(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == CheckStatus::Up
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
