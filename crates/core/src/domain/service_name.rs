// Service name allow-lists
// Names are validated before any command is built. Anything outside the
// allow-list is rejected, even names the service manager would accept.

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::MAX_SERVICE_NAME_CHARS;
use crate::error::{echo_input, CheckError, Result};

/// Which allow-list applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFamily {
    /// systemd unit names (templates like `getty@tty1` included)
    Linux,
    /// Windows service key names
    Windows,
}

fn linux_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._\-@]+$").expect("static regex"))
}

fn windows_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static regex"))
}

/// A service name that passed its platform allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse(raw: &str, family: ServiceFamily) -> Result<Self> {
        let (pattern, reason) = match family {
            ServiceFamily::Linux => (
                linux_pattern(),
                "use the internal Service Name, no spaces",
            ),
            ServiceFamily::Windows => (
                windows_pattern(),
                "only alphanumerics, '.', '_' and '-' are allowed",
            ),
        };

        if raw.chars().count() > MAX_SERVICE_NAME_CHARS {
            return Err(CheckError::InvalidServiceName {
                name: echo_input(raw),
                reason: format!("longer than {} characters", MAX_SERVICE_NAME_CHARS),
            });
        }

        if !pattern.is_match(raw) {
            return Err(CheckError::InvalidServiceName {
                name: echo_input(raw),
                reason: reason.to_string(),
            });
        }

        // Allowed by the character set, but systemctl would parse it as an option
        if family == ServiceFamily::Linux && raw.starts_with('-') {
            return Err(CheckError::InvalidServiceName {
                name: echo_input(raw),
                reason: "a leading '-' would be read by systemctl as an option".to_string(),
            });
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
