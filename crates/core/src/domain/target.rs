// Remote connection target
// Pure parsing of `ssh://[user@]host[:port]`; nothing here touches the network.

use tracing::warn;
use url::{Host, Url};

use crate::constants::REMOTE_SHELL_SCHEME;
use crate::error::{echo_input, CheckError, Result};

/// Where the remote-shell client connects to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTarget {
    /// `user@host` or `host`
    pub user_host: String,
    /// None means the client's default port
    pub port: Option<u16>,
}

impl ParsedTarget {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| {
            CheckError::InvalidTarget(format!("'{}' is not a valid URL: {}", echo_input(raw), e))
        })?;

        if url.scheme() != REMOTE_SHELL_SCHEME {
            return Err(CheckError::InvalidTarget(format!(
                "unsupported scheme '{}', expected '{}://'",
                echo_input(url.scheme()),
                REMOTE_SHELL_SCHEME
            )));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            // the client wants the bare address, not the bracketed URL form
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => {
                return Err(CheckError::InvalidTarget(format!(
                    "'{}' has no hostname",
                    echo_input(raw)
                )))
            }
        };
        check_token("hostname", &host)?;

        if url.password().is_some() {
            warn!(
                host = %host,
                "Ignoring password in remote target; key-based authentication is required"
            );
        }

        let user_host = if url.username().is_empty() {
            host
        } else {
            let user = urlencoding::decode(url.username())
                .map_err(|e| CheckError::InvalidTarget(format!("bad username encoding: {}", e)))?;
            check_token("username", &user)?;
            format!("{}@{}", user, host)
        };

        let port = match url.port() {
            Some(0) => {
                return Err(CheckError::InvalidTarget(
                    "port must be between 1 and 65535".to_string(),
                ))
            }
            other => other,
        };

        Ok(Self { user_host, port })
    }
}

/// The user-host ends up as its own argv entry of the remote-shell client,
/// so it must not look like an option or carry separators.
fn check_token(what: &str, value: &str) -> Result<()> {
    if value.starts_with('-') {
        return Err(CheckError::InvalidTarget(format!(
            "{} cannot start with '-'",
            what
        )));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CheckError::InvalidTarget(format!(
            "{} contains whitespace or control characters",
            what
        )));
    }
    Ok(())
}
