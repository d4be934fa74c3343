// Check settings: which external programs to call and how to reach remotes
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SSH_CONNECT_TIMEOUT_SECS;

/// Engine configuration shared by every check a `ServiceChecker` runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Local service manager (Linux)
    pub systemctl_program: String,
    /// Scripting shell that answers status queries (Windows)
    pub powershell_program: String,
    /// Remote-shell client
    pub ssh_program: String,
    /// Passed to the remote-shell client as `ConnectTimeout`
    pub ssh_connect_timeout_secs: u64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            systemctl_program: "systemctl".to_string(),
            powershell_program: "powershell".to_string(),
            ssh_program: "ssh".to_string(),
            ssh_connect_timeout_secs: DEFAULT_SSH_CONNECT_TIMEOUT_SECS,
        }
    }
}
