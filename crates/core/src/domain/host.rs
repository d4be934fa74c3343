// Host operating system the engine runs on.
// Injected into the dispatcher so tests can pretend to be any platform.

/// OS family of the local machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Linux,
    Windows,
    Other(String),
}

impl HostOs {
    /// Detect the OS this binary was built for
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "linux" => HostOs::Linux,
            "windows" => HostOs::Windows,
            other => HostOs::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostOs::Linux => write!(f, "linux"),
            HostOs::Windows => write!(f, "windows"),
            HostOs::Other(name) => write!(f, "{}", name),
        }
    }
}
