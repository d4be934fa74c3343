// Engine constants (no magic values in strategies or adapters)
use std::time::Duration;

/// Hard upper bound on one check when the request does not set one (5s)
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_millis(5000);

/// Characters of diagnostic text kept before the truncation marker
pub const MAX_DIAGNOSTIC_CHARS: usize = 200;

/// Appended when diagnostic text was cut
pub const TRUNCATION_MARKER: &str = "...";

/// Bytes captured per stream before the rest is discarded (64 KiB).
/// Keeps memory bounded no matter how chatty the child process is.
pub const MAX_CAPTURE_BYTES: usize = 64 * 1024;

/// Port the remote-shell client uses when none is given
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Connect timeout handed to the remote-shell client (seconds)
pub const DEFAULT_SSH_CONNECT_TIMEOUT_SECS: u64 = 5;

/// URL scheme accepted for remote targets
pub const REMOTE_SHELL_SCHEME: &str = "ssh";

/// What a healthy Windows service reports
pub const WINDOWS_RUNNING_STATUS: &str = "Running";

/// Exit code the OpenSSH client uses for its own (transport) errors
pub const SSH_TRANSPORT_EXIT_CODE: i32 = 255;

/// Characters of user input quoted back in an error message
pub const MAX_ECHOED_INPUT_CHARS: usize = 64;

/// Longest service name accepted (systemd and the Windows SCM both stop at 256)
pub const MAX_SERVICE_NAME_CHARS: usize = 256;
