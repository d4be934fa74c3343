// Process executor implementation
// reason: tokio for async process management, nix for process-group kill on unix
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use svccheck_core::constants::MAX_CAPTURE_BYTES;
use svccheck_core::port::command_executor::{
    CommandExecutor, CommandSpec, ExecutionError, ExecutionResult,
};

/// Environment variables passed through to children when nothing else is configured.
/// `SSH_AUTH_SOCK` lets the remote-shell client reach an agent; the Windows
/// entries are needed for powershell to start at all.
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "SSH_AUTH_SOCK",
    "SYSTEMROOT",
    "WINDIR",
    "USERPROFILE",
    "TEMP",
    "TMP",
    "PSModulePath",
];

/// Process executor
/// Spawns the program directly (no shell) with an allow-listed environment,
/// a hard timeout and bounded output capture.
pub struct ProcessExecutor {
    env_allowlist: Vec<String>,
    max_capture_bytes: usize,
}

impl ProcessExecutor {
    /// Create a new process executor
    ///
    /// # Arguments
    /// * `env_allowlist` - Environment variables copied from the current process
    ///
    /// # Example
    /// ```ignore
    /// let executor = ProcessExecutor::new(vec!["PATH".to_string(), "HOME".to_string()]);
    /// ```
    pub fn new(env_allowlist: Vec<String>) -> Self {
        Self {
            env_allowlist,
            max_capture_bytes: MAX_CAPTURE_BYTES,
        }
    }

    /// Override how many bytes per stream are kept
    pub fn with_max_capture_bytes(mut self, max_capture_bytes: usize) -> Self {
        self.max_capture_bytes = max_capture_bytes;
        self
    }

    /// Allow-listed variables present in the current environment
    fn filter_env(&self) -> Vec<(String, std::ffi::OsString)> {
        self.env_allowlist
            .iter()
            .filter_map(|key| std::env::var_os(key).map(|value| (key.clone(), value)))
            .collect()
    }

    fn build_command(&self, spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .env_clear()
            .envs(self.filter_env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // covers callers that drop the check future mid-flight
            .kill_on_drop(true);

        // own process group, so a timeout takes down grandchildren too
        #[cfg(unix)]
        command.process_group(0);

        command
    }

    /// Spawn child process and wait for output, bounded by `timeout`
    async fn spawn_and_wait(
        &self,
        spec: &CommandSpec,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutionError> {
        let start = Instant::now();

        let mut child = self
            .build_command(spec)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", spec.program, e)))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cap = self.max_capture_bytes;

        let collected = tokio::time::timeout(timeout, async {
            let (status, out, err) = tokio::join!(
                child.wait(),
                read_capped(stdout, cap),
                read_capped(stderr, cap)
            );
            Ok::<_, std::io::Error>((status?, out?, err?))
        })
        .await;

        match collected {
            Ok(Ok((status, out, err))) => Ok(ExecutionResult {
                exit_failed: !status.success(),
                exit_code: status.code(),
                stdout: String::from_utf8_lossy(&out).to_string(),
                stderr: String::from_utf8_lossy(&err).to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            }),
            Ok(Err(e)) => {
                terminate(&mut child).await;
                Err(ExecutionError::IoError(e.to_string()))
            }
            Err(_) => {
                let timeout_ms = timeout.as_millis() as u64;
                warn!(
                    program = %spec.program,
                    timeout_ms = timeout_ms,
                    "Command timed out, killing process"
                );
                terminate(&mut child).await;
                Err(ExecutionError::Timeout(timeout_ms))
            }
        }
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect())
    }
}

/// Read a stream to EOF, keeping at most `cap` bytes.
/// Reading continues past the cap so the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(
    reader: Option<R>,
    cap: usize,
) -> std::io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    let Some(mut reader) = reader else {
        return Ok(kept);
    };

    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(kept.len());
        kept.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok(kept)
}

/// Kill the child (its whole process group on unix) and reap it
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                debug!(pid = pid, error = %e, "killpg failed, falling back to kill");
            }
        }
    }

    if let Err(e) = child.start_kill() {
        debug!(error = %e, "Child already exited");
    }
    if let Err(e) = child.wait().await {
        warn!(error = %e, "Failed to reap killed child");
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(
        &self,
        command: &CommandSpec,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutionError> {
        debug!(
            argv = ?command.argv(),
            timeout_ms = timeout.as_millis() as u64,
            "Starting command execution"
        );

        let result = self.spawn_and_wait(command, timeout).await?;

        info!(
            program = %command.program,
            duration_ms = result.duration_ms,
            exit_code = ?result.exit_code,
            "Command execution completed"
        );

        Ok(result)
    }
}
