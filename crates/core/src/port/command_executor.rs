// Command Executor Port
// Abstraction for running one external command under a hard timeout.
// Adapters must never hand the command line to a shell: argv is passed as-is.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{MAX_DIAGNOSTIC_CHARS, TRUNCATION_MARKER};

/// Program plus ordered, already-safe arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program followed by its arguments, in argv order
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Raw result of a process that ran to completion
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub exit_failed: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Truncated stdout on exit code zero, `NonZeroExit` otherwise
    pub fn into_output(self) -> Result<String, ExecutionError> {
        if self.exit_failed {
            return Err(ExecutionError::NonZeroExit {
                code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            });
        }
        Ok(truncate_output(&self.stdout))
    }
}

/// Execution errors
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0}ms")]
    Timeout(u64),

    #[error("Process exited with {}", describe_exit(.code))]
    NonZeroExit {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

const GENERIC_FAILURE: &str = "Command failed";

impl ExecutionError {
    /// What the process itself printed: stderr first, then stdout.
    /// None when both are blank or the process never produced output.
    pub fn captured_output(&self) -> Option<String> {
        match self {
            ExecutionError::NonZeroExit { stdout, stderr, .. } => [stderr, stdout]
                .into_iter()
                .map(|s| truncate_output(s))
                .find(|s| !s.is_empty()),
            _ => None,
        }
    }

    /// Single bounded diagnostic: captured output, else the execution-layer
    /// description, else a generic fallback
    pub fn diagnostic(&self) -> String {
        if let Some(output) = self.captured_output() {
            return output;
        }
        let description = truncate_output(&self.to_string());
        if description.is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            description
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionError::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}

/// Trim, then cut to the diagnostic budget and mark the cut
pub fn truncate_output(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(MAX_DIAGNOSTIC_CHARS) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], TRUNCATION_MARKER),
        None => trimmed.to_string(),
    }
}

/// Command Executor trait
///
/// Implementations:
/// - ProcessExecutor (infra-system): spawns a local process
/// - mocks::MockCommandExecutor: scripted responses plus call recording
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run a command to completion or until `timeout` expires
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the program cannot be started
    /// - ExecutionError::Timeout if the deadline passed; the process is gone when this returns
    /// - ExecutionError::IoError if waiting on the process failed
    ///
    /// A non-zero exit is NOT an error here: it comes back as
    /// `ExecutionResult { exit_failed: true, .. }`.
    async fn run(
        &self,
        command: &CommandSpec,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 with this stdout
        Success(String),
        /// Exit with code and output
        Exit {
            code: i32,
            stdout: String,
            stderr: String,
        },
        /// Program could not be started
        SpawnFailed(String),
        /// Deadline passed after N ms
        Timeout(u64),
    }

    /// Mock Command Executor for testing; records every command it is asked to run
    #[derive(Clone)]
    pub struct MockCommandExecutor {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<CommandSpec>>>,
    }

    impl MockCommandExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_success(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Success(stdout.into()))
        }
        pub fn new_exit(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            })
        }
        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }
        pub fn last_call(&self) -> Option<CommandSpec> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn run(
            &self,
            command: &CommandSpec,
            _timeout: Duration,
        ) -> Result<ExecutionResult, ExecutionError> {
            self.calls.lock().unwrap().push(command.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success(stdout) => Ok(ExecutionResult {
                    exit_failed: false,
                    exit_code: Some(0),
                    stdout,
                    stderr: String::new(),
                    duration_ms: 1,
                }),
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(ExecutionResult {
                    exit_failed: code != 0,
                    exit_code: Some(code),
                    stdout,
                    stderr,
                    duration_ms: 1,
                }),
                MockBehavior::SpawnFailed(msg) => Err(ExecutionError::SpawnFailed(msg)),
                MockBehavior::Timeout(ms) => Err(ExecutionError::Timeout(ms)),
            }
        }
    }
}
