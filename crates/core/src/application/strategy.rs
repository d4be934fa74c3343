// Platform check strategies
// Closed set: {Linux, Windows} x {local, remote}. Each one is a single pass
// (validate -> build -> execute -> interpret) with no retries.

use std::time::Duration;
use tracing::{debug, warn};

use crate::application::remote_shell::wrap_remote;
use crate::application::settings::CheckSettings;
use crate::constants::{SSH_TRANSPORT_EXIT_CODE, WINDOWS_RUNNING_STATUS};
use crate::domain::{CheckOutcome, ParsedTarget, ServiceFamily, ServiceName};
use crate::error::{CheckError, Result};
use crate::port::{CommandExecutor, CommandSpec, ExecutionError};

/// One of the four ways a service can be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStrategy {
    LinuxLocal,
    WindowsLocal,
    LinuxRemote(ParsedTarget),
    WindowsRemote(ParsedTarget),
}

impl CheckStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            CheckStrategy::LinuxLocal => "linux-local",
            CheckStrategy::WindowsLocal => "windows-local",
            CheckStrategy::LinuxRemote(_) => "linux-remote",
            CheckStrategy::WindowsRemote(_) => "windows-remote",
        }
    }

    pub fn family(&self) -> ServiceFamily {
        match self {
            CheckStrategy::LinuxLocal | CheckStrategy::LinuxRemote(_) => ServiceFamily::Linux,
            CheckStrategy::WindowsLocal | CheckStrategy::WindowsRemote(_) => {
                ServiceFamily::Windows
            }
        }
    }

    fn target(&self) -> Option<&ParsedTarget> {
        match self {
            CheckStrategy::LinuxRemote(target) | CheckStrategy::WindowsRemote(target) => {
                Some(target)
            }
            _ => None,
        }
    }

    /// Command for an already validated name
    pub fn build_command(&self, service: &ServiceName, settings: &CheckSettings) -> CommandSpec {
        let query = match self.family() {
            ServiceFamily::Linux => linux_query(service, settings),
            ServiceFamily::Windows => windows_query(service, settings),
        };

        match self.target() {
            Some(target) => wrap_remote(settings, target, query.argv().as_slice()),
            None => query,
        }
    }

    /// Validate, run and interpret. `Err` is returned for invalid names and
    /// for commands that failed; a status query that answered with anything
    /// other than "running" is an `Ok` outcome with status Down.
    pub async fn check(
        &self,
        executor: &dyn CommandExecutor,
        settings: &CheckSettings,
        service_name: &str,
        timeout: Duration,
    ) -> Result<CheckOutcome> {
        let service = ServiceName::parse(service_name, self.family())?;
        let command = self.build_command(&service, settings);

        debug!(
            strategy = self.name(),
            service = %service,
            argv = ?command.argv(),
            "Running status query"
        );

        let result = executor
            .run(&command, timeout)
            .await
            .and_then(|r| r.into_output());

        match self.family() {
            ServiceFamily::Linux => interpret_linux(&service, result),
            ServiceFamily::Windows => self.interpret_windows(&service, result),
        }
    }

    fn interpret_windows(
        &self,
        service: &ServiceName,
        result: std::result::Result<String, ExecutionError>,
    ) -> Result<CheckOutcome> {
        match result {
            Ok(output) if output == WINDOWS_RUNNING_STATUS => Ok(running(service)),
            Ok(output) if output.is_empty() => Ok(CheckOutcome::down(not_found(service))),
            Ok(output) => Ok(CheckOutcome::down(format!(
                "Service '{}' is {}.",
                service, output
            ))),
            Err(err @ ExecutionError::NonZeroExit { .. }) => {
                // Over the remote shell a failure may be the connection, not the
                // query; the outcome wording does not tell them apart.
                if self.target().is_some() && err.exit_code() == Some(SSH_TRANSPORT_EXIT_CODE) {
                    warn!(
                        service = %service,
                        diagnostic = %err.diagnostic(),
                        "Remote-shell transport failed during status query"
                    );
                } else {
                    debug!(service = %service, diagnostic = %err.diagnostic(), "Status query failed");
                }
                Err(CheckError::CommandFailed(not_found(service)))
            }
            Err(err) => Err(execution_failed(service, &err)),
        }
    }
}

fn linux_query(service: &ServiceName, settings: &CheckSettings) -> CommandSpec {
    CommandSpec::new(&settings.systemctl_program)
        .arg("is-active")
        .arg(service.as_str())
}

/// `Get-Service` inside a single-quoted PowerShell literal, where a quote is
/// written twice
fn windows_query(service: &ServiceName, settings: &CheckSettings) -> CommandSpec {
    let literal = service.as_str().replace('\'', "''");
    CommandSpec::new(&settings.powershell_program).args([
        "-NoProfile".to_string(),
        "-NonInteractive".to_string(),
        "-Command".to_string(),
        format!("(Get-Service -Name '{}').Status", literal),
    ])
}

fn interpret_linux(
    service: &ServiceName,
    result: std::result::Result<String, ExecutionError>,
) -> Result<CheckOutcome> {
    match result {
        Ok(_) => Ok(running(service)),
        Err(err @ ExecutionError::NonZeroExit { .. }) => {
            let message = match err.captured_output() {
                Some(output) => format!("Service '{}' is {}.", service, output),
                None => format!("Service '{}' is not running.", service),
            };
            Err(CheckError::CommandFailed(message))
        }
        Err(err) => Err(execution_failed(service, &err)),
    }
}

fn running(service: &ServiceName) -> CheckOutcome {
    CheckOutcome::up(format!("Service '{}' is running.", service))
}

fn not_found(service: &ServiceName) -> String {
    format!("Service '{}' is not running/found.", service)
}

/// Spawn failure, timeout or I/O error: nothing was learned about the service
fn execution_failed(service: &ServiceName, err: &ExecutionError) -> CheckError {
    CheckError::CommandFailed(format!(
        "Service '{}' check failed: {}",
        service,
        err.diagnostic()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::command_executor::mocks::{MockBehavior, MockCommandExecutor};
    use proptest::prelude::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn remote(user_host: &str, port: Option<u16>) -> ParsedTarget {
        ParsedTarget {
            user_host: user_host.to_string(),
            port,
        }
    }

    async fn run(
        strategy: CheckStrategy,
        executor: &MockCommandExecutor,
        name: &str,
    ) -> Result<CheckOutcome> {
        strategy
            .check(executor, &CheckSettings::default(), name, TIMEOUT)
            .await
    }

    #[tokio::test]
    async fn test_linux_local_issues_exact_query() {
        let executor = MockCommandExecutor::new_success("active\n");

        let outcome = run(CheckStrategy::LinuxLocal, &executor, "nginx").await.unwrap();

        assert_eq!(outcome, CheckOutcome::up("Service 'nginx' is running."));
        let call = executor.last_call().unwrap();
        assert_eq!(call.argv(), vec!["systemctl", "is-active", "nginx"]);
    }

    #[tokio::test]
    async fn test_linux_inactive_reports_output() {
        let executor = MockCommandExecutor::new_exit(3, "inactive\n", "");

        let err = run(CheckStrategy::LinuxLocal, &executor, "nginx").await.unwrap_err();

        assert_eq!(
            err,
            CheckError::CommandFailed("Service 'nginx' is inactive.".to_string())
        );
    }

    #[tokio::test]
    async fn test_linux_silent_failure_is_not_running() {
        let executor = MockCommandExecutor::new_exit(3, "", "");

        let err = run(CheckStrategy::LinuxLocal, &executor, "nginx").await.unwrap_err();

        assert_eq!(err.to_string(), "Service 'nginx' is not running.");
    }

    #[tokio::test]
    async fn test_linux_remote_embeds_stderr() {
        let executor = MockCommandExecutor::new_exit(4, "", "Unit foo.service not found.");

        let err = run(CheckStrategy::LinuxRemote(remote("ops@db", None)), &executor, "foo")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Service 'foo' is Unit foo.service not found.."
        );
        let call = executor.last_call().unwrap();
        assert_eq!(call.program, "ssh");
        assert_eq!(call.args.last().unwrap(), "'systemctl' 'is-active' 'foo'");
    }

    #[tokio::test]
    async fn test_linux_long_stderr_is_truncated() {
        let executor = MockCommandExecutor::new_exit(1, "", "e".repeat(500));

        let err = run(CheckStrategy::LinuxLocal, &executor, "nginx").await.unwrap_err();

        let expected = format!("Service 'nginx' is {}....", "e".repeat(200));
        assert_eq!(err.to_string(), expected);
    }

    #[tokio::test]
    async fn test_timeout_is_command_failed_with_distinct_message() {
        let executor = MockCommandExecutor::new(MockBehavior::Timeout(5000));

        let err = run(CheckStrategy::LinuxLocal, &executor, "nginx").await.unwrap_err();

        assert!(matches!(err, CheckError::CommandFailed(_)));
        assert_eq!(
            err.to_string(),
            "Service 'nginx' check failed: Process timeout after 5000ms"
        );
    }

    #[tokio::test]
    async fn test_windows_local_running() {
        let executor = MockCommandExecutor::new_success("Running\r\n");

        let outcome = run(CheckStrategy::WindowsLocal, &executor, "W32Time").await.unwrap();

        assert!(outcome.is_up());
        assert_eq!(
            executor.last_call().unwrap().argv(),
            vec![
                "powershell",
                "-NoProfile",
                "-NonInteractive",
                "-Command",
                "(Get-Service -Name 'W32Time').Status",
            ]
        );
    }

    #[tokio::test]
    async fn test_windows_local_stopped() {
        let executor = MockCommandExecutor::new_success("Stopped\n");

        let outcome = run(CheckStrategy::WindowsLocal, &executor, "nginx").await.unwrap();

        assert_eq!(outcome, CheckOutcome::down("Service 'nginx' is Stopped."));
    }

    #[tokio::test]
    async fn test_windows_status_is_compared_literally() {
        let executor = MockCommandExecutor::new_success("running");

        let outcome = run(CheckStrategy::WindowsLocal, &executor, "nginx").await.unwrap();

        assert!(!outcome.is_up());
    }

    #[tokio::test]
    async fn test_windows_empty_output_is_not_found() {
        let executor = MockCommandExecutor::new_success("  ");

        let outcome = run(CheckStrategy::WindowsLocal, &executor, "ghost").await.unwrap();

        assert_eq!(outcome.message, "Service 'ghost' is not running/found.");
    }

    #[tokio::test]
    async fn test_windows_remote_transport_error_collapses() {
        let executor =
            MockCommandExecutor::new_exit(255, "", "ssh: connect to host win-1 port 22: Connection refused");

        let err = run(
            CheckStrategy::WindowsRemote(remote("admin@win-1", Some(2200))),
            &executor,
            "Spooler",
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Service 'Spooler' is not running/found.");
        let call = executor.last_call().unwrap();
        assert_eq!(
            call.args,
            vec![
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=5",
                "-p",
                "2200",
                "--",
                "admin@win-1",
                "'powershell' '-NoProfile' '-NonInteractive' '-Command' '(Get-Service -Name '\"'\"'Spooler'\"'\"').Status'",
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_names_never_reach_executor() {
        let strategies = [
            CheckStrategy::LinuxLocal,
            CheckStrategy::WindowsLocal,
            CheckStrategy::LinuxRemote(remote("h", None)),
            CheckStrategy::WindowsRemote(remote("h", None)),
        ];
        let executor = MockCommandExecutor::new_success("Running");

        for strategy in strategies {
            for name in ["", "a b", "x;reboot", "$(id)", "it's"] {
                let err = run(strategy.clone(), &executor, name).await.unwrap_err();
                assert!(
                    matches!(err, CheckError::InvalidServiceName { .. }),
                    "{} accepted {:?}",
                    strategy.name(),
                    name
                );
            }
        }

        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_windows_rejects_linux_template_names() {
        let executor = MockCommandExecutor::new_success("Running");

        let err = run(CheckStrategy::WindowsLocal, &executor, "getty@tty1")
            .await
            .unwrap_err();

        assert!(matches!(err, CheckError::InvalidServiceName { .. }));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let executor = MockCommandExecutor::new(MockBehavior::SpawnFailed(
            "No such file or directory (os error 2)".to_string(),
        ));

        let err = run(CheckStrategy::WindowsLocal, &executor, "nginx").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Service 'nginx' check failed: Spawn failed: No such file or directory (os error 2)"
        );
    }

    proptest! {
        #[test]
        fn prop_linux_local_argv_is_exact(name in "[a-zA-Z0-9._@][a-zA-Z0-9._\\-@]{0,63}") {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let executor = MockCommandExecutor::new_success("active");

            let outcome = runtime.block_on(run(CheckStrategy::LinuxLocal, &executor, &name));

            prop_assert!(outcome.unwrap().is_up());
            prop_assert_eq!(executor.call_count(), 1);
            let call = executor.last_call().unwrap();
            prop_assert_eq!(call.argv(), vec!["systemctl", "is-active", name.as_str()]);
        }
    }
}
