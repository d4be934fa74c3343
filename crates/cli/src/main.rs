//! svccheck CLI - Run service health checks from the command line
//! Local checks go straight to the service manager; remote checks go over ssh.

mod logging;
mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::stream::{self, StreamExt};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use svccheck_core::{CheckRequest, CheckSettings, HostOs, ServiceChecker};
use svccheck_infra_system::{ProcessExecutor, DEFAULT_ENV_ALLOWLIST};

use report::CheckReport;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_TIMEOUT_MS: &str = "5000";
const DEFAULT_CONCURRENCY: &str = "8";

#[derive(Parser)]
#[command(name = "svccheck")]
#[command(about = "Check whether an OS service is running, locally or over SSH", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    engine: EngineArgs,

    /// Log debug details (argv, timings) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Engine configuration; every flag can also come from the environment
#[derive(Args)]
struct EngineArgs {
    /// JSON file with engine settings (flags below override it)
    #[arg(long, global = true, env = "SVCCHECK_CONFIG")]
    config: Option<String>,

    /// Remote-shell client
    #[arg(long, global = true, env = "SVCCHECK_SSH")]
    ssh: Option<String>,

    /// Local service manager (Linux)
    #[arg(long, global = true, env = "SVCCHECK_SYSTEMCTL")]
    systemctl: Option<String>,

    /// Status-query shell (Windows)
    #[arg(long, global = true, env = "SVCCHECK_POWERSHELL")]
    powershell: Option<String>,

    /// Connect timeout handed to the remote-shell client, in seconds
    #[arg(long, global = true, env = "SVCCHECK_CONNECT_TIMEOUT")]
    connect_timeout: Option<u64>,

    /// Environment variables passed to spawned commands
    #[arg(long, global = true, env = "SVCCHECK_ENV_ALLOW", value_delimiter = ',')]
    env_allow: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single service
    Check {
        /// Internal service name (e.g. nginx, sshd.service, W32Time)
        service: String,

        /// Check on a remote host instead, e.g. ssh://ops@web-1:2222
        #[arg(long, value_name = "URL")]
        remote: Option<String>,

        /// OS of the remote host (linux or windows)
        #[arg(long, default_value = "linux")]
        platform: String,

        /// Hard limit for the whole check
        #[arg(long, env = "SVCCHECK_TIMEOUT_MS", default_value = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every check listed in a JSON file
    Batch {
        /// JSON array of check requests
        file: String,

        /// Checks running at the same time
        #[arg(short, long, default_value = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

impl EngineArgs {
    fn settings(&self) -> Result<CheckSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let path = shellexpand::tilde(path).into_owned();
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {}", path))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid config file {}", path))?
            }
            None => CheckSettings::default(),
        };

        if let Some(ssh) = &self.ssh {
            settings.ssh_program = shellexpand::tilde(ssh).into_owned();
        }
        if let Some(systemctl) = &self.systemctl {
            settings.systemctl_program = shellexpand::tilde(systemctl).into_owned();
        }
        if let Some(powershell) = &self.powershell {
            settings.powershell_program = powershell.clone();
        }
        if let Some(secs) = self.connect_timeout {
            settings.ssh_connect_timeout_secs = secs;
        }
        Ok(settings)
    }

    fn executor(&self) -> ProcessExecutor {
        match &self.env_allow {
            Some(keys) => ProcessExecutor::new(keys.clone()),
            None => ProcessExecutor::new(DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect()),
        }
    }
}

fn load_requests(file: &str) -> Result<Vec<CheckRequest>> {
    let path = shellexpand::tilde(file).into_owned();
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read batch file {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid batch file {}", path))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose)?;

    info!("svccheck v{} starting", VERSION);

    let settings = cli.engine.settings()?;
    let checker = Arc::new(ServiceChecker::new(
        Arc::new(cli.engine.executor()),
        HostOs::current(),
        settings,
    ));

    match cli.command {
        Commands::Check {
            service,
            remote,
            platform,
            timeout_ms,
            json,
        } => {
            let request = match remote {
                Some(target) => CheckRequest::remote(service, target, platform),
                None => CheckRequest::local(service),
            }
            .with_timeout(Duration::from_millis(timeout_ms));

            let outcome = checker.check(&request).await;
            let report = CheckReport::new(&request, outcome);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report::print_line(&report);
            }

            Ok(report::exit_code(std::slice::from_ref(&report)))
        }

        Commands::Batch {
            file,
            concurrency,
            json,
        } => {
            let requests = load_requests(&file)?;
            info!(checks = requests.len(), concurrency, "Running batch");

            let reports: Vec<CheckReport> = stream::iter(requests)
                .map(|request| {
                    let checker = checker.clone();
                    async move {
                        let outcome = checker.check(&request).await;
                        CheckReport::new(&request, outcome)
                    }
                })
                .buffered(concurrency.max(1))
                .collect()
                .await;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                report::print_table(&reports);
            }

            Ok(report::exit_code(&reports))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svccheck_core::{CheckMethod, RemotePlatform};

    fn engine_args() -> EngineArgs {
        EngineArgs {
            config: None,
            ssh: None,
            systemctl: None,
            powershell: None,
            connect_timeout: None,
            env_allow: None,
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = EngineArgs {
            ssh: Some("/usr/bin/ssh".to_string()),
            connect_timeout: Some(2),
            ..engine_args()
        };

        let settings = args.settings().unwrap();

        assert_eq!(settings.ssh_program, "/usr/bin/ssh");
        assert_eq!(settings.ssh_connect_timeout_secs, 2);
        assert_eq!(settings.systemctl_program, "systemctl");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = EngineArgs {
            config: Some("/nonexistent/svccheck.json".to_string()),
            ..engine_args()
        };

        assert!(args.settings().is_err());
    }

    #[test]
    fn test_cli_parses_remote_check() {
        let cli = Cli::try_parse_from([
            "svccheck",
            "check",
            "W32Time",
            "--remote",
            "ssh://admin@win-1",
            "--platform",
            "windows",
            "--timeout-ms",
            "2000",
        ])
        .unwrap();

        match cli.command {
            Commands::Check {
                service,
                remote,
                platform,
                timeout_ms,
                json,
            } => {
                assert_eq!(service, "W32Time");
                assert_eq!(remote.as_deref(), Some("ssh://admin@win-1"));
                assert_eq!(platform, "windows");
                assert_eq!(timeout_ms, 2000);
                assert!(!json);
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_batch_file_defaults() {
        let dir = std::env::temp_dir().join(format!("svccheck-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("checks.json");
        std::fs::write(
            &path,
            r#"[
                { "service_name": "nginx" },
                { "service_name": "sshd", "method": "remote", "remote_target": "ssh://web-1" },
                { "service_name": "x", "method": "remote", "remote_target": "ssh://web-1", "remote_platform": "solaris" }
            ]"#,
        )
        .unwrap();

        let requests = load_requests(path.to_str().unwrap()).unwrap();

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, CheckMethod::Local);
        assert_eq!(requests[1].method, CheckMethod::Remote);
        assert_eq!(requests[1].platform().unwrap(), RemotePlatform::Linux);
        // an unknown platform fails that one check later, not the whole file
        assert!(requests[2].platform().is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
