// Service checker: the single entry point of the engine.
// Resolves (method, platform) to exactly one strategy and delegates to it.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::settings::CheckSettings;
use crate::application::strategy::CheckStrategy;
use crate::domain::{CheckMethod, CheckOutcome, CheckRequest, HostOs, ParsedTarget, RemotePlatform};
use crate::error::{echo_input, CheckError, Result};
use crate::port::CommandExecutor;

/// Dispatcher over the four check strategies.
///
/// Holds no per-check state, so one instance can serve any number of
/// concurrent checks.
///
/// # Example
/// ```ignore
/// let checker = ServiceChecker::new(
///     Arc::new(ProcessExecutor::default()),
///     HostOs::current(),
///     CheckSettings::default(),
/// );
/// let outcome = checker.check(&CheckRequest::local("nginx")).await;
/// ```
pub struct ServiceChecker {
    executor: Arc<dyn CommandExecutor>,
    host_os: HostOs,
    settings: CheckSettings,
}

impl ServiceChecker {
    pub fn new(executor: Arc<dyn CommandExecutor>, host_os: HostOs, settings: CheckSettings) -> Self {
        Self {
            executor,
            host_os,
            settings,
        }
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Pick the strategy for a request without running anything
    pub fn resolve(&self, request: &CheckRequest) -> Result<CheckStrategy> {
        if request.service_name.is_empty() {
            return Err(CheckError::MissingConfiguration(
                "no service name supplied".to_string(),
            ));
        }

        match request.method {
            CheckMethod::Local => match &self.host_os {
                HostOs::Linux => Ok(CheckStrategy::LinuxLocal),
                HostOs::Windows => Ok(CheckStrategy::WindowsLocal),
                HostOs::Other(os) => Err(CheckError::UnsupportedPlatform(format!(
                    "local checks are not supported on '{}'",
                    os
                ))),
            },
            CheckMethod::Remote => {
                let raw = request
                    .remote_target
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| {
                        CheckError::MissingConfiguration(
                            "remote method selected without a remote target".to_string(),
                        )
                    })?;
                let platform = request.platform()?;
                let target = ParsedTarget::parse(raw)?;

                Ok(match platform {
                    RemotePlatform::Linux => CheckStrategy::LinuxRemote(target),
                    RemotePlatform::Windows => CheckStrategy::WindowsRemote(target),
                })
            }
        }
    }

    /// Run one check; errors stay distinguishable
    pub async fn try_check(&self, request: &CheckRequest) -> Result<CheckOutcome> {
        let strategy = self.resolve(request)?;
        strategy
            .check(
                self.executor.as_ref(),
                &self.settings,
                &request.service_name,
                request.timeout,
            )
            .await
    }

    /// Run one check and fold every error into a Down outcome.
    /// This is what the heartbeat layer records.
    pub async fn check(&self, request: &CheckRequest) -> CheckOutcome {
        match self.try_check(request).await {
            Ok(outcome) => {
                info!(
                    service = %request.service_name,
                    method = %request.method,
                    status = %outcome.status,
                    "Service check completed"
                );
                outcome
            }
            Err(e) => {
                warn!(
                    service = %echo_input(&request.service_name),
                    method = %request.method,
                    error_kind = e.kind(),
                    error = %e,
                    "Service check failed"
                );
                CheckOutcome::down(e.to_string())
            }
        }
    }
}
