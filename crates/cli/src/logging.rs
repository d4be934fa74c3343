//! Logging setup: pretty or JSON events on stderr, stdout stays for results

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,svccheck_core=debug,svccheck_infra_system=debug,svccheck_cli=debug";

/// Initialize tracing
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives, wins over `--verbose`
/// - `SVCCHECK_LOG_FORMAT`: `json` for structured logs, anything else for pretty
pub fn init_logging(verbose: bool) -> Result<()> {
    let log_format = std::env::var("SVCCHECK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    match log_format.as_str() {
        "json" => {
            // Machine-readable structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
