// svccheck Infrastructure - System Adapters
// Implements: CommandExecutor

pub mod process_executor;

pub use process_executor::{ProcessExecutor, DEFAULT_ENV_ALLOWLIST};
