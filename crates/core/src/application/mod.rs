// Application Layer - Check strategies, dispatch and command construction

pub mod checker;
pub mod remote_shell;
pub mod settings;
pub mod shell;
pub mod strategy;

// Re-exports
pub use checker::ServiceChecker;
pub use settings::CheckSettings;
pub use shell::{join_posix, quote_posix};
pub use strategy::CheckStrategy;
