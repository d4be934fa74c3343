// Domain Layer - Check model, validation and target parsing (pure logic)

pub mod check;
pub mod host;
pub mod service_name;
pub mod target;

// Re-exports
pub use check::{CheckMethod, CheckOutcome, CheckRequest, CheckStatus, RemotePlatform};
pub use host::HostOs;
pub use service_name::{ServiceFamily, ServiceName};
pub use target::ParsedTarget;
