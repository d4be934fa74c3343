// svccheck Core - Domain, Ports & Check Strategies
// NO process spawning here: adapters implement the ports (infra-system)

pub mod application;
pub mod constants;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{CheckSettings, CheckStrategy, ServiceChecker};
pub use domain::{CheckMethod, CheckOutcome, CheckRequest, CheckStatus, HostOs, RemotePlatform};
pub use error::{CheckError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
