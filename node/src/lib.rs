//! Verity service node.
//!
//! Wires configuration, LMDB storage, the article engine and the HTTP API
//! together and owns the process lifecycle:
//! - Loads and validates [`NodeConfig`]
//! - Opens the LMDB environment, runs schema migrations and an integrity check
//! - Serves the HTTP API until a shutdown signal arrives

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::{LmdbAppState, VerityNode};
pub use shutdown::ShutdownController;
