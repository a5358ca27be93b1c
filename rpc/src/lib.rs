//! HTTP API for the Verity service.
//!
//! Provides endpoints for:
//! - Article submission, lookup and listing (all or per journalist)
//! - Real and spam votes
//! - Verification runs and update acknowledgement
//! - User registration, login and stake updates
//! - Liveness and Prometheus metrics

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use error::RpcError;
pub use metrics::RpcMetrics;
pub use server::{router, AppState, RpcServer};
