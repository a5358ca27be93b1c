//! Fundamental types for Verity.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! content references, voter identities, timestamps and the voting parameters.

pub mod content;
pub mod error;
pub mod identity;
pub mod params;
pub mod time;

pub use content::ContentRef;
pub use error::TypesError;
pub use identity::{normalize_identity, Identity};
pub use params::VotingParams;
pub use time::Timestamp;
