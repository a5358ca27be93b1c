//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (storage, clock) are abstracted behind traits or
//! plain values. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
