//! Errors raised while constructing core types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("content reference must not be empty")]
    EmptyContentRef,

    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("quorum must be a positive vote count")]
    ZeroQuorum,

    #[error("majority threshold {0} bps is outside 1..=10000")]
    InvalidMajority(u32),
}
