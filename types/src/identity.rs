//! Wallet-style voter and journalist identities.
//!
//! Identities are self-reported address strings. No signature is checked; the
//! backend trusts whatever the client presents. Comparisons for voting, the
//! voter set and user lookup all go through [`normalize_identity`].

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical form of an identity: surrounding whitespace removed, lower-cased.
///
/// Every membership or equality check on identities uses this function.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// An identity as presented by the client, original casing preserved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Parse an identity, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identity exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The normalized key used for lookups and voter-set membership.
    pub fn key(&self) -> String {
        normalize_identity(&self.0)
    }

    /// Case-insensitive comparison against another raw identity string.
    pub fn matches(&self, other: &str) -> bool {
        self.key() == normalize_identity(other)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
