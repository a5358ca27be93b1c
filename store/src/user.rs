//! User profile record and storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use verity_types::{ContentRef, Identity, Timestamp};

/// A voter / journalist profile.
///
/// Keyed by the normalized identity; `identity` keeps the casing used at
/// registration. The article lists are an audit trail only: eligibility is
/// decided from the article's own voter set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub identity: Identity,
    pub display_name: String,
    /// Advisory stake reported by the external staking contract.
    pub stake_balance: u64,
    pub validated_articles: Vec<ContentRef>,
    pub spammed_articles: Vec<ContentRef>,
    pub created_at: Timestamp,
}

impl UserProfile {
    pub fn new(identity: Identity, display_name: String, created_at: Timestamp) -> Self {
        Self {
            identity,
            display_name,
            stake_balance: 0,
            validated_articles: Vec::new(),
            spammed_articles: Vec::new(),
            created_at,
        }
    }

    /// Record a real vote. Returns `false` if the article was already listed.
    pub fn record_validated(&mut self, content_ref: &ContentRef) -> bool {
        push_unique(&mut self.validated_articles, content_ref)
    }

    /// Record a spam vote. Returns `false` if the article was already listed.
    pub fn record_spammed(&mut self, content_ref: &ContentRef) -> bool {
        push_unique(&mut self.spammed_articles, content_ref)
    }
}

fn push_unique(list: &mut Vec<ContentRef>, content_ref: &ContentRef) -> bool {
    if list.contains(content_ref) {
        return false;
    }
    list.push(content_ref.clone());
    true
}

/// Trait for user profile storage. All lookups take a raw identity and
/// compare it case-insensitively.
pub trait UserStore: Send + Sync {
    /// Insert a new profile. Fails with [`StoreError::Duplicate`] if the
    /// normalized identity is already registered.
    fn create_user(&self, profile: &UserProfile) -> Result<(), StoreError>;

    fn find_user(&self, identity: &str) -> Result<UserProfile, StoreError>;

    /// Atomically load, update and persist one profile. Same contract as
    /// [`crate::ArticleStore::mutate`].
    fn mutate_user<T, E, F>(&self, identity: &str, update: F) -> Result<(UserProfile, T), E>
    where
        F: FnOnce(&mut UserProfile) -> Result<T, E>,
        E: From<StoreError>;

    fn user_count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_is_idempotent() {
        let mut user = UserProfile::new(
            Identity::parse("0xV").unwrap(),
            "v".to_string(),
            Timestamp::new(1),
        );
        let cref = ContentRef::parse("QmA").unwrap();
        assert!(user.record_validated(&cref));
        assert!(!user.record_validated(&cref));
        assert_eq!(user.validated_articles.len(), 1);
        assert!(user.spammed_articles.is_empty());
    }
}
