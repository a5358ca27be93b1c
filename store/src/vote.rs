//! Combined article + voter profile mutation.

use verity_types::ContentRef;

use crate::{ArticleRecord, ArticleStore, StoreError, UserProfile, UserStore};

/// Storage that can update an article and one user's profile as a single
/// atomic unit.
pub trait VoteStore: ArticleStore + UserStore {
    /// Atomically load the article and the profile registered under
    /// `identity`, run `update`, and persist both.
    ///
    /// The profile is `None` when `identity` is not registered; `update`
    /// decides whether that is an error. If `update` returns `Err`, neither
    /// record is written. A missing article yields `StoreError::NotFound`
    /// converted into `E`.
    fn mutate_with_profile<T, E, F>(
        &self,
        content_ref: &ContentRef,
        identity: &str,
        update: F,
    ) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord, Option<&mut UserProfile>) -> Result<T, E>,
        E: From<StoreError>;
}
