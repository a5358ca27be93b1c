//! Abstract storage traits for Verity.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The engine depends only on the traits.
//!
//! `mutate` methods and [`VoteStore::mutate_with_profile`] are the only way a
//! stored record changes after creation. Implementations must run the whole
//! read-update-write as a single atomic unit: a closure that returns `Err`
//! leaves the stored records untouched.

pub mod article;
pub mod error;
pub mod meta;
pub mod user;
pub mod vote;

pub use article::{sort_newest_first, ArticleRecord, ArticleStore};
pub use error::StoreError;
pub use meta::MetaStore;
pub use user::{UserProfile, UserStore};
pub use vote::VoteStore;
