//! LMDB storage backend for Verity.
//!
//! Implements the storage traits from `verity-store` using the `heed` LMDB
//! bindings. Articles, users and metadata each live in their own named
//! database inside a single environment.
//!
//! Every `mutate` runs its read, update and write inside one LMDB write
//! transaction, and [`LmdbStore`] commits a vote together with the voter's
//! profile in the same transaction. LMDB admits a single writer at a time, so concurrent
//! mutations are serialized and an aborted update simply drops the
//! transaction.

pub mod article;
pub mod codec;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod store;
pub mod user;

pub use article::LmdbArticleStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use store::LmdbStore;
pub use user::LmdbUserStore;
