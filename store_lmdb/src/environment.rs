//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbArticleStore, LmdbError, LmdbMetaStore, LmdbStore, LmdbUserStore};

pub(crate) const ARTICLES_DB: &str = "articles";
pub(crate) const USERS_DB: &str = "users";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    articles_db: Database<Bytes, Bytes>,
    users_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Upper bound on named databases in the environment.
    pub const MAX_DBS: u32 = 8;

    /// Open or create an LMDB environment at the given path, creating the
    /// directory and all named databases if needed.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path and
        // the memory map is never modified outside of heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(Self::MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let articles_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(ARTICLES_DB))?;
        let users_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(USERS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            articles_db,
            users_db,
            meta_db,
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn article_store(&self) -> LmdbArticleStore {
        LmdbArticleStore {
            env: self.env.clone(),
            articles_db: self.articles_db,
        }
    }

    pub fn user_store(&self) -> LmdbUserStore {
        LmdbUserStore {
            env: self.env.clone(),
            users_db: self.users_db,
        }
    }

    /// Article and user stores sharing this environment.
    pub fn store(&self) -> LmdbStore {
        LmdbStore {
            articles: self.article_store(),
            users: self.user_store(),
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: self.env.clone(),
            meta_db: self.meta_db,
        }
    }
}
