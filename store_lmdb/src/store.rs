//! Combined article + user store over one LMDB environment.
//!
//! Both databases share the environment, so a vote and the voter's profile
//! history can be committed in the same write transaction.

use verity_store::{ArticleRecord, ArticleStore, StoreError, UserProfile, UserStore, VoteStore};
use verity_types::{normalize_identity, ContentRef};

use crate::codec::{decode, encode};
use crate::error::store_err;
use crate::{LmdbArticleStore, LmdbUserStore};

pub struct LmdbStore {
    pub(crate) articles: LmdbArticleStore,
    pub(crate) users: LmdbUserStore,
}

impl ArticleStore for LmdbStore {
    fn create(&self, article: &ArticleRecord) -> Result<ContentRef, StoreError> {
        self.articles.create(article)
    }

    fn find(&self, content_ref: &ContentRef) -> Result<ArticleRecord, StoreError> {
        self.articles.find(content_ref)
    }

    fn mutate<T, E, F>(&self, content_ref: &ContentRef, update: F) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.articles.mutate(content_ref, update)
    }

    fn remove(&self, content_ref: &ContentRef) -> Result<(), StoreError> {
        self.articles.remove(content_ref)
    }

    fn list(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        self.articles.list()
    }

    fn article_count(&self) -> Result<u64, StoreError> {
        self.articles.article_count()
    }
}

impl UserStore for LmdbStore {
    fn create_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.users.create_user(profile)
    }

    fn find_user(&self, identity: &str) -> Result<UserProfile, StoreError> {
        self.users.find_user(identity)
    }

    fn mutate_user<T, E, F>(&self, identity: &str, update: F) -> Result<(UserProfile, T), E>
    where
        F: FnOnce(&mut UserProfile) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.users.mutate_user(identity, update)
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        self.users.user_count()
    }
}

impl VoteStore for LmdbStore {
    fn mutate_with_profile<T, E, F>(
        &self,
        content_ref: &ContentRef,
        identity: &str,
        update: F,
    ) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord, Option<&mut UserProfile>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let article_key = content_ref.as_bytes();
        let user_key = normalize_identity(identity);
        let articles_db = self.articles.articles_db;
        let users_db = self.users.users_db;

        let mut wtxn = self.articles.env.write_txn().map_err(store_err)?;
        let bytes = articles_db
            .get(&wtxn, article_key)
            .map_err(store_err)?
            .ok_or_else(|| StoreError::NotFound(content_ref.to_string()))?;
        let mut record: ArticleRecord = decode(bytes)?;
        let mut profile: Option<UserProfile> = match users_db
            .get(&wtxn, user_key.as_bytes())
            .map_err(store_err)?
        {
            Some(bytes) => Some(decode(bytes)?),
            None => None,
        };

        // An Err here drops `wtxn`; neither record is written.
        let out = update(&mut record, profile.as_mut())?;

        let encoded = encode(&record)?;
        articles_db
            .put(&mut wtxn, article_key, &encoded)
            .map_err(store_err)?;
        if let Some(profile) = &profile {
            let encoded = encode(profile)?;
            users_db
                .put(&mut wtxn, user_key.as_bytes(), &encoded)
                .map_err(store_err)?;
        }
        wtxn.commit().map_err(store_err)?;
        Ok((record, out))
    }
}
