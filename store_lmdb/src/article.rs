//! LMDB implementation of ArticleStore.
//!
//! Keyed by the content reference bytes; values are bincode-encoded
//! [`ArticleRecord`]s.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use verity_store::{sort_newest_first, ArticleRecord, ArticleStore, StoreError};
use verity_types::ContentRef;

use crate::codec::{decode, encode};
use crate::error::store_err;

pub struct LmdbArticleStore {
    pub(crate) env: Arc<Env>,
    pub(crate) articles_db: Database<Bytes, Bytes>,
}

impl ArticleStore for LmdbArticleStore {
    fn create(&self, article: &ArticleRecord) -> Result<ContentRef, StoreError> {
        let key = article.content_ref.as_bytes();
        let mut wtxn = self.env.write_txn().map_err(store_err)?;
        if self.articles_db.get(&wtxn, key).map_err(store_err)?.is_some() {
            return Err(StoreError::Duplicate(article.content_ref.to_string()));
        }
        let bytes = encode(article)?;
        self.articles_db
            .put(&mut wtxn, key, &bytes)
            .map_err(store_err)?;
        wtxn.commit().map_err(store_err)?;
        Ok(article.content_ref.clone())
    }

    fn find(&self, content_ref: &ContentRef) -> Result<ArticleRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(store_err)?;
        let bytes = self
            .articles_db
            .get(&rtxn, content_ref.as_bytes())
            .map_err(store_err)?
            .ok_or_else(|| StoreError::NotFound(content_ref.to_string()))?;
        decode(bytes)
    }

    fn mutate<T, E, F>(&self, content_ref: &ContentRef, update: F) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord) -> Result<T, E>,
        E: From<StoreError>,
    {
        let key = content_ref.as_bytes();
        let mut wtxn = self.env.write_txn().map_err(store_err)?;
        let bytes = self
            .articles_db
            .get(&wtxn, key)
            .map_err(store_err)?
            .ok_or_else(|| StoreError::NotFound(content_ref.to_string()))?;
        let mut record: ArticleRecord = decode(bytes)?;

        // An Err here drops `wtxn`, aborting the transaction.
        let out = update(&mut record)?;

        let encoded = encode(&record)?;
        self.articles_db
            .put(&mut wtxn, key, &encoded)
            .map_err(store_err)?;
        wtxn.commit().map_err(store_err)?;
        Ok((record, out))
    }

    fn remove(&self, content_ref: &ContentRef) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(store_err)?;
        let existed = self
            .articles_db
            .delete(&mut wtxn, content_ref.as_bytes())
            .map_err(store_err)?;
        if !existed {
            return Err(StoreError::NotFound(content_ref.to_string()));
        }
        wtxn.commit().map_err(store_err)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(store_err)?;
        let mut out = Vec::new();
        for entry in self.articles_db.iter(&rtxn).map_err(store_err)? {
            let (_key, bytes) = entry.map_err(store_err)?;
            out.push(decode::<ArticleRecord>(bytes)?);
        }
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn article_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(store_err)?;
        self.articles_db.len(&rtxn).map_err(store_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use verity_types::{Identity, Timestamp};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    fn article(cref: &str, created: u64) -> ArticleRecord {
        ArticleRecord::new(
            ContentRef::parse(cref).unwrap(),
            Identity::parse("0xAuthor").unwrap(),
            "Flooding in the valley".to_string(),
            vec!["weather".to_string()],
            vec![ContentRef::parse("QmImage").unwrap()],
            Timestamp::new(created),
        )
    }

    #[test]
    fn create_find_roundtrip() {
        let (_dir, env) = temp_env();
        let store = env.article_store();
        let a = article("QmA", 10);
        store.create(&a).unwrap();
        assert_eq!(store.find(&a.content_ref).unwrap(), a);
        assert_eq!(store.article_count().unwrap(), 1);
    }

    #[test]
    fn duplicate_is_rejected() {
        let (_dir, env) = temp_env();
        let store = env.article_store();
        store.create(&article("QmA", 10)).unwrap();
        assert!(matches!(
            store.create(&article("QmA", 11)),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn mutate_persists_and_abort_does_not() {
        let (_dir, env) = temp_env();
        let store = env.article_store();
        let cref = ContentRef::parse("QmA").unwrap();
        store.create(&article("QmA", 10)).unwrap();

        let (updated, ()) = store
            .mutate::<(), StoreError, _>(&cref, |a| {
                a.real_votes += 1;
                a.voters.push("0xv1".to_string());
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.real_votes, 1);

        let aborted = store.mutate::<(), StoreError, _>(&cref, |a| {
            a.real_votes += 1;
            Err(StoreError::Backend("abort".to_string()))
        });
        assert!(aborted.is_err());
        assert_eq!(store.find(&cref).unwrap().real_votes, 1);
    }

    #[test]
    fn mutate_missing_is_not_found() {
        let (_dir, env) = temp_env();
        let store = env.article_store();
        let cref = ContentRef::parse("QmNope").unwrap();
        let result = store.mutate::<(), StoreError, _>(&cref, |_| Ok(()));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn remove_deletes_record() {
        let (_dir, env) = temp_env();
        let store = env.article_store();
        let cref = ContentRef::parse("QmA").unwrap();
        store.create(&article("QmA", 10)).unwrap();
        store.remove(&cref).unwrap();
        assert!(matches!(store.find(&cref), Err(StoreError::NotFound(_))));
        assert!(matches!(store.remove(&cref), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, env) = temp_env();
        let store = env.article_store();
        store.create(&article("QmOld", 1)).unwrap();
        store.create(&article("QmNew", 5)).unwrap();
        let refs: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|a| a.content_ref.to_string())
            .collect();
        assert_eq!(refs, vec!["QmNew", "QmOld"]);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
            env.article_store().create(&article("QmA", 10)).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let found = env
            .article_store()
            .find(&ContentRef::parse("QmA").unwrap())
            .unwrap();
        assert_eq!(found.title, "Flooding in the valley");
    }
}
