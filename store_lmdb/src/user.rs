//! LMDB implementation of UserStore.
//!
//! Keyed by the normalized identity so lookups ignore case.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use verity_store::{StoreError, UserProfile, UserStore};
use verity_types::normalize_identity;

use crate::codec::{decode, encode};
use crate::error::store_err;

pub struct LmdbUserStore {
    pub(crate) env: Arc<Env>,
    pub(crate) users_db: Database<Bytes, Bytes>,
}

impl UserStore for LmdbUserStore {
    fn create_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let key = profile.identity.key();
        let mut wtxn = self.env.write_txn().map_err(store_err)?;
        if self
            .users_db
            .get(&wtxn, key.as_bytes())
            .map_err(store_err)?
            .is_some()
        {
            return Err(StoreError::Duplicate(profile.identity.to_string()));
        }
        let bytes = encode(profile)?;
        self.users_db
            .put(&mut wtxn, key.as_bytes(), &bytes)
            .map_err(store_err)?;
        wtxn.commit().map_err(store_err)?;
        Ok(())
    }

    fn find_user(&self, identity: &str) -> Result<UserProfile, StoreError> {
        let key = normalize_identity(identity);
        let rtxn = self.env.read_txn().map_err(store_err)?;
        let bytes = self
            .users_db
            .get(&rtxn, key.as_bytes())
            .map_err(store_err)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        decode(bytes)
    }

    fn mutate_user<T, E, F>(&self, identity: &str, update: F) -> Result<(UserProfile, T), E>
    where
        F: FnOnce(&mut UserProfile) -> Result<T, E>,
        E: From<StoreError>,
    {
        let key = normalize_identity(identity);
        let mut wtxn = self.env.write_txn().map_err(store_err)?;
        let bytes = self
            .users_db
            .get(&wtxn, key.as_bytes())
            .map_err(store_err)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        let mut profile: UserProfile = decode(bytes)?;
        let out = update(&mut profile)?;
        let encoded = encode(&profile)?;
        self.users_db
            .put(&mut wtxn, key.as_bytes(), &encoded)
            .map_err(store_err)?;
        wtxn.commit().map_err(store_err)?;
        Ok((profile, out))
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(store_err)?;
        self.users_db.len(&rtxn).map_err(store_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use verity_types::{ContentRef, Identity, Timestamp};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    fn profile(id: &str) -> UserProfile {
        UserProfile::new(
            Identity::parse(id).unwrap(),
            "reader".to_string(),
            Timestamp::new(1),
        )
    }

    #[test]
    fn lookup_ignores_case() {
        let (_dir, env) = temp_env();
        let store = env.user_store();
        store.create_user(&profile("0xAbCdEf")).unwrap();
        let found = store.find_user("0XABCDEF").unwrap();
        assert_eq!(found.identity.as_str(), "0xAbCdEf");
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[test]
    fn duplicate_identity_rejected_regardless_of_case() {
        let (_dir, env) = temp_env();
        let store = env.user_store();
        store.create_user(&profile("0xabc")).unwrap();
        assert!(matches!(
            store.create_user(&profile("0xABC")),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn mutate_user_appends_history() {
        let (_dir, env) = temp_env();
        let store = env.user_store();
        store.create_user(&profile("0xabc")).unwrap();
        let cref = ContentRef::parse("QmA").unwrap();
        let (updated, added) = store
            .mutate_user::<bool, StoreError, _>("0xABC", |p| Ok(p.record_spammed(&cref)))
            .unwrap();
        assert!(added);
        assert_eq!(updated.spammed_articles, vec![cref.clone()]);
        assert_eq!(store.find_user("0xabc").unwrap().spammed_articles, vec![cref]);
    }
}
