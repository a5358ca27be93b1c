//! Schema version bookkeeping in the `meta` database.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use verity_store::{MetaStore, StoreError};

use crate::codec::{decode, encode};
use crate::error::store_err;

const SCHEMA_VERSION: &[u8] = b"schema_version";

pub struct LmdbMetaStore {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl MetaStore for LmdbMetaStore {
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(store_err)?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION).map_err(store_err)? {
            Some(bytes) => decode(bytes)
                .map_err(|e| StoreError::Corruption(format!("unreadable schema version: {e}"))),
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        let encoded = encode(&version)?;
        let mut wtxn = self.env.write_txn().map_err(store_err)?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION, &encoded)
            .map_err(store_err)?;
        wtxn.commit().map_err(store_err)
    }
}
