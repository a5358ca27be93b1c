//! Record encoding for LMDB values (bincode).

use serde::de::DeserializeOwned;
use serde::Serialize;
use verity_store::StoreError;

use crate::LmdbError;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value).map_err(LmdbError::from)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
}
