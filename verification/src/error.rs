use thiserror::Error;
use verity_store::StoreError;
use verity_types::TypesError;

use crate::guard::Denial;

/// Client-facing classification of a [`VerificationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("article not found: {0}")]
    ArticleNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("an article with content reference {0} already exists")]
    DuplicateContentRef(String),

    #[error("user with wallet address {0} already exists")]
    DuplicateUser(String),

    #[error("{0}")]
    Denied(#[from] Denial),

    #[error("spam evidence reference must not be empty")]
    InvalidEvidence,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerificationError::ArticleNotFound(_) | VerificationError::UserNotFound(_) => ErrorKind::NotFound,
            VerificationError::DuplicateContentRef(_)
            | VerificationError::DuplicateUser(_)
            | VerificationError::Denied(_) => ErrorKind::Conflict,
            VerificationError::InvalidEvidence | VerificationError::InvalidInput(_) => {
                ErrorKind::InvalidInput
            }
            VerificationError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Store errors reaching the engine through article operations. User paths
/// map `NotFound` / `Duplicate` themselves.
impl From<StoreError> for VerificationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => VerificationError::ArticleNotFound(key),
            StoreError::Duplicate(key) => VerificationError::DuplicateContentRef(key),
            other => VerificationError::Store(other),
        }
    }
}

impl From<TypesError> for VerificationError {
    fn from(e: TypesError) -> Self {
        VerificationError::InvalidInput(e.to_string())
    }
}
