//! Article record and storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use verity_types::{normalize_identity, ContentRef, Identity, Timestamp};

/// One article's content reference, tallies, voter set, spam evidence and flags.
///
/// `voters` holds normalized identities (see [`normalize_identity`]) in the
/// order their votes were accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub content_ref: ContentRef,
    pub author: Identity,
    pub title: String,
    pub tags: Vec<String>,
    /// Reference images supplied at creation.
    pub evidence_refs: Vec<ContentRef>,
    /// One justification reference per accepted spam vote.
    pub spam_evidence: Vec<ContentRef>,
    pub real_votes: u64,
    pub spam_votes: u64,
    pub voters: Vec<String>,
    pub verified: bool,
    pub deleted: bool,
    pub pending_update: bool,
    pub created_at: Timestamp,
}

impl ArticleRecord {
    /// A fresh article with no votes and all flags cleared.
    pub fn new(
        content_ref: ContentRef,
        author: Identity,
        title: String,
        tags: Vec<String>,
        evidence_refs: Vec<ContentRef>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            content_ref,
            author,
            title,
            tags,
            evidence_refs,
            spam_evidence: Vec::new(),
            real_votes: 0,
            spam_votes: 0,
            voters: Vec::new(),
            verified: false,
            deleted: false,
            pending_update: false,
            created_at,
        }
    }

    /// Whether `identity` (any casing) has already voted on this article.
    pub fn has_voter(&self, identity: &str) -> bool {
        let key = normalize_identity(identity);
        self.voters.iter().any(|v| *v == key)
    }

    pub fn is_authored_by(&self, identity: &str) -> bool {
        self.author.matches(identity)
    }

    /// Total accepted votes of either kind.
    pub fn total_votes(&self) -> u64 {
        self.real_votes + self.spam_votes
    }

    /// Checks the structural invariants of the vote state: one voter entry per
    /// counted vote, one evidence entry per spam vote, no duplicate voters and
    /// the author never among them.
    pub fn invariants_hold(&self) -> bool {
        let unique = {
            let mut seen = self.voters.clone();
            seen.sort();
            seen.dedup();
            seen.len() == self.voters.len()
        };
        self.voters.len() as u64 == self.total_votes()
            && self.spam_evidence.len() as u64 == self.spam_votes
            && unique
            && !self.has_voter(self.author.as_str())
    }
}

/// Newest first by `created_at`; ties broken by content reference so listings
/// are stable across backends.
pub fn sort_newest_first(articles: &mut [ArticleRecord]) {
    articles.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.content_ref.cmp(&b.content_ref))
    });
}

/// Trait for article storage operations, keyed by content reference.
pub trait ArticleStore: Send + Sync {
    /// Insert a new article. Fails with [`StoreError::Duplicate`] if the
    /// content reference is already taken.
    fn create(&self, article: &ArticleRecord) -> Result<ContentRef, StoreError>;

    fn find(&self, content_ref: &ContentRef) -> Result<ArticleRecord, StoreError>;

    /// Atomically load, update and persist one article.
    ///
    /// `update` runs with exclusive access to the record; concurrent mutations
    /// of the same content reference are serialized. If `update` returns
    /// `Err`, nothing is written and the error is returned as is. A missing
    /// article yields `StoreError::NotFound` converted into `E`.
    fn mutate<T, E, F>(&self, content_ref: &ContentRef, update: F) -> Result<(ArticleRecord, T), E>
    where
        F: FnOnce(&mut ArticleRecord) -> Result<T, E>,
        E: From<StoreError>;

    /// Physically remove an article.
    fn remove(&self, content_ref: &ContentRef) -> Result<(), StoreError>;

    /// All articles, newest first.
    fn list(&self) -> Result<Vec<ArticleRecord>, StoreError>;

    /// Articles written by `author` (any casing), newest first.
    fn list_by_author(&self, author: &str) -> Result<Vec<ArticleRecord>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|a| a.is_authored_by(author))
            .collect())
    }

    fn article_count(&self) -> Result<u64, StoreError>;
}
