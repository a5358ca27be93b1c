//! Article engine: wires the guard, vote application, decision procedure and
//! reset protocol to the store.

use std::sync::Arc;

use tracing::{debug, info, warn};
use verity_store::{ArticleRecord, ArticleStore, StoreError, VoteStore};
use verity_types::{ContentRef, Identity, Timestamp, VotingParams};

use crate::decision::{DecisionProcedure, Outcome};
use crate::error::VerificationError;
use crate::guard::Denial;
use crate::reset::{self, ResetOutcome};
use crate::voting::{ArticleVoting, Vote, VoteKind};

/// Unvalidated input for a new article.
#[derive(Clone, Debug, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub author: String,
    pub content_ref: String,
    pub tags: Vec<String>,
    pub evidence_refs: Vec<String>,
}

impl ArticleDraft {
    /// Validate the draft into a fresh record created at `now`.
    ///
    /// Title, author and content reference are required; blank tags are
    /// dropped; a blank evidence reference is rejected.
    pub fn into_record(self, now: Timestamp) -> Result<ArticleRecord, VerificationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(VerificationError::InvalidInput(
                "article title must not be empty".to_string(),
            ));
        }
        let author = Identity::parse(self.author)?;
        let content_ref = ContentRef::parse(self.content_ref)?;
        let tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let evidence_refs = self
            .evidence_refs
            .into_iter()
            .map(ContentRef::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArticleRecord::new(
            content_ref,
            author,
            title.to_string(),
            tags,
            evidence_refs,
            now,
        ))
    }
}

/// Map a store error raised on a user path.
pub(crate) fn user_error(e: StoreError) -> VerificationError {
    match e {
        StoreError::NotFound(key) => VerificationError::UserNotFound(key),
        StoreError::Duplicate(key) => VerificationError::DuplicateUser(key),
        other => VerificationError::Store(other),
    }
}

/// Orchestrates every article operation.
///
/// All state changes go through the store's atomic mutations, so the engine
/// itself holds no locks and can be shared freely across threads.
pub struct ArticleEngine<S> {
    store: Arc<S>,
    voting: ArticleVoting,
    decision: DecisionProcedure,
}

impl<S: VoteStore> ArticleEngine<S> {
    pub fn new(store: Arc<S>, params: VotingParams) -> Self {
        Self {
            store,
            voting: ArticleVoting,
            decision: DecisionProcedure::new(params),
        }
    }

    pub fn params(&self) -> VotingParams {
        self.decision.params()
    }

    /// Store a new article. Fails with `DuplicateContentRef` if the content
    /// reference is taken.
    pub fn create_article(
        &self,
        draft: ArticleDraft,
        now: Timestamp,
    ) -> Result<ArticleRecord, VerificationError> {
        let record = draft.into_record(now)?;
        self.store.create(&record)?;
        info!(
            content_ref = %record.content_ref,
            author = %record.author,
            "article created"
        );
        Ok(record)
    }

    pub fn find_article(&self, content_ref: &ContentRef) -> Result<ArticleRecord, VerificationError> {
        debug!(%content_ref, "article lookup");
        Ok(self.store.find(content_ref)?)
    }

    /// All articles, newest first.
    pub fn list_articles(&self) -> Result<Vec<ArticleRecord>, VerificationError> {
        Ok(self.store.list()?)
    }

    /// Articles by one journalist (any casing), newest first.
    pub fn articles_by_author(&self, author: &str) -> Result<Vec<ArticleRecord>, VerificationError> {
        Ok(self.store.list_by_author(author)?)
    }

    pub fn cast_real_vote(
        &self,
        content_ref: &ContentRef,
        voter: &str,
    ) -> Result<ArticleRecord, VerificationError> {
        self.cast(content_ref, voter, Vote::Real)
    }

    /// Report an article as spam. `evidence` references the off-chain
    /// justification and must not be blank.
    pub fn cast_spam_vote(
        &self,
        content_ref: &ContentRef,
        voter: &str,
        evidence: &str,
    ) -> Result<ArticleRecord, VerificationError> {
        let evidence =
            ContentRef::parse(evidence).map_err(|_| VerificationError::InvalidEvidence)?;
        self.cast(content_ref, voter, Vote::Spam { evidence })
    }

    fn cast(
        &self,
        content_ref: &ContentRef,
        voter: &str,
        vote: Vote,
    ) -> Result<ArticleRecord, VerificationError> {
        let voter = Identity::parse(voter)?;
        let kind = vote.kind();

        // The vote and the voter's history commit together or not at all.
        let result = self
            .store
            .mutate_with_profile(content_ref, voter.as_str(), |article, profile| {
                // Authors are refused whether or not they ever registered.
                if article.is_authored_by(voter.as_str()) {
                    return Err(VerificationError::Denied(Denial::SelfVote));
                }
                let profile = profile.ok_or_else(|| VerificationError::UserNotFound(voter.key()))?;
                self.voting.cast_vote(article, &voter, &vote)?;
                match kind {
                    VoteKind::Real => profile.record_validated(&article.content_ref),
                    VoteKind::Spam => profile.record_spammed(&article.content_ref),
                };
                Ok(())
            });
        let (article, ()) = match result {
            Ok(applied) => applied,
            Err(VerificationError::Denied(reason)) => {
                warn!(
                    %content_ref,
                    voter = %voter,
                    reason = reason.as_str(),
                    "vote denied"
                );
                return Err(VerificationError::Denied(reason));
            }
            Err(e) => return Err(e),
        };

        info!(
            %content_ref,
            voter = %voter,
            kind = kind.as_str(),
            real_votes = article.real_votes,
            spam_votes = article.spam_votes,
            "vote recorded"
        );
        Ok(article)
    }

    /// Run the decision procedure and commit its transition.
    pub fn verify(
        &self,
        content_ref: &ContentRef,
    ) -> Result<(Outcome, ArticleRecord), VerificationError> {
        let (article, (outcome, changed)) = self
            .store
            .mutate(content_ref, |article| {
                Ok::<_, VerificationError>(self.decision.apply(article))
            })?;
        if changed {
            info!(%content_ref, outcome = outcome.as_str(), "article resolved");
        } else {
            debug!(%content_ref, outcome = outcome.as_str(), "verification left article unchanged");
        }
        Ok((outcome, article))
    }

    /// Acknowledge an article's pending update.
    ///
    /// A deleted article is physically removed; anything else gets its flag
    /// cleared. Repeating the call on a live article is harmless.
    pub fn resolve_update(&self, content_ref: &ContentRef) -> Result<ResetOutcome, VerificationError> {
        let (article, must_remove) = self.store.mutate(content_ref, |article| {
            Ok::<_, VerificationError>(reset::acknowledge(article))
        })?;

        if !must_remove {
            return Ok(ResetOutcome::Cleared(article));
        }

        match self.store.remove(content_ref) {
            // A concurrent acknowledgement may already have removed it.
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(VerificationError::Store(e)),
        }
        info!(%content_ref, "deleted article removed");

        let mut final_state = article;
        final_state.pending_update = false;
        Ok(ResetOutcome::Removed(final_state))
    }
}
