//! Voter eligibility guard.
//!
//! Pure predicate over an article and a voter identity. The engine evaluates
//! it inside the same store mutation that records the vote.

use thiserror::Error;
use verity_store::ArticleRecord;

/// Why a vote was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("Reverted: you are the author")]
    SelfVote,

    #[error("You already voted")]
    AlreadyVoted,

    #[error("Article has been deleted")]
    ArticleDeleted,
}

impl Denial {
    /// Stable snake_case label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Denial::SelfVote => "self_vote",
            Denial::AlreadyVoted => "already_voted",
            Denial::ArticleDeleted => "article_deleted",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Denied(Denial),
}

impl Eligibility {
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Eligibility::Allowed => Ok(()),
            Eligibility::Denied(reason) => Err(reason),
        }
    }
}

/// Decide whether `voter` may vote on `article`.
///
/// Checked in order: the author can never vote (even on a deleted article),
/// nobody votes twice, and deleted articles take no votes.
pub fn can_vote(article: &ArticleRecord, voter: &str) -> Eligibility {
    if article.is_authored_by(voter) {
        return Eligibility::Denied(Denial::SelfVote);
    }
    if article.has_voter(voter) {
        return Eligibility::Denied(Denial::AlreadyVoted);
    }
    if article.deleted {
        return Eligibility::Denied(Denial::ArticleDeleted);
    }
    Eligibility::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{normalize_identity, ContentRef, Identity, Timestamp};

    fn article() -> ArticleRecord {
        ArticleRecord::new(
            ContentRef::parse("QmA").unwrap(),
            Identity::parse("0xAuthor").unwrap(),
            "t".to_string(),
            vec![],
            vec![],
            Timestamp::new(1),
        )
    }

    #[test]
    fn fresh_voter_allowed() {
        assert_eq!(can_vote(&article(), "0xReader"), Eligibility::Allowed);
    }

    #[test]
    fn author_denied_in_any_casing() {
        let a = article();
        assert_eq!(can_vote(&a, "0xauthor"), Eligibility::Denied(Denial::SelfVote));
        assert_eq!(can_vote(&a, "0XAUTHOR"), Eligibility::Denied(Denial::SelfVote));
    }

    #[test]
    fn repeat_voter_denied_in_any_casing() {
        let mut a = article();
        a.voters.push(normalize_identity("0xReader"));
        a.real_votes = 1;
        assert_eq!(
            can_vote(&a, "0XREADER"),
            Eligibility::Denied(Denial::AlreadyVoted)
        );
    }

    #[test]
    fn deleted_article_denied() {
        let mut a = article();
        a.deleted = true;
        assert_eq!(
            can_vote(&a, "0xReader"),
            Eligibility::Denied(Denial::ArticleDeleted)
        );
    }

    #[test]
    fn self_vote_takes_precedence_over_deletion() {
        let mut a = article();
        a.deleted = true;
        assert_eq!(can_vote(&a, "0xAuthor"), Eligibility::Denied(Denial::SelfVote));
    }
}
