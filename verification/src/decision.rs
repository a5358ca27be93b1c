//! Verification decision procedure.
//!
//! Tallies are measured against the configured quorum, each side on its own:
//!
//! ```text
//! real% = real_votes / quorum * 100
//! spam% = spam_votes / quorum * 100
//! ```
//!
//! Spam is checked first, so a simultaneous spam and real majority rejects
//! the article.

use verity_store::ArticleRecord;
use verity_types::VotingParams;

/// The result of evaluating an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Spam reached the majority: the article is tombstoned.
    Rejected,
    /// Real votes reached the majority: the article is trusted.
    Verified,
    /// Neither side reached the majority.
    Inconclusive,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Rejected => "rejected",
            Outcome::Verified => "verified",
            Outcome::Inconclusive => "inconclusive",
        }
    }

    /// Human-readable summary returned to clients.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Rejected => "Article verified was not legitimate, so deleted",
            Outcome::Verified => "Article verified as legitimate",
            Outcome::Inconclusive => "Votes are inconclusive (no 51% majority)",
        }
    }
}

pub struct DecisionProcedure {
    params: VotingParams,
}

impl DecisionProcedure {
    pub fn new(params: VotingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> VotingParams {
        self.params
    }

    /// Evaluate without modifying the article.
    ///
    /// Resolved articles keep their outcome: a deleted article is always
    /// `Rejected` and a verified one always `Verified`, whatever the current
    /// tallies say.
    pub fn evaluate(&self, article: &ArticleRecord) -> Outcome {
        if article.deleted {
            return Outcome::Rejected;
        }
        if article.verified {
            return Outcome::Verified;
        }
        if self.params.reaches_majority(article.spam_votes) {
            Outcome::Rejected
        } else if self.params.reaches_majority(article.real_votes) {
            Outcome::Verified
        } else {
            Outcome::Inconclusive
        }
    }

    /// Evaluate and commit the resulting transition to `article`.
    ///
    /// Only an unresolved article changes. Returns the outcome and whether the
    /// record was modified.
    pub fn apply(&self, article: &mut ArticleRecord) -> (Outcome, bool) {
        let resolved = article.deleted || article.verified;
        let outcome = self.evaluate(article);
        if resolved {
            return (outcome, false);
        }
        match outcome {
            Outcome::Rejected => {
                article.deleted = true;
                article.verified = false;
                article.pending_update = true;
                (outcome, true)
            }
            Outcome::Verified => {
                article.verified = true;
                article.pending_update = true;
                (outcome, true)
            }
            Outcome::Inconclusive => (outcome, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{ContentRef, Identity, Timestamp};

    fn article(real: u64, spam: u64) -> ArticleRecord {
        let mut a = ArticleRecord::new(
            ContentRef::parse("QmA").unwrap(),
            Identity::parse("0xAuthor").unwrap(),
            "t".to_string(),
            vec![],
            vec![],
            Timestamp::new(1),
        );
        a.real_votes = real;
        a.spam_votes = spam;
        a
    }

    fn procedure() -> DecisionProcedure {
        DecisionProcedure::new(VotingParams::default())
    }

    #[test]
    fn below_quorum_majority_is_inconclusive() {
        let mut a = article(50, 50);
        assert_eq!(procedure().apply(&mut a), (Outcome::Inconclusive, false));
        assert!(!a.verified && !a.deleted && !a.pending_update);
    }

    #[test]
    fn spam_majority_rejects() {
        let mut a = article(0, 51);
        assert_eq!(procedure().apply(&mut a), (Outcome::Rejected, true));
        assert!(a.deleted && !a.verified && a.pending_update);
    }

    #[test]
    fn real_majority_verifies() {
        let mut a = article(51, 0);
        assert_eq!(procedure().apply(&mut a), (Outcome::Verified, true));
        assert!(a.verified && a.pending_update);
    }

    #[test]
    fn spam_wins_a_double_majority() {
        let mut a = article(60, 55);
        assert_eq!(procedure().apply(&mut a).0, Outcome::Rejected);
    }

    #[test]
    fn verified_article_is_not_reevaluated() {
        let mut a = article(51, 0);
        procedure().apply(&mut a);
        a.pending_update = false;
        a.spam_votes = 80;
        assert_eq!(procedure().apply(&mut a), (Outcome::Verified, false));
        assert!(a.verified && !a.deleted && !a.pending_update);
    }

    #[test]
    fn deleted_article_stays_rejected() {
        let mut a = article(0, 51);
        procedure().apply(&mut a);
        a.pending_update = false;
        assert_eq!(procedure().apply(&mut a), (Outcome::Rejected, false));
        assert!(!a.pending_update);
    }
}
