//! Vote application: guard check plus tally update on one article.

use verity_store::ArticleRecord;
use verity_types::{ContentRef, Identity};

use crate::guard::{can_vote, Denial};

/// A vote on an article's trustworthiness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Vote {
    /// The article is genuine.
    Real,
    /// The article is spam / fake news, justified by an off-chain document.
    Spam { evidence: ContentRef },
}

impl Vote {
    pub fn kind(&self) -> VoteKind {
        match self {
            Vote::Real => VoteKind::Real,
            Vote::Spam { .. } => VoteKind::Spam,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteKind {
    Real,
    Spam,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Real => "real",
            VoteKind::Spam => "spam",
        }
    }
}

/// Applies votes to article records.
///
/// Must be called with exclusive access to the record (inside a store
/// mutation) so the eligibility check and the update cannot interleave with
/// another vote.
pub struct ArticleVoting;

impl ArticleVoting {
    /// Check eligibility, then count the vote, register the voter and raise
    /// the pending-update flag. On denial the record is left unchanged.
    pub fn cast_vote(
        &self,
        article: &mut ArticleRecord,
        voter: &Identity,
        vote: &Vote,
    ) -> Result<(), Denial> {
        can_vote(article, voter.as_str()).into_result()?;

        match vote {
            Vote::Real => article.real_votes += 1,
            Vote::Spam { evidence } => {
                article.spam_evidence.push(evidence.clone());
                article.spam_votes += 1;
            }
        }
        article.voters.push(voter.key());
        article.pending_update = true;
        Ok(())
    }
}
