//! Update-notification reset.

use verity_store::ArticleRecord;

/// What acknowledging an article's pending update did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The flag was cleared; carries the stored article.
    Cleared(ArticleRecord),
    /// The article was deleted and has now been physically removed; carries
    /// its final state with `deleted = true` and `pending_update = false`.
    Removed(ArticleRecord),
}

impl ResetOutcome {
    pub fn article(&self) -> &ArticleRecord {
        match self {
            ResetOutcome::Cleared(a) | ResetOutcome::Removed(a) => a,
        }
    }

    pub fn into_article(self) -> ArticleRecord {
        match self {
            ResetOutcome::Cleared(a) | ResetOutcome::Removed(a) => a,
        }
    }

    pub fn was_removed(&self) -> bool {
        matches!(self, ResetOutcome::Removed(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResetOutcome::Cleared(_) => "Article update status reset successfully",
            ResetOutcome::Removed(_) => "Article was deleted",
        }
    }
}

/// Clear the pending-update flag unless the article is deleted.
///
/// Returns `true` when the article is deleted and must be removed instead;
/// a deleted record is left as is.
pub(crate) fn acknowledge(article: &mut ArticleRecord) -> bool {
    if article.deleted {
        return true;
    }
    article.pending_update = false;
    false
}
