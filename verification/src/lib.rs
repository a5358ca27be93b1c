//! Article verification engine.
//!
//! Two explicit steps drive an article's trust status:
//! 1. **Voting**: registered users cast one real or spam vote each. The
//!    eligibility guard, the tally update and the voter's profile history run
//!    inside one atomic store mutation.
//! 2. **Verification**: on demand, the tallies are measured against a fixed
//!    quorum. A spam majority deletes the article, a real majority verifies it,
//!    anything else leaves it untouched.
//!
//! Every visible change raises the article's pending-update flag, which the
//! author acknowledges through [`ArticleEngine::resolve_update`]. Acknowledging
//! a deleted article removes it for good.

pub mod decision;
pub mod engine;
pub mod error;
pub mod guard;
pub mod reset;
pub mod users;
pub mod voting;

pub use decision::{DecisionProcedure, Outcome};
pub use engine::{ArticleDraft, ArticleEngine};
pub use error::{VerificationError, ErrorKind};
pub use guard::{can_vote, Denial, Eligibility};
pub use reset::ResetOutcome;
pub use users::UserRegistry;
pub use voting::{ArticleVoting, Vote, VoteKind};
