//! Voting parameters: the quorum denominator and the majority threshold.

use crate::TypesError;
use serde::{Deserialize, Serialize};

/// Basis points in 100%.
pub const BPS_SCALE: u64 = 10_000;

/// Parameters of the verification decision procedure.
///
/// Percentages are measured against the fixed `quorum`, not against the number
/// of votes actually cast, so an article stays inconclusive until one side
/// alone reaches `majority_bps` of the quorum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingParams {
    /// Vote count treated as 100%.
    pub quorum: u64,

    /// Share of the quorum (basis points, e.g. 5100 = 51%) one side needs.
    pub majority_bps: u32,
}

impl VotingParams {
    pub const DEFAULT_QUORUM: u64 = 100;
    pub const DEFAULT_MAJORITY_BPS: u32 = 5_100;

    pub fn new(quorum: u64, majority_bps: u32) -> Result<Self, TypesError> {
        let params = Self {
            quorum,
            majority_bps,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.quorum == 0 {
            return Err(TypesError::ZeroQuorum);
        }
        if self.majority_bps == 0 || self.majority_bps as u64 > BPS_SCALE {
            return Err(TypesError::InvalidMajority(self.majority_bps));
        }
        Ok(())
    }

    /// `votes / quorum` in basis points, truncated.
    ///
    /// Truncation cannot move a value across an integral threshold, so
    /// `percent_bps(v) >= t` is exactly `v / quorum * 10000 >= t`.
    pub fn percent_bps(&self, votes: u64) -> u64 {
        (votes as u128 * BPS_SCALE as u128 / self.quorum.max(1) as u128) as u64
    }

    /// Whether `votes` alone reach the majority threshold.
    pub fn reaches_majority(&self, votes: u64) -> bool {
        self.percent_bps(votes) >= self.majority_bps as u64
    }
}

impl Default for VotingParams {
    fn default() -> Self {
        Self {
            quorum: Self::DEFAULT_QUORUM,
            majority_bps: Self::DEFAULT_MAJORITY_BPS,
        }
    }
}
