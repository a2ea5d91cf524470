use serde::{Deserialize, Serialize};

use crate::model::UserId;

/// Accumulated points of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub user: UserId,
    pub total_score: i64,
}

/// A user's score and leaderboard position.
///
/// `rank` is 1 plus the number of users with a strictly greater score, so tied
/// users share a rank. `Standing::unranked()` (0, 0) is reported for users who
/// never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub score: i64,
    pub rank: u64,
}

impl Standing {
    #[must_use]
    pub fn unranked() -> Self {
        Self { score: 0, rank: 0 }
    }

    #[must_use]
    pub fn from_count_above(score: i64, strictly_greater: u64) -> Self {
        Self {
            score,
            rank: strictly_greater.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_counts_users_strictly_above() {
        assert_eq!(Standing::from_count_above(12, 0).rank, 1);
        assert_eq!(Standing::from_count_above(12, 4).rank, 5);
    }

    #[test]
    fn rank_saturates() {
        assert_eq!(Standing::from_count_above(0, u64::MAX).rank, u64::MAX);
    }
}
