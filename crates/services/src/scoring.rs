use std::sync::Arc;

use quiz_core::model::{Difficulty, Standing, UserId};
use quiz_core::scoring::score_for;
use storage::repository::ScoreStore;

use crate::error::ScoringError;

/// Awards points and computes leaderboard standing on top of a `ScoreStore`.
#[derive(Clone)]
pub struct ScoringEngine {
    scores: Arc<dyn ScoreStore>,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(scores: Arc<dyn ScoreStore>) -> Self {
        Self { scores }
    }

    /// Add the tier's points to the user's total. Returns the points awarded.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Storage` if the increment fails.
    pub async fn record_correct_answer(
        &self,
        user: UserId,
        difficulty: Option<Difficulty>,
    ) -> Result<i64, ScoringError> {
        let points = score_for(difficulty);
        let record = self.scores.increment(user, points).await?;
        tracing::debug!(user = %user, points, total = record.total_score, "score recorded");
        Ok(points)
    }

    /// Score and rank, failing on any storage error.
    ///
    /// Users without a record get `Standing::unranked()`.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Storage` if either lookup fails.
    pub async fn standing(&self, user: UserId) -> Result<Standing, ScoringError> {
        let Some(score) = self.scores.score_of(user).await? else {
            return Ok(Standing::unranked());
        };
        let above = self.scores.count_strictly_greater(score).await?;
        Ok(Standing::from_count_above(score, above))
    }

    /// Best-effort variant of [`ScoringEngine::standing`] for user-facing
    /// replies: failures are logged. A failed score lookup yields (0, 0); a
    /// failed rank count keeps the score and reports rank 0.
    pub async fn rank(&self, user: UserId) -> Standing {
        let score = match self.scores.score_of(user).await {
            Ok(Some(score)) => score,
            Ok(None) => return Standing::unranked(),
            Err(err) => {
                tracing::warn!(user = %user, error = %err, "failed to fetch user score");
                return Standing::unranked();
            }
        };
        match self.scores.count_strictly_greater(score).await {
            Ok(above) => Standing::from_count_above(score, above),
            Err(err) => {
                tracing::warn!(user = %user, error = %err, "failed to fetch user rank");
                Standing { score, rank: 0 }
            }
        }
    }
}
