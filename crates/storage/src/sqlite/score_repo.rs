use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::{ScoreRecord, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{count_to_u64, user_id_to_i64};
use crate::repository::{ScoreStore, StorageError};

#[async_trait]
impl ScoreStore for SqliteRepository {
    async fn increment(&self, user: UserId, delta: i64) -> Result<ScoreRecord, StorageError> {
        let row = sqlx::query(
            r"
            INSERT INTO user_scores (user_id, score, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                score = user_scores.score + excluded.score,
                updated_at = excluded.updated_at
            RETURNING score
            ",
        )
        .bind(user_id_to_i64(user))
        .bind(delta)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let total_score: i64 = row
            .try_get("score")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(ScoreRecord { user, total_score })
    }

    async fn score_of(&self, user: UserId) -> Result<Option<i64>, StorageError> {
        let row = sqlx::query("SELECT score FROM user_scores WHERE user_id = ?1")
            .bind(user_id_to_i64(user))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get::<i64, _>("score")
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn count_strictly_greater(&self, score: i64) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS above FROM user_scores WHERE score > ?1")
            .bind(score)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let above: i64 = row
            .try_get("above")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        count_to_u64("above", above)
    }
}
