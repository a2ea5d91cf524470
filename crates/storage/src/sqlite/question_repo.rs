use async_trait::async_trait;
use quiz_core::model::{Difficulty, Question, Section};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{count_to_u64, map_question_row, map_question_topic};
use crate::repository::{QuestionBank, QuestionSource, StorageError};

#[async_trait]
impl QuestionSource for SqliteRepository {
    async fn random_question(
        &self,
        section: Section,
        difficulty: Difficulty,
    ) -> Result<Question, StorageError> {
        let row = sqlx::query(
            r"
            SELECT section, difficulty, task, answer
            FROM physics_tasks
            WHERE section = ?1 AND difficulty = ?2
            ORDER BY RANDOM()
            LIMIT 1
            ",
        )
        .bind(section.as_str())
        .bind(difficulty.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Err(StorageError::NotFound);
        };

        let topic = map_question_topic(&row)?;
        if topic != (section, difficulty) {
            return Err(StorageError::Serialization(format!(
                "question row belongs to {}/{}",
                topic.0, topic.1
            )));
        }
        map_question_row(&row)
    }
}

#[async_trait]
impl QuestionBank for SqliteRepository {
    async fn add_question(
        &self,
        section: Section,
        difficulty: Difficulty,
        question: &Question,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO physics_tasks (section, difficulty, task, answer)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(section.as_str())
        .bind(difficulty.as_str())
        .bind(question.text.as_str())
        .bind(question.expected_answer)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn count_questions(
        &self,
        section: Section,
        difficulty: Difficulty,
    ) -> Result<u64, StorageError> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS total
            FROM physics_tasks
            WHERE section = ?1 AND difficulty = ?2
            ",
        )
        .bind(section.as_str())
        .bind(difficulty.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        count_to_u64("total", total)
    }
}
