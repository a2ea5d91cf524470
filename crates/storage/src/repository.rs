use async_trait::async_trait;
use quiz_core::model::{Difficulty, Question, ScoreRecord, Section, UserId};
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read side of the question bank.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Pick one question uniformly at random for the given section and tier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bank has no matching question,
    /// or other storage errors.
    async fn random_question(
        &self,
        section: Section,
        difficulty: Difficulty,
    ) -> Result<Question, StorageError>;
}

/// Write side of the question bank, used by seeding and admin tooling.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Append a question to the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn add_question(
        &self,
        section: Section,
        difficulty: Difficulty,
        question: &Question,
    ) -> Result<(), StorageError>;

    /// Number of questions stored for a section and tier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be queried.
    async fn count_questions(
        &self,
        section: Section,
        difficulty: Difficulty,
    ) -> Result<u64, StorageError>;
}

/// Durable per-user score table.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Add `delta` to the user's score, creating the record on first use.
    /// Returns the record as it stands after the update.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update cannot be stored.
    async fn increment(&self, user: UserId, delta: i64) -> Result<ScoreRecord, StorageError>;

    /// Current score, or `None` for users who never scored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be queried.
    async fn score_of(&self, user: UserId) -> Result<Option<i64>, StorageError>;

    /// Number of users whose score is strictly greater than `score`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the table cannot be queried.
    async fn count_strictly_greater(&self, score: i64) -> Result<u64, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<HashMap<(Section, Difficulty), Vec<Question>>>>,
    scores: Arc<Mutex<HashMap<UserId, i64>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: Arc::new(Mutex::new(HashMap::new())),
            scores: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn random_question(
        &self,
        section: Section,
        difficulty: Difficulty,
    ) -> Result<Question, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&(section, difficulty))
            .and_then(|bucket| bucket.choose(&mut rand::rng()))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl QuestionBank for InMemoryRepository {
    async fn add_question(
        &self,
        section: Section,
        difficulty: Difficulty,
        question: &Question,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry((section, difficulty))
            .or_default()
            .push(question.clone());
        Ok(())
    }

    async fn count_questions(
        &self,
        section: Section,
        difficulty: Difficulty,
    ) -> Result<u64, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let len = guard.get(&(section, difficulty)).map_or(0, Vec::len);
        u64::try_from(len).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}

#[async_trait]
impl ScoreStore for InMemoryRepository {
    async fn increment(&self, user: UserId, delta: i64) -> Result<ScoreRecord, StorageError> {
        let mut guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let score = guard.entry(user).or_insert(0);
        *score = score.saturating_add(delta);
        Ok(ScoreRecord {
            user,
            total_score: *score,
        })
    }

    async fn score_of(&self, user: UserId) -> Result<Option<i64>, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&user).copied())
    }

    async fn count_strictly_greater(&self, score: i64) -> Result<u64, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let above = guard.values().filter(|other| **other > score).count();
        u64::try_from(above).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}

/// Aggregates the question bank and score table behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub question_bank: Arc<dyn QuestionBank>,
    pub scores: Arc<dyn ScoreStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let question_bank: Arc<dyn QuestionBank> = Arc::new(repo.clone());
        let scores: Arc<dyn ScoreStore> = Arc::new(repo);
        Self {
            questions,
            question_bank,
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_bucket_is_not_found() {
        let repo = InMemoryRepository::new();
        repo.add_question(Section::Dynamics, Difficulty::Beginner, &Question::new("2+2", 4))
            .await
            .unwrap();

        let err = repo
            .random_question(Section::Dynamics, Difficulty::Expert)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn picks_from_matching_bucket_only() {
        let repo = InMemoryRepository::new();
        repo.add_question(Section::Mechanics, Difficulty::Advanced, &Question::new("a", 1))
            .await
            .unwrap();
        repo.add_question(Section::Mechanics, Difficulty::Advanced, &Question::new("b", 2))
            .await
            .unwrap();
        repo.add_question(Section::Dynamics, Difficulty::Advanced, &Question::new("c", 3))
            .await
            .unwrap();

        for _ in 0..20 {
            let q = repo
                .random_question(Section::Mechanics, Difficulty::Advanced)
                .await
                .unwrap();
            assert!(q.text == "a" || q.text == "b");
        }
        assert_eq!(
            repo.count_questions(Section::Mechanics, Difficulty::Advanced)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn increment_inserts_then_accumulates() {
        let repo = InMemoryRepository::new();
        let user = UserId::new(7);
        assert_eq!(repo.score_of(user).await.unwrap(), None);

        assert_eq!(repo.increment(user, 2).await.unwrap().total_score, 2);
        let record = repo.increment(user, 3).await.unwrap();
        assert_eq!(
            record,
            ScoreRecord {
                user,
                total_score: 5
            }
        );
        assert_eq!(repo.score_of(user).await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn counts_only_strictly_greater_scores() {
        let repo = InMemoryRepository::new();
        repo.increment(UserId::new(1), 10).await.unwrap();
        repo.increment(UserId::new(2), 5).await.unwrap();
        repo.increment(UserId::new(3), 5).await.unwrap();

        assert_eq!(repo.count_strictly_greater(5).await.unwrap(), 1);
        assert_eq!(repo.count_strictly_greater(10).await.unwrap(), 0);
        assert_eq!(repo.count_strictly_greater(0).await.unwrap(), 3);
    }
}
