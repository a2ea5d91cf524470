use quiz_core::model::{Difficulty, Question, Section, UserId};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn user_id_to_i64(user: UserId) -> i64 {
    user.value()
}

pub(crate) fn count_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn parse_section(s: &str) -> Result<Section, StorageError> {
    s.parse::<Section>().map_err(ser)
}

pub(crate) fn parse_difficulty(s: &str) -> Result<Difficulty, StorageError> {
    s.parse::<Difficulty>().map_err(ser)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    Ok(Question {
        text: row.try_get::<String, _>("task").map_err(ser)?,
        expected_answer: row.try_get::<i64, _>("answer").map_err(ser)?,
    })
}

/// Section and tier stored next to a question; validated so a hand-edited row
/// cannot smuggle an unknown token into the bot.
pub(crate) fn map_question_topic(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<(Section, Difficulty), StorageError> {
    let section: String = row.try_get("section").map_err(ser)?;
    let difficulty: String = row.try_get("difficulty").map_err(ser)?;
    Ok((parse_section(&section)?, parse_difficulty(&difficulty)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_counts_are_rejected() {
        assert!(count_to_u64("count", -1).is_err());
        assert_eq!(count_to_u64("count", 3).unwrap(), 3);
    }

    #[test]
    fn unknown_tokens_fail_as_serialization_errors() {
        assert!(matches!(
            parse_section("optics"),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(parse_difficulty("expert").unwrap(), Difficulty::Expert);
    }
}
