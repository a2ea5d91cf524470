use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A question drawn from the bank together with its numeric answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub expected_answer: i64,
}

impl Question {
    #[must_use]
    pub fn new(text: impl Into<String>, expected_answer: i64) -> Self {
        Self {
            text: text.into(),
            expected_answer,
        }
    }
}

/// The user's reply could not be read as a whole number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("answer is not a whole number: {raw:?}")]
pub struct AnswerParseError {
    pub raw: String,
}

/// Parse a free-text reply as a signed integer answer.
///
/// # Errors
///
/// Returns `AnswerParseError` if the trimmed text is not a base-10 `i64`.
pub fn parse_answer(text: &str) -> Result<i64, AnswerParseError> {
    text.trim().parse::<i64>().map_err(|_| AnswerParseError {
        raw: text.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_integers() {
        assert_eq!(parse_answer("4"), Ok(4));
        assert_eq!(parse_answer(" -12 "), Ok(-12));
        assert_eq!(parse_answer("+3"), Ok(3));
    }

    #[test]
    fn rejects_words_and_fractions() {
        assert!(parse_answer("four").is_err());
        assert!(parse_answer("4.5").is_err());
        assert!(parse_answer("").is_err());
    }
}
