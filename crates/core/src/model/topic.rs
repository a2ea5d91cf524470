use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Raised when a menu token does not name a known section or difficulty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseTokenError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── SECTION ──────────────────────────────────────────────────────────────────
//

/// Physics subject area a user practices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dynamics,
    Mechanics,
    Electrostatics,
}

impl Section {
    pub const ALL: [Section; 3] = [Self::Dynamics, Self::Mechanics, Self::Electrostatics];

    /// Token used in menus and in the question bank.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Dynamics => "dynamics",
            Section::Mechanics => "mechanics",
            Section::Electrostatics => "electrostatics",
        }
    }
}

impl FromStr for Section {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dynamics" => Ok(Self::Dynamics),
            "mechanics" => Ok(Self::Mechanics),
            "electrostatics" => Ok(Self::Electrostatics),
            other => Err(ParseTokenError::UnknownSection(other.to_owned())),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty tier. Gates which questions are served and how many points a
/// correct answer is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Advanced, Self::Expert];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }

    /// Points awarded for a correct answer at this tier.
    #[must_use]
    pub fn points(self) -> i64 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Advanced => 2,
            Difficulty::Expert => 3,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(ParseTokenError::UnknownDifficulty(other.to_owned())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_tokens_parse_back() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(
            "optics".parse::<Section>(),
            Err(ParseTokenError::UnknownSection("optics".into()))
        );
        assert_eq!(
            "Beginner".parse::<Difficulty>(),
            Err(ParseTokenError::UnknownDifficulty("Beginner".into()))
        );
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Expert).unwrap();
        assert_eq!(json, "\"expert\"");
    }
}
