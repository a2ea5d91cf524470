//! Point values for correct answers.

use crate::model::Difficulty;

/// Points for a correct answer. Unknown or missing difficulty is worth 0.
#[must_use]
pub fn score_for(difficulty: Option<Difficulty>) -> i64 {
    difficulty.map_or(0, Difficulty::points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_per_tier() {
        assert_eq!(score_for(Some(Difficulty::Beginner)), 1);
        assert_eq!(score_for(Some(Difficulty::Advanced)), 2);
        assert_eq!(score_for(Some(Difficulty::Expert)), 3);
        assert_eq!(score_for(None), 0);
    }

    #[test]
    fn unknown_tier_tokens_score_zero() {
        let tier = "grandmaster".parse::<Difficulty>().ok();
        assert_eq!(score_for(tier), 0);
        assert_eq!(score_for("expert".parse().ok()), 3);
    }
}
