//! Starter question bank loaded by the `seed` binary and `quiz-bot --seed`.

use quiz_core::model::{Difficulty, Question, Section};

use crate::repository::{QuestionBank, StorageError};

/// Built-in questions, two per section and tier. Answers are whole numbers in
/// SI units.
#[must_use]
pub fn starter_questions() -> Vec<(Section, Difficulty, Question)> {
    use Difficulty::{Advanced, Beginner, Expert};
    use Section::{Dynamics, Electrostatics, Mechanics};

    vec![
        (
            Dynamics,
            Beginner,
            Question::new("A net force of 10 N acts on a 2 kg body. Find its acceleration in m/s^2.", 5),
        ),
        (
            Dynamics,
            Beginner,
            Question::new("What force in N gives a 3 kg cart an acceleration of 4 m/s^2?", 12),
        ),
        (
            Dynamics,
            Advanced,
            Question::new(
                "A 5 kg block is pulled along a frictionless floor by 30 N while 10 N of drag opposes it. Find the acceleration in m/s^2.",
                4,
            ),
        ),
        (
            Dynamics,
            Advanced,
            Question::new(
                "Two blocks of 2 kg and 3 kg are pushed together by 20 N on a smooth surface. Find the force in N between them.",
                12,
            ),
        ),
        (
            Dynamics,
            Expert,
            Question::new(
                "An Atwood machine holds 3 kg and 1 kg masses. Taking g = 10 m/s^2, find the acceleration in m/s^2.",
                5,
            ),
        ),
        (
            Dynamics,
            Expert,
            Question::new(
                "A 2 kg body slides down a 30 degree frictionless incline. Taking g = 10 m/s^2, find the net force in N.",
                10,
            ),
        ),
        (
            Mechanics,
            Beginner,
            Question::new("A car travels 120 m in 6 s at constant speed. Find its speed in m/s.", 20),
        ),
        (
            Mechanics,
            Beginner,
            Question::new("How many metres does a body cover in 5 s at 8 m/s?", 40),
        ),
        (
            Mechanics,
            Advanced,
            Question::new(
                "A body starts from rest with acceleration 2 m/s^2. How far in m does it travel in 10 s?",
                100,
            ),
        ),
        (
            Mechanics,
            Advanced,
            Question::new(
                "Find the kinetic energy in J of a 4 kg ball moving at 5 m/s.",
                50,
            ),
        ),
        (
            Mechanics,
            Expert,
            Question::new(
                "A stone is thrown straight up at 30 m/s. Taking g = 10 m/s^2, find its maximum height in m.",
                45,
            ),
        ),
        (
            Mechanics,
            Expert,
            Question::new(
                "A 1000 kg car brakes from 20 m/s to rest over 40 m. Find the braking force in N.",
                5000,
            ),
        ),
        (
            Electrostatics,
            Beginner,
            Question::new("A charge of 6 C passes a point in 3 s. Find the current in A.", 2),
        ),
        (
            Electrostatics,
            Beginner,
            Question::new("How much work in J moves 2 C through a potential difference of 12 V?", 24),
        ),
        (
            Electrostatics,
            Advanced,
            Question::new(
                "A 3 C charge sits in a uniform field of 400 N/C. Find the force on it in N.",
                1200,
            ),
        ),
        (
            Electrostatics,
            Advanced,
            Question::new(
                "A 5 uF capacitor is charged to 200 V. Find the stored charge in uC.",
                1000,
            ),
        ),
        (
            Electrostatics,
            Expert,
            Question::new(
                "Two 1 uC charges are 3 cm apart. Taking k = 9e9, find the force between them in N.",
                10,
            ),
        ),
        (
            Electrostatics,
            Expert,
            Question::new(
                "A 10 uF capacitor holds 2 mJ of energy. Find its voltage in V.",
                20,
            ),
        ),
    ]
}

/// Insert the starter bank into every section/tier bucket that is still empty.
///
/// Returns the number of inserted questions. Running it twice inserts nothing
/// the second time.
///
/// # Errors
///
/// Returns `StorageError` if the bank cannot be queried or written.
pub async fn seed_starter_bank(bank: &dyn QuestionBank) -> Result<usize, StorageError> {
    let mut inserted = 0;
    for section in Section::ALL {
        for difficulty in Difficulty::ALL {
            if bank.count_questions(section, difficulty).await? > 0 {
                continue;
            }
            for (_, _, question) in starter_questions()
                .into_iter()
                .filter(|(s, d, _)| *s == section && *d == difficulty)
            {
                bank.add_question(section, difficulty, &question).await?;
                inserted += 1;
            }
        }
    }
    tracing::info!(inserted, "seeded starter question bank");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    #[test]
    fn every_bucket_has_questions() {
        let bank = starter_questions();
        for section in Section::ALL {
            for difficulty in Difficulty::ALL {
                assert!(
                    bank.iter()
                        .any(|(s, d, _)| *s == section && *d == difficulty),
                    "missing {section}/{difficulty}"
                );
            }
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let repo = InMemoryRepository::new();
        let first = seed_starter_bank(&repo).await.unwrap();
        assert_eq!(first, starter_questions().len());

        let second = seed_starter_bank(&repo).await.unwrap();
        assert_eq!(second, 0);
    }
}
