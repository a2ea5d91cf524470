//! User-visible texts.

use quiz_core::model::Standing;

use crate::events::Sender;

pub const UNKNOWN_COMMAND: &str = "I don't know that command!";
pub const UNKNOWN_ACTION: &str = "Unknown command";
pub const CHOOSE_TOPIC: &str = "Which physics section would you like to practice?";
pub const CHOOSE_DIFFICULTY: &str = "Choose a difficulty level";
pub const TOPIC_FIRST: &str = "Please choose a topic first.";
pub const FETCH_FAILED: &str = "Something went wrong while fetching a task";
pub const NUMERIC_ANSWER: &str = "Please enter a numeric answer";
pub const CORRECT: &str = "Correct!";
pub const CONTINUE: &str = "Shall we continue?";

#[must_use]
pub fn greeting(from: &Sender) -> String {
    format!(
        "Glad to see you, {} {}! I'm your physics tutor bot. Pick a section of physics \
         and practice by solving my tasks. Choose what to do next...",
        from.first_name, from.last_name
    )
}

#[must_use]
pub fn hello(from: &Sender) -> String {
    format!("Hello {} {}", from.first_name, from.last_name)
}

#[must_use]
pub fn help(contact: &str) -> String {
    format!("Need help?\nContact the developer!\n{contact} is at your service.")
}

#[must_use]
pub fn incorrect(expected: i64) -> String {
    format!("Incorrect! The correct answer was {expected}. Think it over or pick another task")
}

#[must_use]
pub fn standing(standing: Standing) -> String {
    format!(
        "Your score: {} points. You are ranked #{} among all users.",
        standing.score, standing.rank
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_uses_both_names() {
        let from = Sender {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: None,
        };
        assert!(greeting(&from).contains("Ada Lovelace"));
    }

    #[test]
    fn incorrect_reveals_expected_answer() {
        assert!(incorrect(4).starts_with("Incorrect! The correct answer was 4."));
    }
}
