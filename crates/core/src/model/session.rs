use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Section};

/// Where a user currently is in the quiz flow.
///
/// Derived from `SessionState` rather than stored, so the two can never
/// disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No section chosen yet. Also the phase of a user with no session at all.
    Idle,
    /// Section chosen; no question outstanding.
    TopicChosen,
    /// A question was sent and its answer is expected.
    AwaitingAnswer,
    /// The last question was graded; waiting for "next task" or "change topic".
    AwaitingNextChoice,
}

/// Per-user quiz progress, kept in memory for the lifetime of the process.
///
/// `pending_answer` is `Some` exactly when a question is outstanding: both
/// `section` and `difficulty` are set and the user has not been graded yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    section: Option<Section>,
    difficulty: Option<Difficulty>,
    pending_answer: Option<i64>,
    awaiting_next_task_choice: bool,
}

impl SessionState {
    /// Fresh session for a newly selected section. Any previous difficulty or
    /// outstanding question is discarded.
    #[must_use]
    pub fn for_section(section: Section) -> Self {
        Self {
            section: Some(section),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn section(&self) -> Option<Section> {
        self.section
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn pending_answer(&self) -> Option<i64> {
        self.pending_answer
    }

    #[must_use]
    pub fn awaiting_next_task_choice(&self) -> bool {
        self.awaiting_next_task_choice
    }

    /// Section and difficulty, if both are chosen.
    #[must_use]
    pub fn topic(&self) -> Option<(Section, Difficulty)> {
        self.section.zip(self.difficulty)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.section.is_none() {
            SessionPhase::Idle
        } else if self.awaiting_next_task_choice {
            SessionPhase::AwaitingNextChoice
        } else if self.pending_answer.is_some() {
            SessionPhase::AwaitingAnswer
        } else {
            SessionPhase::TopicChosen
        }
    }

    /// Record the chosen difficulty. Drops any outstanding question so the
    /// session sits in `TopicChosen` until a new question is assigned.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = Some(difficulty);
        self.pending_answer = None;
        self.awaiting_next_task_choice = false;
    }

    /// Store the expected answer of a freshly sent question.
    ///
    /// Returns `false` and leaves the session untouched when no section or
    /// difficulty is chosen.
    #[must_use]
    pub fn assign_question(&mut self, expected_answer: i64) -> bool {
        if self.topic().is_none() {
            return false;
        }
        self.pending_answer = Some(expected_answer);
        self.awaiting_next_task_choice = false;
        true
    }

    /// The outstanding question was graded; section and difficulty are kept
    /// for the next task.
    pub fn mark_graded(&mut self) {
        self.pending_answer = None;
        self.awaiting_next_task_choice = true;
    }
}
