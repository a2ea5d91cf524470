mod ids;
mod question;
mod score;
mod session;
mod topic;

pub use ids::{CallbackId, UserId};
pub use question::{AnswerParseError, Question, parse_answer};
pub use score::{ScoreRecord, Standing};
pub use session::{SessionPhase, SessionState};
pub use topic::{Difficulty, ParseTokenError, Section};
