//! Domain types: questions, user info, sessions.

mod question;
mod session;

pub use question::{AnswerOption, Question};
pub use session::{
    validate_user_info, QuizAnswer, QuizSession, ScoreSummary, UserInfo, ValidationError,
    SESSION_DURATION_MILLIS, SESSION_DURATION_SECS,
};
