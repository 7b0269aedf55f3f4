//! Session records: user info, answers, and the active session itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard time limit for a quiz session.
pub const SESSION_DURATION_SECS: u64 = 600;
pub const SESSION_DURATION_MILLIS: u64 = SESSION_DURATION_SECS * 1000;

/// User info field length bounds.
pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 50;
pub const NUMBER_MIN_LENGTH: usize = 1;
pub const NUMBER_MAX_LENGTH: usize = 20;
pub const MAJOR_MIN_LENGTH: usize = 2;
pub const MAJOR_MAX_LENGTH: usize = 50;

/// Identifying information captured at session start. Immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub student_number: String,
    pub class_number: String,
    pub major: String,
}

/// A user info field failed validation.
///
/// Recoverable: the caller reports it, the user corrects and resubmits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError {
            field,
            message: if min <= 1 { "must not be empty" } else { "too short" },
        });
    }
    if len > max {
        return Err(ValidationError {
            field,
            message: "too long",
        });
    }
    Ok(())
}

fn check_alphanumeric(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError {
            field,
            message: "must contain only letters and digits",
        });
    }
    Ok(())
}

/// Validate and normalize raw user info fields.
///
/// All fields are trimmed first; student and class numbers must be
/// ASCII alphanumeric.
pub fn validate_user_info(
    name: &str,
    student_number: &str,
    class_number: &str,
    major: &str,
) -> Result<UserInfo, ValidationError> {
    let name = name.trim();
    let student_number = student_number.trim();
    let class_number = class_number.trim();
    let major = major.trim();

    check_length("name", name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?;
    check_length(
        "student number",
        student_number,
        NUMBER_MIN_LENGTH,
        NUMBER_MAX_LENGTH,
    )?;
    check_alphanumeric("student number", student_number)?;
    check_length(
        "class number",
        class_number,
        NUMBER_MIN_LENGTH,
        NUMBER_MAX_LENGTH,
    )?;
    check_alphanumeric("class number", class_number)?;
    check_length("major", major, MAJOR_MIN_LENGTH, MAJOR_MAX_LENGTH)?;

    Ok(UserInfo {
        name: name.to_string(),
        student_number: student_number.to_string(),
        class_number: class_number.to_string(),
        major: major.to_string(),
    })
}

/// A single answer selection. At most one per `question_id` in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: Uuid,
    pub answer_id: Uuid,
}

/// Score summary returned by the grading service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
    pub percentage: f64,
    pub time_spent_secs: u64,
}

/// The root session record, persisted across application restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub user_info: UserInfo,
    /// Epoch millis, set once at creation and never changed.
    pub start_time_millis: u64,
    pub current_question_index: usize,
    /// One-way false -> true transition, flipped exactly once at finish.
    pub is_completed: bool,
    /// Grading result, persisted when the grading service returned one.
    pub summary: Option<ScoreSummary>,
}

impl QuizSession {
    /// Create a fresh session starting now.
    pub fn new(user_info: UserInfo, now_millis: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_info,
            start_time_millis: now_millis,
            current_question_index: 0,
            is_completed: false,
            summary: None,
        }
    }

    pub fn elapsed_millis(&self, now_millis: u64) -> u64 {
        now_millis.saturating_sub(self.start_time_millis)
    }

    /// A session past its time limit must be treated as expired
    /// regardless of completion state.
    pub fn is_expired(&self, now_millis: u64) -> bool {
        self.elapsed_millis(now_millis) > SESSION_DURATION_MILLIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_info_accepts_trimmed_fields() {
        let info = validate_user_info("  Ada Lovelace ", " 20231234 ", "CS101", "Mathematics")
            .expect("valid info");
        assert_eq!(info.name, "Ada Lovelace");
        assert_eq!(info.student_number, "20231234");
        assert_eq!(info.class_number, "CS101");
        assert_eq!(info.major, "Mathematics");
    }

    #[test]
    fn test_validate_user_info_rejects_empty_fields() {
        assert!(validate_user_info("", "123", "A1", "Physics").is_err());
        assert!(validate_user_info("Ada", "   ", "A1", "Physics").is_err());
        assert!(validate_user_info("Ada", "123", "", "Physics").is_err());
        assert!(validate_user_info("Ada", "123", "A1", "").is_err());
    }

    #[test]
    fn test_validate_user_info_rejects_non_alphanumeric_numbers() {
        let err = validate_user_info("Ada", "2023-1234", "A1", "Physics").unwrap_err();
        assert_eq!(err.field, "student number");

        let err = validate_user_info("Ada", "20231234", "A 1", "Physics").unwrap_err();
        assert_eq!(err.field, "class number");
    }

    #[test]
    fn test_validate_user_info_length_bounds() {
        let long_name = "x".repeat(NAME_MAX_LENGTH + 1);
        assert!(validate_user_info(&long_name, "123", "A1", "Physics").is_err());

        let max_name = "x".repeat(NAME_MAX_LENGTH);
        assert!(validate_user_info(&max_name, "123", "A1", "Physics").is_ok());
    }

    #[test]
    fn test_session_expiry_boundary() {
        let info = validate_user_info("Ada", "123", "A1", "Physics").unwrap();
        let session = QuizSession::new(info, 1_000);

        assert!(!session.is_expired(1_000 + SESSION_DURATION_MILLIS));
        assert!(session.is_expired(1_000 + SESSION_DURATION_MILLIS + 1));
    }

    #[test]
    fn test_elapsed_never_underflows() {
        let info = validate_user_info("Ada", "123", "A1", "Physics").unwrap();
        let session = QuizSession::new(info, 5_000);
        assert_eq!(session.elapsed_millis(4_000), 0);
    }
}
