use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single answer option for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: Uuid,
    pub text: String,
    pub is_correct: bool,
}

/// A quiz question with its answer options.
///
/// Questions are read-only from the session's perspective; the bank is
/// loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub answers: Vec<AnswerOption>,
}

impl Question {
    /// Look up an answer option by id.
    pub fn answer(&self, answer_id: Uuid) -> Option<&AnswerOption> {
        self.answers.iter().find(|a| a.id == answer_id)
    }

    /// Check the question invariants: at least 2 options, at least 1 correct.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("question text is empty");
        }
        if self.answers.len() < 2 {
            return Err("question must have at least 2 answer options");
        }
        if !self.answers.iter().any(|a| a.is_correct) {
            return Err("question must have at least 1 correct option");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id: Uuid::new_v4(),
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn test_valid_question() {
        let q = Question {
            id: Uuid::new_v4(),
            text: "What is 2 + 2?".to_string(),
            answers: vec![option("3", false), option("4", true)],
        };
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_too_few_options() {
        let q = Question {
            id: Uuid::new_v4(),
            text: "Lonely?".to_string(),
            answers: vec![option("yes", true)],
        };
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_no_correct_option() {
        let q = Question {
            id: Uuid::new_v4(),
            text: "Pick one".to_string(),
            answers: vec![option("a", false), option("b", false)],
        };
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_answer_lookup() {
        let target = option("right", true);
        let target_id = target.id;
        let q = Question {
            id: Uuid::new_v4(),
            text: "Find me".to_string(),
            answers: vec![option("wrong", false), target],
        };
        assert_eq!(q.answer(target_id).map(|a| a.text.as_str()), Some("right"));
        assert!(q.answer(Uuid::new_v4()).is_none());
    }
}
