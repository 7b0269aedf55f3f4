//! Messages exchanged with the grading service.
//!
//! All messages are serialized as JSON over WebSocket.

use serde::{Deserialize, Serialize};

use crate::models::{Question, QuizAnswer, ScoreSummary, UserInfo};

/// The full submission payload handed to the grading service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub user_info: UserInfo,
    pub answers: Vec<QuizAnswer>,
    pub questions: Vec<Question>,
    pub start_time_millis: u64,
    pub end_time_millis: u64,
    /// True when the submission was forced by timer expiry.
    pub time_expired: bool,
}

/// Messages sent to the grading service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Submit a finished quiz for grading.
    Submit { request: SubmissionRequest },
}

/// Messages received from the grading service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Submission accepted and graded.
    SubmitAck { summary: ScoreSummary },

    /// Submission rejected (malformed payload, unknown questions, etc.).
    SubmitRejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_user_info;
    use uuid::Uuid;

    #[test]
    fn test_submit_serialization() {
        let user_info = validate_user_info("Ada", "123", "A1", "Physics").unwrap();
        let msg = ClientMessage::Submit {
            request: SubmissionRequest {
                user_info,
                answers: vec![QuizAnswer {
                    question_id: Uuid::new_v4(),
                    answer_id: Uuid::new_v4(),
                }],
                questions: Vec::new(),
                start_time_millis: 0,
                end_time_millis: 30_000,
                time_expired: false,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"Submit\""));
        assert!(json.contains("\"time_expired\":false"));
    }

    #[test]
    fn test_ack_round_trip() {
        let msg = ServerMessage::SubmitAck {
            summary: ScoreSummary {
                total_questions: 10,
                correct_answers: 7,
                incorrect_answers: 3,
                percentage: 70.0,
                time_spent_secs: 512,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ServerMessage = serde_json::from_str(&json).unwrap();
        match parsed {
            ServerMessage::SubmitAck { summary } => assert_eq!(summary.correct_answers, 7),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
