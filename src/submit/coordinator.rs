//! Submission coordination.
//!
//! Validates the assembled payload and hands it to the grading
//! service. Failures here are non-fatal to the session: the caller
//! completes locally either way and keeps the error for display.

use std::collections::HashSet;

use crate::models::ScoreSummary;
use crate::protocol::SubmissionRequest;

use super::grading::GradingService;

/// Error submitting a finished quiz.
#[derive(Debug)]
pub enum SubmissionError {
    /// The payload failed validation before dispatch.
    Invalid(String),
    /// The grading service was unreachable or misbehaved.
    Network(String),
    /// The grading service rejected the payload.
    Rejected(String),
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Invalid(msg) => write!(f, "invalid submission: {}", msg),
            SubmissionError::Network(msg) => write!(f, "grading service error: {}", msg),
            SubmissionError::Rejected(msg) => write!(f, "submission rejected: {}", msg),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Check a submission before it goes out: user info present, every
/// answer referencing a known question and one of its options.
pub fn validate_request(request: &SubmissionRequest) -> Result<(), SubmissionError> {
    let info = &request.user_info;
    if info.name.trim().is_empty()
        || info.student_number.trim().is_empty()
        || info.class_number.trim().is_empty()
        || info.major.trim().is_empty()
    {
        return Err(SubmissionError::Invalid(
            "user info is incomplete".to_string(),
        ));
    }

    if request.end_time_millis < request.start_time_millis {
        return Err(SubmissionError::Invalid(
            "end time precedes start time".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for answer in &request.answers {
        if !seen.insert(answer.question_id) {
            return Err(SubmissionError::Invalid(format!(
                "duplicate answer for question {}",
                answer.question_id
            )));
        }
        let question = request
            .questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .ok_or_else(|| {
                SubmissionError::Invalid(format!("unknown question {}", answer.question_id))
            })?;
        if question.answer(answer.answer_id).is_none() {
            return Err(SubmissionError::Invalid(format!(
                "unknown answer option {} for question {}",
                answer.answer_id, answer.question_id
            )));
        }
    }

    Ok(())
}

/// Drives the single in-flight submission for a session.
pub struct SubmissionCoordinator<G> {
    service: G,
}

impl<G: GradingService> SubmissionCoordinator<G> {
    pub fn new(service: G) -> Self {
        Self { service }
    }

    /// Validate and dispatch. Exactly one call runs per finish trigger;
    /// the controller's `begin_submission` guard enforces that.
    pub async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<ScoreSummary, SubmissionError> {
        validate_request(&request)?;
        self.service.submit(&request).await
    }
}
