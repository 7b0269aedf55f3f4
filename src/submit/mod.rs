//! Quiz submission: payload validation and the grading service client.

mod coordinator;
mod grading;

pub use coordinator::{validate_request, SubmissionCoordinator, SubmissionError};
pub use grading::{GradingService, WsGradingClient};
