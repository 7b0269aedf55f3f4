//! Wire protocol spoken with the grading service.

mod messages;

pub use messages::{ClientMessage, ServerMessage, SubmissionRequest};
