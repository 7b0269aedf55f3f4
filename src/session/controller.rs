//! Session lifecycle state machine.
//!
//! Owns the `Info -> Quiz -> Results` transitions, resume-on-startup,
//! answer upserts through the cache, and the at-most-once submission
//! guard. All time is taken from the injected clock and all persistence
//! goes through the injected store, so every transition is testable
//! with fakes.

use uuid::Uuid;

use crate::models::{
    validate_user_info, Question, QuizAnswer, QuizSession, ScoreSummary, UserInfo,
    ValidationError, SESSION_DURATION_MILLIS,
};
use crate::protocol::SubmissionRequest;
use crate::submit::SubmissionError;

use super::cache::AnswerCache;
use super::clock::Clock;
use super::store::{SessionStore, StoreError};
use super::timer::remaining_millis;

/// Current step of the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Collecting user info.
    Info,
    /// Answering questions.
    Quiz,
    /// Showing the outcome.
    Results,
}

/// Fatal error while bringing the controller up.
#[derive(Debug)]
pub enum InitError {
    /// The question bank is empty.
    NoQuestions,
    /// The stored session could not be read.
    Store(StoreError),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::NoQuestions => write!(f, "no questions available"),
            InitError::Store(e) => write!(f, "failed to restore session: {}", e),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::NoQuestions => None,
            InitError::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for InitError {
    fn from(err: StoreError) -> Self {
        InitError::Store(err)
    }
}

/// Error from a controller operation.
#[derive(Debug)]
pub enum SessionError {
    /// User info rejected; the caller reports it and the user retries.
    Validation(ValidationError),
    /// The session store failed.
    Store(StoreError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Validation(e) => write!(f, "{}", e),
            SessionError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Validation(e) => Some(e),
            SessionError::Store(e) => Some(e),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Validation(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

/// Outcome of a `next` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Moved,
    /// Already on the last question; the caller should finish the quiz.
    AtEnd,
}

/// The session lifecycle state machine.
pub struct SessionController<S, C> {
    questions: Vec<Question>,
    store: S,
    clock: C,
    cache: AnswerCache<S, C>,
    step: Step,
    session: Option<QuizSession>,
    submitting: bool,
    submission_error: Option<String>,
}

impl<S, C> SessionController<S, C> {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.current_question_index)
            .unwrap_or(0)
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.step != Step::Quiz {
            return None;
        }
        self.questions.get(self.current_index())
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.session.as_ref().map(|s| &s.user_info)
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn start_time_millis(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.start_time_millis)
    }

    /// Summary from the grading service, when one was obtained.
    pub fn summary(&self) -> Option<&ScoreSummary> {
        self.session.as_ref().and_then(|s| s.summary.as_ref())
    }

    /// Error retained from a failed submission, for display on Results.
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

impl<S, C> SessionController<S, C>
where
    S: SessionStore + Clone,
    C: Clock + Clone,
{
    /// Bring the controller up, resuming any stored session.
    ///
    /// A live session resumes into `Quiz` at its stored index; a
    /// completed one shows `Results`; an expired one is discarded along
    /// with its answers.
    pub fn initialize(questions: Vec<Question>, store: S, clock: C) -> Result<Self, InitError> {
        if questions.is_empty() {
            return Err(InitError::NoQuestions);
        }

        let cache = AnswerCache::new(store.clone(), clock.clone());
        let mut controller = Self {
            questions,
            store,
            clock,
            cache,
            step: Step::Info,
            session: None,
            submitting: false,
            submission_error: None,
        };

        let Some(stored) = controller.store.load_session()? else {
            return Ok(controller);
        };

        if stored.is_completed {
            controller.session = Some(stored);
            controller.step = Step::Results;
        } else if stored.is_expired(controller.clock.now_millis()) {
            controller.store.clear_session()?;
            controller.store.clear_answers()?;
        } else {
            controller.session = Some(stored);
            controller.clamp_index();
            controller.step = Step::Quiz;
        }

        Ok(controller)
    }

    // A stored index can point past the bank if the bank shrank between
    // runs; keep the invariant 0 <= index < question count.
    fn clamp_index(&mut self) {
        let last = self.questions.len() - 1;
        if let Some(session) = &mut self.session {
            session.current_question_index = session.current_question_index.min(last);
        }
    }

    pub fn time_remaining_secs(&self) -> u64 {
        match &self.session {
            Some(session) => remaining_millis(
                session.start_time_millis,
                self.clock.now_millis(),
                SESSION_DURATION_MILLIS,
            )
            .div_ceil(1000),
            None => 0,
        }
    }

    /// Validate user info and start a fresh session (`Info -> Quiz`).
    pub fn submit_user_info(
        &mut self,
        name: &str,
        student_number: &str,
        class_number: &str,
        major: &str,
    ) -> Result<(), SessionError> {
        if self.step != Step::Info {
            return Ok(());
        }

        let info = validate_user_info(name, student_number, class_number, major)?;
        let session = QuizSession::new(info, self.clock.now_millis());
        self.store.save_session(&session)?;
        self.session = Some(session);
        self.step = Step::Quiz;
        Ok(())
    }

    /// Upsert the answer for the current question. Does not advance.
    pub fn select_answer(&mut self, answer_id: Uuid) -> Result<(), StoreError> {
        let Some(question) = self.current_question() else {
            return Ok(());
        };
        // Ignore ids that do not belong to the question on screen.
        if question.answer(answer_id).is_none() {
            return Ok(());
        }

        self.cache.upsert(QuizAnswer {
            question_id: question.id,
            answer_id,
        })
    }

    /// All answers recorded so far.
    pub fn answers(&mut self) -> Result<Vec<QuizAnswer>, StoreError> {
        Ok(self.cache.get()?.to_vec())
    }

    /// The selected answer for a question, if any.
    pub fn answer_for(&mut self, question_id: Uuid) -> Result<Option<QuizAnswer>, StoreError> {
        self.cache.answer_for(question_id)
    }

    /// Advance to the next question, or report that the quiz is done.
    pub fn next(&mut self) -> Result<Advance, StoreError> {
        if self.step != Step::Quiz {
            return Ok(Advance::Moved);
        }
        let last = self.questions.len() - 1;
        let Some(session) = &mut self.session else {
            return Ok(Advance::Moved);
        };

        if session.current_question_index < last {
            session.current_question_index += 1;
            let snapshot = session.clone();
            self.store.save_session(&snapshot)?;
            Ok(Advance::Moved)
        } else {
            Ok(Advance::AtEnd)
        }
    }

    /// Step back one question. No-op at the first.
    pub fn previous(&mut self) -> Result<(), StoreError> {
        if self.step != Step::Quiz {
            return Ok(());
        }
        let Some(session) = &mut self.session else {
            return Ok(());
        };

        if session.current_question_index > 0 {
            session.current_question_index -= 1;
            let snapshot = session.clone();
            self.store.save_session(&snapshot)?;
        }
        Ok(())
    }

    /// Assemble the submission payload, at most once per session.
    ///
    /// Returns `None` when a submission is already in flight or the
    /// session is already completed, so a double finish trigger (stray
    /// key repeat racing timer expiry) collapses to a single dispatch.
    pub fn begin_submission(
        &mut self,
        time_expired: bool,
    ) -> Result<Option<SubmissionRequest>, StoreError> {
        if self.submitting {
            return Ok(None);
        }
        let answers = self.cache.get()?.to_vec();
        let Some(session) = &self.session else {
            return Ok(None);
        };
        if session.is_completed {
            return Ok(None);
        }

        self.submitting = true;
        Ok(Some(SubmissionRequest {
            user_info: session.user_info.clone(),
            answers,
            questions: self.questions.clone(),
            start_time_millis: session.start_time_millis,
            end_time_millis: self.clock.now_millis(),
            time_expired,
        }))
    }

    /// Record the submission outcome and move to `Results`.
    ///
    /// The session completes locally whether or not grading succeeded;
    /// a failure is retained for display but never blocks completion.
    pub fn complete_submission(
        &mut self,
        outcome: Result<ScoreSummary, SubmissionError>,
    ) -> Result<(), StoreError> {
        self.submitting = false;

        let Some(session) = &mut self.session else {
            return Ok(());
        };

        session.is_completed = true;
        match outcome {
            Ok(summary) => {
                session.summary = Some(summary);
                self.submission_error = None;
            }
            Err(err) => {
                self.submission_error = Some(err.to_string());
            }
        }

        let snapshot = session.clone();
        self.step = Step::Results;
        self.store.save_session(&snapshot)
    }

    /// Discard the session and everything derived from it (`-> Info`).
    pub fn restart(&mut self) -> Result<(), StoreError> {
        self.store.clear_session()?;
        self.store.clear_answers()?;
        self.cache.invalidate();
        self.session = None;
        self.submitting = false;
        self.submission_error = None;
        self.step = Step::Info;
        Ok(())
    }
}
