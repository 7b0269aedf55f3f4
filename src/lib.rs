//! # timed-quiz
//!
//! A terminal quiz with a hard 10-minute time limit, a session that
//! survives application restarts, and grading over WebSocket.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timed_quiz::{Quiz, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::new("questions.json", ".timed-quiz", "ws://127.0.0.1:8712")?;
//!     quiz.run().await?;
//!     Ok(())
//! }
//! ```

mod app;
mod data;
mod models;
mod protocol;
mod session;
mod submit;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

pub use app::{App, InfoForm};
pub use data::{load_questions_from_json, parse_questions, LoadError};
pub use models::{
    validate_user_info, AnswerOption, Question, QuizAnswer, QuizSession, ScoreSummary, UserInfo,
    ValidationError, SESSION_DURATION_SECS,
};
pub use protocol::{ClientMessage, ServerMessage, SubmissionRequest};
pub use session::{
    remaining_millis, Advance, AnswerCache, Clock, CountdownTimer, FileStore, InitError,
    MemoryStore, SessionController, SessionError, SessionStore, Step, StoreError, SystemClock,
    TimerEvent,
};
pub use submit::{
    validate_request, GradingService, SubmissionCoordinator, SubmissionError, WsGradingClient,
};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading the question bank.
    Load(LoadError),
    /// Error restoring the stored session at startup.
    Init(InitError),
    /// Error talking to the session store.
    Store(StoreError),
    /// IO error during quiz execution.
    Io(io::Error),
}

impl std::fmt::Display for QuizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load questions: {}", e),
            QuizError::Init(e) => write!(f, "Failed to initialize: {}", e),
            QuizError::Store(e) => write!(f, "Session store error: {}", e),
            QuizError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Init(e) => Some(e),
            QuizError::Store(e) => Some(e),
            QuizError::Io(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<InitError> for QuizError {
    fn from(err: InitError) -> Self {
        QuizError::Init(err)
    }
}

impl From<StoreError> for QuizError {
    fn from(err: StoreError) -> Self {
        QuizError::Store(err)
    }
}

impl From<io::Error> for QuizError {
    fn from(err: io::Error) -> Self {
        QuizError::Io(err)
    }
}

/// The app wired to the production store, clock, and grading client.
pub type QuizApp = App<FileStore, SystemClock>;

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: QuizApp,
    coordinator: SubmissionCoordinator<WsGradingClient>,
}

impl Quiz {
    /// Load the question bank, open the session store, and resume any
    /// stored session.
    ///
    /// Fails when the bank is empty or unreadable, or when a stored
    /// session exists but cannot be parsed.
    pub fn new<P, D>(questions: P, data_dir: D, grader_url: &str) -> Result<Self, QuizError>
    where
        P: AsRef<Path>,
        D: AsRef<Path>,
    {
        let questions = load_questions_from_json(questions)?;
        let store = FileStore::new(data_dir.as_ref())?;
        let controller = SessionController::initialize(questions, store, SystemClock)?;
        let app = App::new(controller, SystemClock)?;
        let coordinator = SubmissionCoordinator::new(WsGradingClient::new(grader_url));

        Ok(Self { app, coordinator })
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal, drives the quiz UI, and returns when
    /// the user quits. Quitting mid-quiz leaves the session persisted;
    /// the next run resumes it.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &self.coordinator).await;
        terminal::restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &QuizApp {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut QuizApp {
        &mut self.app
    }
}

/// What the key handler asked the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputOutcome {
    Continue,
    /// Finish the quiz and submit.
    Finish,
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut QuizApp,
    coordinator: &SubmissionCoordinator<WsGradingClient>,
) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.should_quit {
            break;
        }

        // Timer expiry forces submission, exactly like finishing manually.
        if app.drain_timer() {
            finish_quiz(terminal, app, coordinator, true).await?;
            continue;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(app, key.code)? == InputOutcome::Finish {
                    finish_quiz(terminal, app, coordinator, false).await?;
                }
            }
        }
    }

    Ok(())
}

/// Dispatch the one allowed submission and complete the session.
///
/// `begin_submission` collapses duplicate triggers (double key press
/// racing timer expiry) into a single dispatch. The session completes
/// locally whatever the grading outcome.
async fn finish_quiz(
    terminal: &mut terminal::AppTerminal,
    app: &mut QuizApp,
    coordinator: &SubmissionCoordinator<WsGradingClient>,
    time_expired: bool,
) -> Result<(), QuizError> {
    let Some(request) = app.controller.begin_submission(time_expired)? else {
        return Ok(());
    };

    // One frame with the submitting modal; input is not processed until
    // the in-flight call resolves.
    terminal.draw(|frame| ui::render(frame, app))?;

    let outcome = coordinator.submit(request).await;
    app.controller.complete_submission(outcome)?;
    app.on_submission_complete();
    Ok(())
}

fn handle_input(app: &mut QuizApp, key: KeyCode) -> Result<InputOutcome, QuizError> {
    match app.controller.step() {
        Step::Info => handle_info_input(app, key),
        Step::Quiz => handle_quiz_input(app, key),
        Step::Results => handle_result_input(app, key),
    }
}

fn handle_info_input(app: &mut QuizApp, key: KeyCode) -> Result<InputOutcome, QuizError> {
    match key {
        KeyCode::Enter => app.submit_info()?,
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_previous(),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.push_char(c),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    Ok(InputOutcome::Continue)
}

fn handle_quiz_input(app: &mut QuizApp, key: KeyCode) -> Result<InputOutcome, QuizError> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_selected()?,
        KeyCode::Right | KeyCode::Char('n') => {
            if app.next_question()? {
                return Ok(InputOutcome::Finish);
            }
        }
        KeyCode::Left | KeyCode::Char('p') => app.previous_question()?,
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart()?,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    Ok(InputOutcome::Continue)
}

fn handle_result_input(app: &mut QuizApp, key: KeyCode) -> Result<InputOutcome, QuizError> {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart()?,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    Ok(InputOutcome::Continue)
}
