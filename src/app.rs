//! Application state glue between the session controller, the
//! countdown timer, and the terminal views.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::SESSION_DURATION_MILLIS;
use crate::session::{
    Clock, CountdownTimer, SessionController, SessionError, SessionStore, Step, StoreError,
    TimerEvent,
};

/// Labels for the four user info fields, in focus order.
pub const INFO_FIELD_LABELS: [&str; 4] = ["Name", "Student number", "Class number", "Major"];

/// Input state for the user info form.
#[derive(Debug, Default)]
pub struct InfoForm {
    pub fields: [String; 4],
    pub focus: usize,
    pub error: Option<String>,
}

impl InfoForm {
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        self.error = None;
        self.fields[self.focus].push(c);
    }

    pub fn backspace(&mut self) {
        self.error = None;
        self.fields[self.focus].pop();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Top-level application state.
///
/// The controller owns the session semantics; the app owns the timer
/// handle and the per-frame view snapshot (selected option, answered
/// marker, remaining time) so rendering can stay read-only.
pub struct App<S, C> {
    pub controller: SessionController<S, C>,
    clock: C,
    pub form: InfoForm,
    timer: Option<CountdownTimer>,
    timer_rx: Option<mpsc::UnboundedReceiver<TimerEvent>>,
    pub remaining_secs: u64,
    pub selected_option: usize,
    pub current_answer: Option<Uuid>,
    pub answered_count: usize,
    pub should_quit: bool,
}

impl<S, C> App<S, C>
where
    S: SessionStore + Clone,
    C: Clock + Clone + Send + 'static,
{
    /// Wrap an initialized controller. A resumed `Quiz` session gets
    /// its timer running immediately.
    pub fn new(controller: SessionController<S, C>, clock: C) -> Result<Self, StoreError> {
        let mut app = Self {
            controller,
            clock,
            form: InfoForm::default(),
            timer: None,
            timer_rx: None,
            remaining_secs: 0,
            selected_option: 0,
            current_answer: None,
            answered_count: 0,
            should_quit: false,
        };

        if app.controller.step() == Step::Quiz {
            app.start_timer();
            app.refresh_quiz_view()?;
        }
        Ok(app)
    }

    fn start_timer(&mut self) {
        let Some(start) = self.controller.start_time_millis() else {
            return;
        };
        let (timer, rx) = CountdownTimer::start(start, SESSION_DURATION_MILLIS, self.clock.clone());
        self.timer = Some(timer);
        self.timer_rx = Some(rx);
        self.remaining_secs = self.controller.time_remaining_secs();
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        self.timer_rx = None;
    }

    /// Drain pending timer events. Returns true when expiry fired.
    pub fn drain_timer(&mut self) -> bool {
        let Some(rx) = &mut self.timer_rx else {
            return false;
        };

        let mut expired = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                TimerEvent::Tick { remaining_secs } => self.remaining_secs = remaining_secs,
                TimerEvent::Expired => {
                    self.remaining_secs = 0;
                    expired = true;
                }
            }
        }
        expired
    }

    /// Rebuild the view snapshot for the question on screen.
    fn refresh_quiz_view(&mut self) -> Result<(), StoreError> {
        self.answered_count = self.controller.answers()?.len();

        let Some(question) = self.controller.current_question() else {
            self.current_answer = None;
            self.selected_option = 0;
            return Ok(());
        };
        let question_id = question.id;
        let option_ids: Vec<Uuid> = question.answers.iter().map(|a| a.id).collect();

        self.current_answer = self.controller.answer_for(question_id)?.map(|a| a.answer_id);
        self.selected_option = self
            .current_answer
            .and_then(|id| option_ids.iter().position(|&o| o == id))
            .unwrap_or(0);
        Ok(())
    }

    /// Submit the info form. A validation failure lands on the form's
    /// error line and blocks the transition.
    pub fn submit_info(&mut self) -> Result<(), StoreError> {
        let [name, student_number, class_number, major] = &self.form.fields;
        match self
            .controller
            .submit_user_info(name, student_number, class_number, major)
        {
            Ok(()) => {
                self.form.error = None;
                self.start_timer();
                self.refresh_quiz_view()
            }
            Err(SessionError::Validation(e)) => {
                self.form.error = Some(e.to_string());
                Ok(())
            }
            Err(SessionError::Store(e)) => Err(e),
        }
    }

    fn option_count(&self) -> usize {
        self.controller
            .current_question()
            .map(|q| q.answers.len())
            .unwrap_or(0)
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Record the highlighted option as the answer for the current
    /// question. Stays on the question.
    pub fn choose_selected(&mut self) -> Result<(), StoreError> {
        let Some(answer_id) = self
            .controller
            .current_question()
            .and_then(|q| q.answers.get(self.selected_option))
            .map(|a| a.id)
        else {
            return Ok(());
        };

        self.controller.select_answer(answer_id)?;
        self.refresh_quiz_view()
    }

    /// Move to the next question. Returns true when the quiz is done
    /// and the caller should start submission.
    pub fn next_question(&mut self) -> Result<bool, StoreError> {
        match self.controller.next()? {
            crate::session::Advance::Moved => {
                self.refresh_quiz_view()?;
                Ok(false)
            }
            crate::session::Advance::AtEnd => Ok(true),
        }
    }

    pub fn previous_question(&mut self) -> Result<(), StoreError> {
        self.controller.previous()?;
        self.refresh_quiz_view()
    }

    /// Tear down the quiz view state once submission has resolved.
    pub fn on_submission_complete(&mut self) {
        self.stop_timer();
        self.current_answer = None;
        self.selected_option = 0;
    }

    /// Discard the session and return to the info form.
    pub fn restart(&mut self) -> Result<(), StoreError> {
        self.stop_timer();
        self.controller.restart()?;
        self.form.clear();
        self.remaining_secs = 0;
        self.selected_option = 0;
        self.current_answer = None;
        self.answered_count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerOption, Question};
    use crate::session::{ManualClock, MemoryStore};

    fn bank() -> Vec<Question> {
        (0..3)
            .map(|n| Question {
                id: Uuid::new_v4(),
                text: format!("Question {}", n),
                answers: vec![
                    AnswerOption {
                        id: Uuid::new_v4(),
                        text: "a".to_string(),
                        is_correct: false,
                    },
                    AnswerOption {
                        id: Uuid::new_v4(),
                        text: "b".to_string(),
                        is_correct: true,
                    },
                    AnswerOption {
                        id: Uuid::new_v4(),
                        text: "c".to_string(),
                        is_correct: false,
                    },
                ],
            })
            .collect()
    }

    async fn app() -> App<MemoryStore, ManualClock> {
        let store = MemoryStore::new();
        let clock = ManualClock::at(0);
        let controller = SessionController::initialize(bank(), store, clock.clone()).unwrap();
        App::new(controller, clock).unwrap()
    }

    fn fill_form(app: &mut App<MemoryStore, ManualClock>) {
        app.form.fields = [
            "Ada Lovelace".to_string(),
            "20231234".to_string(),
            "CS101".to_string(),
            "Mathematics".to_string(),
        ];
    }

    #[tokio::test]
    async fn test_form_validation_error_stays_on_info() {
        let mut app = app().await;
        app.form.fields[0] = "Ada".to_string();
        app.submit_info().unwrap();

        assert_eq!(app.controller.step(), Step::Info);
        assert!(app.form.error.is_some());

        // Typing clears the error, matching retryable semantics.
        app.form.push_char('x');
        assert!(app.form.error.is_none());
    }

    #[tokio::test]
    async fn test_submit_info_starts_quiz_and_timer() {
        let mut app = app().await;
        fill_form(&mut app);
        app.submit_info().unwrap();

        assert_eq!(app.controller.step(), Step::Quiz);
        assert!(app.timer.is_some());
        assert_eq!(app.remaining_secs, 600);
    }

    #[tokio::test]
    async fn test_choosing_marks_and_preselects_on_return() {
        let mut app = app().await;
        fill_form(&mut app);
        app.submit_info().unwrap();

        app.select_next_option();
        app.select_next_option();
        app.choose_selected().unwrap();
        assert_eq!(app.answered_count, 1);

        // Leaving and coming back restores the highlight to the choice.
        assert!(!app.next_question().unwrap());
        assert_eq!(app.selected_option, 0);
        app.previous_question().unwrap();
        assert_eq!(app.selected_option, 2);
        assert!(app.current_answer.is_some());
    }

    #[tokio::test]
    async fn test_next_on_last_question_requests_finish() {
        let mut app = app().await;
        fill_form(&mut app);
        app.submit_info().unwrap();

        assert!(!app.next_question().unwrap());
        assert!(!app.next_question().unwrap());
        assert!(app.next_question().unwrap());
        assert_eq!(app.controller.current_index(), 2);
    }

    #[tokio::test]
    async fn test_restart_resets_view_state() {
        let mut app = app().await;
        fill_form(&mut app);
        app.submit_info().unwrap();
        app.choose_selected().unwrap();

        app.restart().unwrap();
        assert_eq!(app.controller.step(), Step::Info);
        assert!(app.timer.is_none());
        assert_eq!(app.answered_count, 0);
        assert!(app.form.fields.iter().all(|f| f.is_empty()));
    }
}
