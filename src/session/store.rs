//! Durable storage for the active session and its answer list.
//!
//! The store holds exactly one session at a time. Key scoping (one
//! active session per data directory) is assumed, not parameterized.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::{QuizAnswer, QuizSession};

/// Error talking to the session store.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    /// A stored record could not be deserialized. Fatal at resume time.
    Corrupt(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "session store IO error: {}", e),
            StoreError::Corrupt(e) => write!(f, "stored session data is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Corrupt(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err)
    }
}

/// Persistence contract for the single active session.
///
/// `save_answer` upserts by `question_id`: selecting a new answer for an
/// already-answered question replaces the old record.
pub trait SessionStore {
    fn save_session(&self, session: &QuizSession) -> Result<(), StoreError>;
    fn load_session(&self) -> Result<Option<QuizSession>, StoreError>;
    fn clear_session(&self) -> Result<(), StoreError>;

    fn save_answer(&self, answer: &QuizAnswer) -> Result<(), StoreError>;
    fn load_answers(&self) -> Result<Vec<QuizAnswer>, StoreError>;
    fn clear_answers(&self) -> Result<(), StoreError>;
}

const SESSION_FILE: &str = "session.json";
const ANSWERS_FILE: &str = "answers.json";

/// JSON-file-backed store under a data directory.
///
/// A missing file reads as "no session" / "no answers"; unparseable
/// JSON surfaces as [`StoreError::Corrupt`].
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn answers_path(&self) -> PathBuf {
        self.dir.join(ANSWERS_FILE)
    }

    fn read_optional(&self, path: PathBuf) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove_if_present(&self, path: PathBuf) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileStore {
    fn save_session(&self, session: &QuizSession) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(session)?;
        fs::write(self.session_path(), json)?;
        Ok(())
    }

    fn load_session(&self) -> Result<Option<QuizSession>, StoreError> {
        match self.read_optional(self.session_path())? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn clear_session(&self) -> Result<(), StoreError> {
        self.remove_if_present(self.session_path())
    }

    fn save_answer(&self, answer: &QuizAnswer) -> Result<(), StoreError> {
        let mut answers = self.load_answers()?;
        answers.retain(|a| a.question_id != answer.question_id);
        answers.push(answer.clone());
        let json = serde_json::to_string_pretty(&answers)?;
        fs::write(self.answers_path(), json)?;
        Ok(())
    }

    fn load_answers(&self) -> Result<Vec<QuizAnswer>, StoreError> {
        match self.read_optional(self.answers_path())? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn clear_answers(&self) -> Result<(), StoreError> {
        self.remove_if_present(self.answers_path())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    session: Option<QuizSession>,
    answers: Vec<QuizAnswer>,
}

/// In-memory store. Clones share state, mirroring how [`FileStore`]
/// clones share the data directory. Used as the test fake.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStore for MemoryStore {
    fn save_session(&self, session: &QuizSession) -> Result<(), StoreError> {
        self.lock().session = Some(session.clone());
        Ok(())
    }

    fn load_session(&self) -> Result<Option<QuizSession>, StoreError> {
        Ok(self.lock().session.clone())
    }

    fn clear_session(&self) -> Result<(), StoreError> {
        self.lock().session = None;
        Ok(())
    }

    fn save_answer(&self, answer: &QuizAnswer) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.answers.retain(|a| a.question_id != answer.question_id);
        inner.answers.push(answer.clone());
        Ok(())
    }

    fn load_answers(&self) -> Result<Vec<QuizAnswer>, StoreError> {
        Ok(self.lock().answers.clone())
    }

    fn clear_answers(&self) -> Result<(), StoreError> {
        self.lock().answers.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_user_info;
    use uuid::Uuid;

    fn sample_session() -> QuizSession {
        let info = validate_user_info("Ada", "123", "A1", "Physics").unwrap();
        QuizSession::new(info, 1_000)
    }

    fn answer(question_id: Uuid, answer_id: Uuid) -> QuizAnswer {
        QuizAnswer {
            question_id,
            answer_id,
        }
    }

    #[test]
    fn test_memory_store_session_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load_session().unwrap().is_none());

        let session = sample_session();
        store.save_session(&session).unwrap();
        let loaded = store.load_session().unwrap().expect("session persisted");
        assert_eq!(loaded.id, session.id);

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn test_save_answer_upserts_by_question() {
        let store = MemoryStore::new();
        let question = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store.save_answer(&answer(question, first)).unwrap();
        store.save_answer(&answer(question, second)).unwrap();
        store.save_answer(&answer(Uuid::new_v4(), first)).unwrap();

        let answers = store.load_answers().unwrap();
        assert_eq!(answers.len(), 2);
        let stored = answers
            .iter()
            .find(|a| a.question_id == question)
            .expect("answer kept");
        assert_eq!(stored.answer_id, second);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.save_session(&sample_session()).unwrap();
        assert!(clone.load_session().unwrap().is_some());
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("timed-quiz-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).unwrap();

        assert!(store.load_session().unwrap().is_none());
        assert!(store.load_answers().unwrap().is_empty());

        let session = sample_session();
        store.save_session(&session).unwrap();
        store
            .save_answer(&answer(Uuid::new_v4(), Uuid::new_v4()))
            .unwrap();

        let reopened = FileStore::new(&dir).unwrap();
        assert_eq!(
            reopened.load_session().unwrap().map(|s| s.id),
            Some(session.id)
        );
        assert_eq!(reopened.load_answers().unwrap().len(), 1);

        store.clear_session().unwrap();
        store.clear_answers().unwrap();
        assert!(store.load_session().unwrap().is_none());
        assert!(store.load_answers().unwrap().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_corrupt_session_is_an_error() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).unwrap();
        fs::write(dir.join(SESSION_FILE), "{broken").unwrap();

        assert!(matches!(
            store.load_session(),
            Err(StoreError::Corrupt(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
