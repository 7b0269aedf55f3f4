use std::fs;
use std::io;
use std::path::Path;

use crate::models::Question;

/// Error loading the question bank.
#[derive(Debug)]
pub enum LoadError {
    /// Could not read the file.
    Io(io::Error),
    /// The file is not valid question JSON.
    Parse(serde_json::Error),
    /// The bank is empty. A quiz cannot run without questions.
    Empty,
    /// A question violates the bank invariants (index, reason).
    Invalid(usize, &'static str),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read question file: {}", e),
            LoadError::Parse(e) => write!(f, "failed to parse questions: {}", e),
            LoadError::Empty => write!(f, "no questions available"),
            LoadError::Invalid(index, reason) => {
                write!(f, "question {} is invalid: {}", index + 1, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

/// Parse and validate a question bank from JSON text.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> = serde_json::from_str(json)?;

    if questions.is_empty() {
        return Err(LoadError::Empty);
    }

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| LoadError::Invalid(index, reason))?;
    }

    Ok(questions)
}

/// Load the question bank from a JSON file.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let json = fs::read_to_string(path)?;
    parse_questions(&json)
}
