//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::{QuestionError, SessionError};

/// Errors emitted by the question source client.
///
/// Any of these means the source is unavailable for this load; the session
/// slot stays empty and the user retries via restart.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question source request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("question source returned an unparseable body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Errors emitted while normalizing a single raw record.
///
/// A malformed record is skipped, never aborts the whole batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizeError {
    #[error("record is missing a correct answer")]
    MissingCorrectAnswer,

    #[error("record has no incorrect answers")]
    NoIncorrectAnswers,

    #[error("question text is empty after sanitization")]
    EmptyQuestionText,

    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

/// Errors emitted by the quiz loader.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
