//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AttemptError, LoginError, SessionPhase, SnapshotError};

/// Errors emitted by a `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("question source unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by the quiz session and its workflow.
///
/// None of these leave the session in a broken state: a refused event
/// changes nothing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{action} is not allowed while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: SessionPhase,
    },
    #[error(transparent)]
    InvalidLogin(#[from] LoginError),
    #[error("no questions available for the quiz")]
    NoQuestions,
    #[error("no saved quiz to resume")]
    NothingToResume,
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    QuestionSource(#[from] QuestionSourceError),
}
