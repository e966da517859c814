use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Answer, PlayerName, Question, QuestionError, QuizAttempt, SessionPhase,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("snapshot says finished without having started")]
    InconsistentFlags,

    #[error("snapshot was never started")]
    NotStarted,

    #[error("current question index {index} is past the {len} saved questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{answers} answers saved for current question index {index}")]
    AnswerCountMismatch { answers: usize, index: usize },

    #[error("saved question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("saved answer {index} disagrees with its correctness flag")]
    InconsistentAnswer { index: usize },
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Persisted unit of an in-progress session.
///
/// The serialized field names are the storage layout of the `quizAppData` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    #[serde(rename = "user")]
    pub identity: PlayerName,
    pub questions: Vec<Question>,
    pub current_question_index: usize,
    pub answers: Vec<Answer>,
    #[serde(rename = "timeLeft")]
    pub time_remaining_secs: u32,
    #[serde(rename = "quizStarted")]
    pub phase_started: bool,
    #[serde(rename = "quizFinished")]
    pub phase_finished: bool,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl QuizSnapshot {
    /// Capture the state of a running or finished attempt.
    #[must_use]
    pub fn capture(
        identity: &PlayerName,
        attempt: &QuizAttempt,
        phase: SessionPhase,
        saved_at: DateTime<Utc>,
    ) -> Self {
        let (phase_started, phase_finished) = phase.progress_flags();
        Self {
            identity: identity.clone(),
            questions: attempt.questions().to_vec(),
            current_question_index: attempt.current_index(),
            answers: attempt.answers().to_vec(),
            time_remaining_secs: attempt.time_remaining_secs(),
            phase_started,
            phase_finished,
            saved_at,
        }
    }

    /// A snapshot the startup prompt should offer to resume.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        self.phase_started && !self.phase_finished && !self.questions.is_empty()
    }

    /// Phase encoded by the wire flags.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::InconsistentFlags` for `finished && !started`.
    pub fn phase(&self) -> Result<SessionPhase, SnapshotError> {
        match (self.phase_started, self.phase_finished) {
            (true, false) => Ok(SessionPhase::InProgress),
            (true, true) => Ok(SessionPhase::Finished),
            (false, false) => Ok(SessionPhase::RulesShown),
            (false, true) => Err(SnapshotError::InconsistentFlags),
        }
    }

    /// Check structural invariants of a rehydrated snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first `SnapshotError` found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let phase = self.phase()?;

        let len = self.questions.len();
        if self.current_question_index > len {
            return Err(SnapshotError::IndexOutOfRange {
                index: self.current_question_index,
                len,
            });
        }
        if phase == SessionPhase::InProgress && self.answers.len() != self.current_question_index
        {
            return Err(SnapshotError::AnswerCountMismatch {
                answers: self.answers.len(),
                index: self.current_question_index,
            });
        }
        if self.answers.len() > len {
            return Err(SnapshotError::AnswerCountMismatch {
                answers: self.answers.len(),
                index: self.current_question_index,
            });
        }

        for (index, question) in self.questions.iter().enumerate() {
            question
                .validate()
                .map_err(|source| SnapshotError::InvalidQuestion { index, source })?;
        }
        for (index, answer) in self.answers.iter().enumerate() {
            if !answer.is_consistent() {
                return Err(SnapshotError::InconsistentAnswer { index });
            }
        }
        Ok(())
    }

    /// Split a validated snapshot into identity, attempt and phase.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::NotStarted` for a snapshot without a quiz, or
    /// any invariant violation reported by [`QuizSnapshot::validate`].
    pub fn into_parts(self) -> Result<(PlayerName, QuizAttempt, SessionPhase), SnapshotError> {
        self.validate()?;
        let phase = self.phase()?;
        if phase == SessionPhase::RulesShown || self.questions.is_empty() {
            return Err(SnapshotError::NotStarted);
        }
        let attempt = QuizAttempt::restore(
            self.questions,
            self.current_question_index,
            self.answers,
            self.time_remaining_secs,
        );
        Ok((self.identity, attempt, phase))
    }
}
