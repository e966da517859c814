use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    Answer, AttemptError, PlayerName, Question, QuizAttempt, QuizResults, QuizSnapshot,
    SessionPhase,
};

use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub answer: Answer,
    pub finished: bool,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub remaining_secs: u32,
    pub finished: bool,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Session data per phase. Each variant carries exactly what that phase needs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    AwaitingResumeDecision { candidate: Option<QuizSnapshot> },
    LoggedOut,
    RulesShown { player: PlayerName },
    InProgress { player: PlayerName, attempt: QuizAttempt },
    Finished { player: PlayerName, attempt: QuizAttempt },
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        match self {
            SessionState::AwaitingResumeDecision { .. } => SessionPhase::AwaitingResumeDecision,
            SessionState::LoggedOut => SessionPhase::LoggedOut,
            SessionState::RulesShown { .. } => SessionPhase::RulesShown,
            SessionState::InProgress { .. } => SessionPhase::InProgress,
            SessionState::Finished { .. } => SessionPhase::Finished,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session state machine.
///
/// Transitions are synchronous and side-effect free; persistence, fetching
/// and the countdown are driven by `QuizLoopService` and `QuizRuntime`.
/// An event that does not apply to the current phase is refused with
/// `SessionError::WrongPhase` and leaves the state untouched.
pub struct QuizSession {
    state: SessionState,
    time_limit_secs: u32,
    start_failure: Option<String>,
}

impl QuizSession {
    /// A new session waiting for the startup resume check.
    #[must_use]
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            state: SessionState::AwaitingResumeDecision { candidate: None },
            time_limit_secs,
            start_failure: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn player(&self) -> Option<&PlayerName> {
        match &self.state {
            SessionState::RulesShown { player }
            | SessionState::InProgress { player, .. }
            | SessionState::Finished { player, .. } => Some(player),
            SessionState::AwaitingResumeDecision { .. } | SessionState::LoggedOut => None,
        }
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&QuizAttempt> {
        match &self.state {
            SessionState::InProgress { attempt, .. } | SessionState::Finished { attempt, .. } => {
                Some(attempt)
            }
            _ => None,
        }
    }

    /// The question awaiting an answer, only while in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            SessionState::InProgress { attempt, .. } => attempt.current_question(),
            _ => None,
        }
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> Option<u32> {
        self.attempt().map(QuizAttempt::time_remaining_secs)
    }

    /// Score breakdown, available once finished.
    #[must_use]
    pub fn results(&self) -> Option<QuizResults> {
        match &self.state {
            SessionState::Finished { attempt, .. } => Some(attempt.results()),
            _ => None,
        }
    }

    /// Saved quiz offered by the resume prompt.
    #[must_use]
    pub fn resume_candidate(&self) -> Option<&QuizSnapshot> {
        match &self.state {
            SessionState::AwaitingResumeDecision { candidate } => candidate.as_ref(),
            _ => None,
        }
    }

    /// Why the last start attempt failed, for a retry prompt.
    #[must_use]
    pub fn start_failure(&self) -> Option<&str> {
        self.start_failure.as_deref()
    }

    /// Capture the running or finished attempt for persistence.
    #[must_use]
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> Option<QuizSnapshot> {
        match &self.state {
            SessionState::InProgress { player, attempt }
            | SessionState::Finished { player, attempt } => Some(QuizSnapshot::capture(
                player,
                attempt,
                self.phase(),
                saved_at,
            )),
            _ => None,
        }
    }

    /// Apply the startup load result. A resumable snapshot keeps the prompt up;
    /// anything else moves on to the login screen.
    ///
    /// Returns whether the resume prompt is shown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside the startup phase.
    pub fn offer_resume(&mut self, loaded: Option<QuizSnapshot>) -> Result<bool, SessionError> {
        self.expect_phase(SessionPhase::AwaitingResumeDecision, "resume check")?;
        match loaded.filter(QuizSnapshot::is_resumable) {
            Some(snapshot) => {
                self.state = SessionState::AwaitingResumeDecision {
                    candidate: Some(snapshot),
                };
                Ok(true)
            }
            None => {
                self.state = SessionState::LoggedOut;
                Ok(false)
            }
        }
    }

    /// Restore the offered snapshot. No questions are fetched.
    ///
    /// A snapshot that is finished, fully answered, or out of time resumes
    /// straight into `Finished`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToResume` if no snapshot is on offer, or
    /// `SessionError::Snapshot` if it cannot be restored (the session then
    /// falls back to `LoggedOut`).
    pub fn resume(&mut self) -> Result<SessionPhase, SessionError> {
        let SessionState::AwaitingResumeDecision { candidate } = &mut self.state else {
            return Err(self.wrong_phase("resume"));
        };
        let snapshot = candidate.take().ok_or(SessionError::NothingToResume)?;

        let (player, attempt, phase) = match snapshot.into_parts() {
            Ok(parts) => parts,
            Err(err) => {
                self.state = SessionState::LoggedOut;
                return Err(err.into());
            }
        };

        let done = phase == SessionPhase::Finished
            || attempt.is_exhausted()
            || attempt.is_out_of_time();
        self.state = if done {
            SessionState::Finished { player, attempt }
        } else {
            SessionState::InProgress { player, attempt }
        };
        Ok(self.phase())
    }

    /// Discard the offered snapshot and go to the login screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside the startup phase.
    pub fn start_fresh(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::AwaitingResumeDecision, "start fresh")?;
        self.state = SessionState::LoggedOut;
        Ok(())
    }

    /// Set the identity from raw input (trimmed).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidLogin` for blank input and
    /// `SessionError::WrongPhase` unless logged out.
    pub fn login(&mut self, raw_name: &str) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::LoggedOut, "login")?;
        let player = PlayerName::new(raw_name)?;
        self.state = SessionState::RulesShown { player };
        Ok(())
    }

    /// Enter `InProgress` with a fresh question set and a full clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` for an empty set and
    /// `SessionError::WrongPhase` unless the rules are shown.
    pub fn begin_quiz(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        let SessionState::RulesShown { player } = &self.state else {
            return Err(self.wrong_phase("start quiz"));
        };
        let attempt = QuizAttempt::new(questions, self.time_limit_secs).map_err(|err| match err {
            AttemptError::NoQuestions => SessionError::NoQuestions,
            other => SessionError::Attempt(other),
        })?;

        self.state = SessionState::InProgress {
            player: player.clone(),
            attempt,
        };
        self.start_failure = None;
        Ok(())
    }

    pub(crate) fn record_start_failure(&mut self, reason: impl Into<String>) {
        self.start_failure = Some(reason.into());
    }

    /// Answer the current question; the last answer finishes the quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Attempt` for an option that is not offered and
    /// `SessionError::WrongPhase` unless in progress.
    pub fn select_answer(&mut self, selected: &str) -> Result<AnswerOutcome, SessionError> {
        let SessionState::InProgress { attempt, .. } = &mut self.state else {
            return Err(self.wrong_phase("answer"));
        };
        let answer = attempt.record_answer(selected)?.clone();
        let finished = attempt.is_exhausted();
        if finished {
            self.finish();
        }
        Ok(AnswerOutcome { answer, finished })
    }

    /// One second elapsed. Reaching zero finishes the quiz; unreached
    /// questions stay unanswered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless in progress.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let SessionState::InProgress { attempt, .. } = &mut self.state else {
            return Err(self.wrong_phase("tick"));
        };
        let remaining_secs = attempt.tick();
        let finished = remaining_secs == 0;
        if finished {
            self.finish();
        }
        Ok(TickOutcome {
            remaining_secs,
            finished,
        })
    }

    /// Drop the quiz data and go back to the rules, keeping the identity.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless finished.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let SessionState::Finished { player, .. } = &self.state else {
            return Err(self.wrong_phase("reset"));
        };
        self.state = SessionState::RulesShown {
            player: player.clone(),
        };
        Ok(())
    }

    /// Drop the quiz data and the identity.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless finished.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Finished, "logout")?;
        self.state = SessionState::LoggedOut;
        self.start_failure = None;
        Ok(())
    }

    fn finish(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::LoggedOut);
        self.state = match state {
            SessionState::InProgress { player, attempt } => {
                SessionState::Finished { player, attempt }
            }
            other => other,
        };
    }

    fn expect_phase(&self, expected: SessionPhase, action: &'static str) -> Result<(), SessionError> {
        if self.phase() == expected {
            Ok(())
        } else {
            Err(self.wrong_phase(action))
        }
    }

    fn wrong_phase(&self, action: &'static str) -> SessionError {
        SessionError::WrongPhase {
            action,
            phase: self.phase(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase())
            .field("player", &self.player().map(PlayerName::as_str))
            .field("answered", &self.attempt().map(|a| a.answers().len()))
            .field("time_remaining_secs", &self.time_remaining_secs())
            .field("start_failure", &self.start_failure)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
