use std::sync::Arc;

use quiz_core::format::QuestionFormatter;
use quiz_core::model::{QuizSettings, SessionPhase};
use storage::SnapshotGateway;

use super::service::{AnswerOutcome, QuizSession, TickOutcome};
use crate::Clock;
use crate::error::SessionError;
use crate::question_source::QuestionSource;

/// Drives a `QuizSession` through its lifecycle and performs the side effects:
/// fetching and formatting questions, and keeping the snapshot slot in step
/// with the session.
///
/// Persistence failures are logged and never block play; the in-memory
/// session stays the source of truth.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    source: Arc<dyn QuestionSource>,
    snapshots: SnapshotGateway,
    formatter: QuestionFormatter,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        source: Arc<dyn QuestionSource>,
        snapshots: SnapshotGateway,
    ) -> Self {
        Self {
            clock,
            settings,
            source,
            snapshots,
            formatter: QuestionFormatter::new(),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: QuestionFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Build the session for a process start: load the slot and decide whether
    /// to show the resume prompt.
    ///
    /// # Errors
    ///
    /// Does not fail in practice; the signature carries `SessionError` from the
    /// state machine's phase check.
    pub async fn startup(&self) -> Result<QuizSession, SessionError> {
        let mut session = QuizSession::new(self.settings.time_limit_secs());
        let loaded = self.snapshots.load().await;
        let prompt = session.offer_resume(loaded)?;
        tracing::debug!(resume_prompt = prompt, "startup resume check");
        Ok(session)
    }

    /// Continue the saved quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if there is nothing to resume or the snapshot
    /// cannot be restored.
    pub async fn resume(&self, session: &mut QuizSession) -> Result<SessionPhase, SessionError> {
        match session.resume() {
            Ok(phase) => {
                tracing::info!(%phase, "resumed saved quiz");
                self.sync_snapshot(session).await;
                Ok(phase)
            }
            Err(err) => {
                if session.phase() == SessionPhase::LoggedOut {
                    self.clear_snapshot().await;
                }
                Err(err)
            }
        }
    }

    /// Discard the saved quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` outside the startup phase.
    pub async fn start_fresh(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.start_fresh()?;
        self.clear_snapshot().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidLogin` for blank names.
    pub fn login(&self, session: &mut QuizSession, raw_name: &str) -> Result<(), SessionError> {
        session.login(raw_name)?;
        tracing::info!(player = ?session.player().map(|p| p.as_str()), "logged in");
        Ok(())
    }

    /// Fetch and format a question set and start the quiz.
    ///
    /// On failure the session stays on the rules screen with the reason
    /// recorded for a retry prompt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionSource` if the fetch fails and
    /// `SessionError::NoQuestions` if it returns nothing.
    pub async fn start_quiz(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        if session.phase() != SessionPhase::RulesShown {
            return Err(SessionError::WrongPhase {
                action: "start quiz",
                phase: session.phase(),
            });
        }

        let raw = match self
            .source
            .fetch_question_set(
                self.settings.question_count(),
                self.settings.question_kind(),
            )
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "question fetch failed");
                session.record_start_failure(err.to_string());
                return Err(err.into());
            }
        };

        let questions = self.formatter.format(raw);
        let count = questions.len();
        if let Err(err) = session.begin_quiz(questions) {
            tracing::warn!(error = %err, "quiz not started");
            session.record_start_failure(err.to_string());
            return Err(err);
        }

        tracing::info!(questions = count, "quiz started");
        self.sync_snapshot(session).await;
        Ok(())
    }

    /// Answer the current question and persist the new state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the answer is refused.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        selected: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let outcome = session.select_answer(selected)?;
        if outcome.finished {
            tracing::info!("all questions answered");
        }
        self.sync_snapshot(session).await;
        Ok(outcome)
    }

    /// Advance the clock by one tick and persist the new state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless in progress.
    pub async fn tick(&self, session: &mut QuizSession) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick()?;
        if outcome.finished {
            tracing::info!("time expired");
        }
        self.sync_snapshot(session).await;
        Ok(outcome)
    }

    /// Back to the rules screen under the same identity.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless finished.
    pub async fn reset(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.reset()?;
        self.clear_snapshot().await;
        Ok(())
    }

    /// Back to the login screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless finished.
    pub async fn logout(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.logout()?;
        self.clear_snapshot().await;
        Ok(())
    }

    async fn sync_snapshot(&self, session: &QuizSession) {
        match session.phase() {
            SessionPhase::InProgress => {
                let Some(snapshot) = session.snapshot(self.clock.now()) else {
                    return;
                };
                if let Err(err) = self.snapshots.save(&snapshot).await {
                    tracing::warn!(error = %err, "snapshot not saved; continuing in memory");
                }
            }
            SessionPhase::Finished => self.clear_snapshot().await,
            SessionPhase::AwaitingResumeDecision
            | SessionPhase::LoggedOut
            | SessionPhase::RulesShown => {}
        }
    }

    async fn clear_snapshot(&self) {
        if let Err(err) = self.snapshots.clear().await {
            tracing::warn!(error = %err, "snapshot not cleared");
        }
    }
}

impl std::fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("snapshots", &self.snapshots)
            .finish_non_exhaustive()
    }
}
