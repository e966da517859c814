use tokio::sync::{mpsc, watch};

use quiz_core::model::SessionPhase;

use super::countdown::Countdown;
use super::service::{QuizSession, TickOutcome};
use super::view::SessionView;
use super::workflow::QuizLoopService;
use crate::error::SessionError;

/// User intents forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizIntent {
    Resume,
    StartFresh,
    Login(String),
    StartQuiz,
    SelectAnswer(String),
    Reset,
    Logout,
}

/// Single actor owning the session, the workflow and the countdown.
///
/// The countdown is armed exactly while the session is `InProgress`.
pub struct QuizRuntime {
    service: QuizLoopService,
    session: QuizSession,
    countdown: Countdown,
    loading: bool,
}

impl QuizRuntime {
    /// Run the startup resume check and build the actor.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from `QuizLoopService::startup`.
    pub async fn start(service: QuizLoopService) -> Result<Self, SessionError> {
        let session = service.startup().await?;
        let countdown = Countdown::new(service.settings().tick());
        let mut runtime = Self {
            service,
            session,
            countdown,
            loading: false,
        };
        runtime.sync_countdown();
        Ok(runtime)
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from_session(&self.session, self.loading)
    }

    #[must_use]
    pub fn countdown_armed(&self) -> bool {
        self.countdown.is_armed()
    }

    /// Apply one intent.
    ///
    /// # Errors
    ///
    /// Returns the `SessionError` of a refused intent; the session is unchanged.
    pub async fn dispatch(&mut self, intent: QuizIntent) -> Result<(), SessionError> {
        let result = match intent {
            QuizIntent::Resume => self.service.resume(&mut self.session).await.map(|_| ()),
            QuizIntent::StartFresh => self.service.start_fresh(&mut self.session).await,
            QuizIntent::Login(name) => self.service.login(&mut self.session, &name),
            QuizIntent::StartQuiz => self.service.start_quiz(&mut self.session).await,
            QuizIntent::SelectAnswer(selected) => self
                .service
                .answer_current(&mut self.session, &selected)
                .await
                .map(|_| ()),
            QuizIntent::Reset => self.service.reset(&mut self.session).await,
            QuizIntent::Logout => self.service.logout(&mut self.session).await,
        };
        self.sync_countdown();
        result
    }

    /// Apply one countdown tick.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongPhase` unless in progress.
    pub async fn on_tick(&mut self) -> Result<TickOutcome, SessionError> {
        let result = self.service.tick(&mut self.session).await;
        self.sync_countdown();
        result
    }

    /// Event loop: ticks and intents, one at a time, publishing a view after each.
    ///
    /// When a tick and an intent are ready in the same turn the tick goes first,
    /// so expiry wins over a last-moment answer. Returns when the intent
    /// channel closes.
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<QuizIntent>,
        views: watch::Sender<SessionView>,
    ) {
        views.send_replace(self.view());
        loop {
            tokio::select! {
                biased;
                () = self.countdown.tick() => {
                    if let Err(err) = self.on_tick().await {
                        tracing::debug!(error = %err, "tick ignored");
                    }
                }
                intent = intents.recv() => {
                    let Some(intent) = intent else {
                        break;
                    };
                    if intent == QuizIntent::StartQuiz {
                        self.loading = true;
                        views.send_replace(self.view());
                    }
                    if let Err(err) = self.dispatch(intent).await {
                        tracing::debug!(error = %err, "intent refused");
                    }
                    self.loading = false;
                }
            }
            views.send_replace(self.view());
        }
        tracing::debug!("intent channel closed; quiz runtime stopped");
    }

    fn sync_countdown(&mut self) {
        if self.session.phase() == SessionPhase::InProgress {
            self.countdown.arm();
        } else {
            self.countdown.disarm();
        }
    }
}

impl std::fmt::Debug for QuizRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizRuntime")
            .field("session", &self.session)
            .field("countdown", &self.countdown)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}
