mod countdown;
mod runtime;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use countdown::Countdown;
pub use runtime::{QuizIntent, QuizRuntime};
pub use service::{AnswerOutcome, QuizSession, TickOutcome};
pub use view::{QuestionView, ResultsView, SessionView, clock_label};
pub use workflow::QuizLoopService;
