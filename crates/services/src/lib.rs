#![forbid(unsafe_code)]

pub mod error;
pub mod question_source;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{QuestionSourceError, SessionError};
pub use question_source::{OpenTdbClient, QuestionSource};

pub use sessions::{
    AnswerOutcome, Countdown, QuestionView, QuizIntent, QuizLoopService, QuizRuntime,
    QuizSession, ResultsView, SessionView, TickOutcome,
};
