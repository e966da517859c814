mod answer;
mod attempt;
mod phase;
mod player;
mod question;
mod results;
mod settings;
mod snapshot;

pub use answer::Answer;
pub use attempt::{AttemptError, QuizAttempt};
pub use phase::SessionPhase;
pub use player::{LoginError, PlayerName};
pub use question::{Question, QuestionError, RawQuestion};
pub use results::QuizResults;
pub use settings::{
    MAX_QUESTION_COUNT, QuestionKind, QuizSettings, QuizSettingsDraft, SettingsError,
};
pub use snapshot::{QuizSnapshot, SnapshotError};
