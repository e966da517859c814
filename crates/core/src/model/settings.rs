use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Open Trivia DB returns at most this many questions per request.
pub const MAX_QUESTION_COUNT: u32 = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question count must be between 1 and {}", MAX_QUESTION_COUNT)]
    InvalidQuestionCount,

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("tick interval must be > 0")]
    InvalidTick,

    #[error("storage key cannot be empty")]
    EmptyStorageKey,

    #[error("invalid question source URL")]
    InvalidSourceUrl,

    #[error("unknown question kind: {0}")]
    UnknownQuestionKind(String),
}

/// Question type requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionKind {
    /// Four options, one correct.
    #[default]
    Multiple,
    /// True/false.
    Boolean,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Multiple => "multiple",
            QuestionKind::Boolean => "boolean",
        }
    }
}

impl std::str::FromStr for QuestionKind {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "multiple" => Ok(Self::Multiple),
            "boolean" => Ok(Self::Boolean),
            other => Err(SettingsError::UnknownQuestionKind(other.to_string())),
        }
    }
}

/// Tunables for a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    question_count: u32,
    question_kind: QuestionKind,
    time_limit_secs: u32,
    tick: Duration,
    storage_key: String,
    source_url: String,
}

/// Unvalidated overrides, e.g. read from the environment.
#[derive(Debug, Clone, Default)]
pub struct QuizSettingsDraft {
    pub question_count: Option<u32>,
    pub question_kind: Option<QuestionKind>,
    pub time_limit_secs: Option<u32>,
    pub tick: Option<Duration>,
    pub storage_key: Option<String>,
    pub source_url: Option<String>,
}

impl QuizSettingsDraft {
    /// Apply the overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for out-of-range values or a malformed source URL.
    pub fn validate(self) -> Result<QuizSettings, SettingsError> {
        let defaults = QuizSettings::default();

        let question_count = self.question_count.unwrap_or(defaults.question_count);
        if question_count == 0 || question_count > MAX_QUESTION_COUNT {
            return Err(SettingsError::InvalidQuestionCount);
        }

        let time_limit_secs = self.time_limit_secs.unwrap_or(defaults.time_limit_secs);
        if time_limit_secs == 0 {
            return Err(SettingsError::InvalidTimeLimit);
        }

        let tick = self.tick.unwrap_or(defaults.tick);
        if tick.is_zero() {
            return Err(SettingsError::InvalidTick);
        }

        let storage_key = self
            .storage_key
            .map(|key| key.trim().to_string())
            .unwrap_or(defaults.storage_key);
        if storage_key.is_empty() {
            return Err(SettingsError::EmptyStorageKey);
        }

        let source_url = self
            .source_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.source_url);
        if Url::parse(&source_url).is_err() {
            return Err(SettingsError::InvalidSourceUrl);
        }

        Ok(QuizSettings {
            question_count,
            question_kind: self.question_kind.unwrap_or(defaults.question_kind),
            time_limit_secs,
            tick,
            storage_key,
            source_url,
        })
    }
}

impl Default for QuizSettings {
    /// Ten multiple-choice questions, three minutes, one-second ticks.
    fn default() -> Self {
        Self {
            question_count: 10,
            question_kind: QuestionKind::Multiple,
            time_limit_secs: 180,
            tick: Duration::from_secs(1),
            storage_key: "quizAppData".into(),
            source_url: "https://opentdb.com".into(),
        }
    }
}

impl QuizSettings {
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn question_kind(&self) -> QuestionKind {
        self.question_kind
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        self.tick
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_yields_defaults() {
        let settings = QuizSettingsDraft::default().validate().unwrap();
        assert_eq!(settings, QuizSettings::default());
        assert_eq!(settings.storage_key(), "quizAppData");
        assert_eq!(settings.time_limit_secs(), 180);
        assert_eq!(settings.question_count(), 10);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let zero_count = QuizSettingsDraft {
            question_count: Some(0),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(
            zero_count.validate().unwrap_err(),
            SettingsError::InvalidQuestionCount
        );

        let zero_time = QuizSettingsDraft {
            time_limit_secs: Some(0),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(zero_time.validate().unwrap_err(), SettingsError::InvalidTimeLimit);

        let blank_key = QuizSettingsDraft {
            storage_key: Some("   ".into()),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(blank_key.validate().unwrap_err(), SettingsError::EmptyStorageKey);
    }

    #[test]
    fn normalizes_source_url() {
        let settings = QuizSettingsDraft {
            source_url: Some(" http://localhost:8080/ ".into()),
            ..QuizSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.source_url(), "http://localhost:8080");

        let bad = QuizSettingsDraft {
            source_url: Some("not a url".into()),
            ..QuizSettingsDraft::default()
        };
        assert_eq!(bad.validate().unwrap_err(), SettingsError::InvalidSourceUrl);
    }

    #[test]
    fn parses_question_kind() {
        assert_eq!("multiple".parse::<QuestionKind>(), Ok(QuestionKind::Multiple));
        assert_eq!("boolean".parse::<QuestionKind>(), Ok(QuestionKind::Boolean));
        assert!("essay".parse::<QuestionKind>().is_err());
    }
}
