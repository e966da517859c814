use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question has no answer options")]
    NoOptions,

    #[error("correct answer is not among the options")]
    MissingCorrectAnswer,
}

//
// ─── RAW RECORD ────────────────────────────────────────────────────────────────
//

/// Question record as delivered by the trivia source, still entity-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A formatted multiple-choice question. Immutable once built.
///
/// Field names on the wire match the persisted snapshot layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    text: String,
    correct_answer: String,
    options: Vec<String>,
    category: String,
    difficulty: String,
}

impl Question {
    /// Build a question from already-decoded parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, there are no options,
    /// or the correct answer is not one of the options.
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
        category: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = Self::from_parts(
            text.into(),
            correct_answer.into(),
            options,
            category.into(),
            difficulty.into(),
        );
        question.validate()?;
        Ok(question)
    }

    pub(crate) fn from_parts(
        text: String,
        correct_answer: String,
        options: Vec<String>,
        category: String,
        difficulty: String,
    ) -> Self {
        Self {
            text,
            correct_answer,
            options,
            category,
            difficulty,
        }
    }

    /// Check the structural invariants of a question (used for rehydrated data).
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if !self.has_option(&self.correct_answer) {
            return Err(QuestionError::MissingCorrectAnswer);
        }
        Ok(())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn has_option(&self, candidate: &str) -> bool {
        self.options.iter().any(|option| option == candidate)
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.correct_answer == candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["Paris".into(), "Rome".into(), "Oslo".into(), "Bern".into()]
    }

    #[test]
    fn rejects_question_without_correct_option() {
        let err = Question::new(
            "Capital of France?",
            "Lyon",
            options(),
            "Geography",
            "easy",
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::MissingCorrectAnswer);
    }

    #[test]
    fn correctness_is_exact_string_equality() {
        let question =
            Question::new("Capital of France?", "Paris", options(), "Geography", "easy").unwrap();
        assert!(question.is_correct("Paris"));
        assert!(!question.is_correct("paris"));
        assert!(!question.is_correct("Paris "));
    }

    #[test]
    fn raw_question_parses_source_record() {
        let raw: RawQuestion = serde_json::from_str(
            r#"{
                "type": "multiple",
                "difficulty": "medium",
                "category": "Science &amp; Nature",
                "question": "What is H&#039;s symbol?",
                "correct_answer": "H",
                "incorrect_answers": ["He", "Hy", "Hd"]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.kind.as_deref(), Some("multiple"));
        assert_eq!(raw.incorrect_answers.len(), 3);
        assert_eq!(raw.category, "Science &amp; Nature");
    }
}
