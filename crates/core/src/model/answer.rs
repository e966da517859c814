use serde::{Deserialize, Serialize};

use crate::model::Question;

/// A recorded response to one question. Appended once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(rename = "question")]
    question_text: String,
    selected_answer: String,
    correct_answer: String,
    is_correct: bool,
}

impl Answer {
    #[must_use]
    pub fn for_question(question: &Question, selected: impl Into<String>) -> Self {
        let selected_answer = selected.into();
        Self {
            question_text: question.text().to_string(),
            is_correct: question.is_correct(&selected_answer),
            correct_answer: question.correct_answer().to_string(),
            selected_answer,
        }
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn selected_answer(&self) -> &str {
        &self.selected_answer
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// True when the stored flag agrees with the stored strings.
    #[must_use]
    pub(crate) fn is_consistent(&self) -> bool {
        self.is_correct == (self.selected_answer == self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_serializes_with_snapshot_keys() {
        let question = Question::new(
            "2 + 2?",
            "4",
            vec!["3".into(), "4".into(), "5".into(), "22".into()],
            "Math",
            "easy",
        )
        .unwrap();
        let answer = Answer::for_question(&question, "5");
        assert!(!answer.is_correct());

        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["question"], "2 + 2?");
        assert_eq!(json["selectedAnswer"], "5");
        assert_eq!(json["correctAnswer"], "4");
        assert_eq!(json["isCorrect"], false);
    }
}
