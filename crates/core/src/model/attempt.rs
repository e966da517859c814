use thiserror::Error;

use crate::model::{Answer, Question, QuizResults};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("an attempt needs at least one question")]
    NoQuestions,

    #[error("every question has already been answered")]
    Exhausted,

    #[error("time is up")]
    OutOfTime,

    #[error("\"{selected}\" is not an option for the current question")]
    UnknownOption { selected: String },
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// Quiz data for one attempt: the question set, answers so far and the clock.
///
/// Invariant: `answers.len() == current_index <= questions.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<Answer>,
    time_remaining_secs: u32,
}

impl QuizAttempt {
    /// Start a fresh attempt over the given questions.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoQuestions` if `questions` is empty.
    pub fn new(questions: Vec<Question>, time_limit_secs: u32) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::NoQuestions);
        }
        Ok(Self {
            questions,
            current_index: 0,
            answers: Vec::new(),
            time_remaining_secs: time_limit_secs,
        })
    }

    /// Rehydrate an attempt whose invariants were checked by the caller.
    pub(crate) fn restore(
        questions: Vec<Question>,
        current_index: usize,
        answers: Vec<Answer>,
        time_remaining_secs: u32,
    ) -> Self {
        Self {
            questions,
            current_index,
            answers,
            time_remaining_secs,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// No question is left to answer.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    #[must_use]
    pub fn is_out_of_time(&self) -> bool {
        self.time_remaining_secs == 0
    }

    /// Record `selected` for the current question and move to the next one.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::OutOfTime` once the clock hit zero,
    /// `AttemptError::Exhausted` when nothing is left to answer, and
    /// `AttemptError::UnknownOption` if `selected` is not one of the options.
    pub fn record_answer(&mut self, selected: &str) -> Result<&Answer, AttemptError> {
        if self.is_out_of_time() {
            return Err(AttemptError::OutOfTime);
        }
        let question = self.current_question().ok_or(AttemptError::Exhausted)?;
        if !question.has_option(selected) {
            return Err(AttemptError::UnknownOption {
                selected: selected.to_string(),
            });
        }

        let answer = Answer::for_question(question, selected);
        self.answers.push(answer);
        self.current_index += 1;
        self.answers.last().ok_or(AttemptError::Exhausted)
    }

    /// Take one second off the clock and return what is left.
    pub fn tick(&mut self) -> u32 {
        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        self.time_remaining_secs
    }

    #[must_use]
    pub fn results(&self) -> QuizResults {
        QuizResults::tally(self.questions.len(), &self.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize) -> Question {
        Question::new(
            format!("Q{n}"),
            "right",
            vec!["wrong-a".into(), "right".into(), "wrong-b".into(), "wrong-c".into()],
            "General",
            "easy",
        )
        .unwrap()
    }

    fn attempt(count: usize, secs: u32) -> QuizAttempt {
        QuizAttempt::new((0..count).map(question).collect(), secs).unwrap()
    }

    #[test]
    fn empty_question_set_is_rejected() {
        assert_eq!(
            QuizAttempt::new(Vec::new(), 180).unwrap_err(),
            AttemptError::NoQuestions
        );
    }

    #[test]
    fn answers_advance_in_question_order() {
        let mut attempt = attempt(3, 180);
        let first = attempt.record_answer("right").unwrap().clone();
        assert_eq!(first.question_text(), "Q0");
        assert!(first.is_correct());

        let second = attempt.record_answer("wrong-b").unwrap();
        assert_eq!(second.question_text(), "Q1");
        assert!(!second.is_correct());

        assert_eq!(attempt.current_index(), 2);
        assert_eq!(attempt.answers().len(), attempt.current_index());
        assert_eq!(attempt.current_question().unwrap().text(), "Q2");
    }

    #[test]
    fn unknown_option_leaves_attempt_unchanged() {
        let mut attempt = attempt(2, 180);
        let err = attempt.record_answer("maybe").unwrap_err();
        assert!(matches!(err, AttemptError::UnknownOption { .. }));
        assert_eq!(attempt.current_index(), 0);
        assert!(attempt.answers().is_empty());
    }

    #[test]
    fn exhausted_attempt_refuses_more_answers() {
        let mut attempt = attempt(1, 180);
        attempt.record_answer("right").unwrap();
        assert!(attempt.is_exhausted());
        assert_eq!(
            attempt.record_answer("right").unwrap_err(),
            AttemptError::Exhausted
        );
    }

    #[test]
    fn tick_saturates_at_zero_and_blocks_answers() {
        let mut attempt = attempt(2, 1);
        assert_eq!(attempt.tick(), 0);
        assert_eq!(attempt.tick(), 0);
        assert!(attempt.is_out_of_time());
        assert_eq!(
            attempt.record_answer("right").unwrap_err(),
            AttemptError::OutOfTime
        );
    }

    #[test]
    fn results_always_sum_to_total() {
        let picks = ["right", "wrong-a", "right", "wrong-c", "right"];
        for answered in 0..=picks.len() {
            let mut attempt = attempt(picks.len(), 180);
            for pick in &picks[..answered] {
                attempt.record_answer(pick).unwrap();
            }
            let results = attempt.results();
            assert_eq!(
                results.correct + results.wrong + results.unanswered,
                results.total
            );
            assert_eq!(results.unanswered, picks.len() - answered);
        }
    }
}
