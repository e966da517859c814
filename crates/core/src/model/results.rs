use crate::model::Answer;

/// Score breakdown for a finished (or abandoned) attempt. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizResults {
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub total: usize,
}

impl QuizResults {
    #[must_use]
    pub fn tally(total: usize, answers: &[Answer]) -> Self {
        let correct = answers.iter().filter(|answer| answer.is_correct()).count();
        let wrong = answers.len() - correct;
        Self {
            correct,
            wrong,
            unanswered: total.saturating_sub(answers.len()),
            total,
        }
    }

    /// Share of correct answers, rounded half up. Zero when there were no questions.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (self.correct * 200 + self.total) / (self.total * 2);
        u32::try_from(rounded).unwrap_or(u32::MAX)
    }
}
