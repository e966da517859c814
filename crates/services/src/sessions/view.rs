use quiz_core::model::SessionPhase;

use super::service::QuizSession;

/// Read-only projection of a session for rendering one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub player: Option<String>,
    pub loading: bool,
    pub start_failure: Option<String>,
    pub question: Option<QuestionView>,
    pub time_remaining_secs: Option<u32>,
    pub results: Option<ResultsView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsView {
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub total: usize,
    pub percentage: u32,
}

impl SessionView {
    #[must_use]
    pub fn from_session(session: &QuizSession, loading: bool) -> Self {
        let question = session.current_question().and_then(|question| {
            let attempt = session.attempt()?;
            Some(QuestionView {
                number: attempt.current_index() + 1,
                total: attempt.total_questions(),
                text: question.text().to_string(),
                options: question.options().to_vec(),
                category: question.category().to_string(),
                difficulty: question.difficulty().to_string(),
            })
        });

        let results = session.results().map(|results| ResultsView {
            correct: results.correct,
            wrong: results.wrong,
            unanswered: results.unanswered,
            total: results.total,
            percentage: results.percentage(),
        });

        Self {
            phase: session.phase(),
            player: session.player().map(|player| player.as_str().to_string()),
            loading,
            start_failure: session.start_failure().map(str::to_string),
            question,
            time_remaining_secs: session.time_remaining_secs(),
            results,
        }
    }
}

/// `m:ss` label for a remaining-seconds count.
#[must_use]
pub fn clock_label(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;

    #[test]
    fn clock_label_pads_seconds() {
        assert_eq!(clock_label(180), "3:00");
        assert_eq!(clock_label(65), "1:05");
        assert_eq!(clock_label(9), "0:09");
    }

    #[test]
    fn in_progress_view_numbers_questions_from_one() {
        let mut session = QuizSession::new(180);
        session.offer_resume(None).unwrap();
        session.login("Ada").unwrap();
        let questions = (0..3)
            .map(|n| {
                Question::new(
                    format!("Q{n}"),
                    "a",
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    "Art",
                    "hard",
                )
                .unwrap()
            })
            .collect();
        session.begin_quiz(questions).unwrap();
        session.select_answer("b").unwrap();

        let view = SessionView::from_session(&session, false);
        assert_eq!(view.phase, SessionPhase::InProgress);
        assert_eq!(view.player.as_deref(), Some("Ada"));
        let question = view.question.unwrap();
        assert_eq!((question.number, question.total), (2, 3));
        assert_eq!(question.text, "Q1");
        assert_eq!(view.time_remaining_secs, Some(180));
        assert!(view.results.is_none());
    }
}
