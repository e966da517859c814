//! Turns raw source records into [`Question`]s: entity decoding plus option shuffling.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{Question, RawQuestion};

/// Decode named (`&amp;`) and numeric (`&#039;`, `&#x27;`) character references.
#[must_use]
pub fn decode_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// Format one record. The correct answer lands at a uniformly random position.
pub fn format_question<R: Rng + ?Sized>(raw: RawQuestion, rng: &mut R) -> Question {
    let correct_answer = decode_text(&raw.correct_answer);

    let mut options = Vec::with_capacity(raw.incorrect_answers.len() + 1);
    options.push(correct_answer.clone());
    options.extend(raw.incorrect_answers.iter().map(|answer| decode_text(answer)));
    options.shuffle(rng);

    Question::from_parts(
        decode_text(&raw.question),
        correct_answer,
        options,
        decode_text(&raw.category),
        decode_text(&raw.difficulty),
    )
}

pub fn format_questions<R: Rng + ?Sized>(raw: Vec<RawQuestion>, rng: &mut R) -> Vec<Question> {
    raw.into_iter()
        .map(|record| format_question(record, rng))
        .collect()
}

/// Formatter with an optional fixed seed for reproducible option order.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionFormatter {
    seed: Option<u64>,
}

impl QuestionFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    #[must_use]
    pub fn format(&self, raw: Vec<RawQuestion>) -> Vec<Question> {
        match self.seed {
            Some(seed) => format_questions(raw, &mut StdRng::seed_from_u64(seed)),
            None => format_questions(raw, &mut rand::rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(question: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
        RawQuestion {
            question: question.into(),
            correct_answer: correct.into(),
            incorrect_answers: incorrect.iter().map(|s| (*s).to_string()).collect(),
            category: "Entertainment: Video Games".into(),
            difficulty: "medium".into(),
            kind: Some("multiple".into()),
        }
    }

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(decode_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_text("It&#039;s &quot;fine&quot;"), "It's \"fine\"");
        assert_eq!(decode_text("&lt;b&gt; &#x41;"), "<b> A");
        assert_eq!(decode_text("plain"), "plain");
    }

    #[test]
    fn options_are_a_permutation_with_one_correct_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        let question = format_question(
            raw("Who&#039;s there?", "Me &amp; you", &["Him", "Her", "Them"]),
            &mut rng,
        );

        assert_eq!(question.text(), "Who's there?");
        assert_eq!(question.correct_answer(), "Me & you");
        assert_eq!(question.options().len(), 4);

        let mut sorted = question.options().to_vec();
        sorted.sort();
        let mut expected = vec![
            "Her".to_string(),
            "Him".to_string(),
            "Me & you".to_string(),
            "Them".to_string(),
        ];
        expected.sort();
        assert_eq!(sorted, expected);
        assert_eq!(
            question
                .options()
                .iter()
                .filter(|option| option.as_str() == "Me & you")
                .count(),
            1
        );
        assert!(question.validate().is_ok());
    }

    #[test]
    fn correct_answer_position_varies() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let question = format_question(raw("Q", "A", &["B", "C", "D"]), &mut rng);
            let position = question
                .options()
                .iter()
                .position(|option| option == "A")
                .unwrap();
            seen[position] = true;
        }
        assert!(seen.iter().all(|hit| *hit), "positions seen: {seen:?}");
    }

    #[test]
    fn seeded_formatter_is_reproducible() {
        let batch = || {
            vec![
                raw("One", "1", &["2", "3", "4"]),
                raw("Two", "2", &["1", "3", "4"]),
            ]
        };
        let formatter = QuestionFormatter::seeded(99);
        assert_eq!(formatter.format(batch()), formatter.format(batch()));
    }

    #[test]
    fn boolean_records_keep_two_options() {
        let mut record = raw("The sky is green.", "False", &["True"]);
        record.kind = Some("boolean".into());
        let question = format_question(record, &mut StdRng::seed_from_u64(3));

        assert_eq!(question.options().len(), 2);
        assert!(question.has_option("True"));
        assert!(question.is_correct("False"));
        assert!(question.validate().is_ok());
    }

    #[test]
    fn empty_input_yields_no_questions() {
        assert!(QuestionFormatter::new().format(Vec::new()).is_empty());
    }
}
