use async_trait::async_trait;
use quiz_core::model::{QuestionKind, QuizSettings, RawQuestion};
use reqwest::Client;
use serde::Deserialize;

use crate::error::QuestionSourceError;

/// Supplier of raw trivia questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch up to `count` questions of the given kind.
    ///
    /// An upstream response without a result list yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` for transport, status or decoding failures.
    async fn fetch_question_set(
        &self,
        count: u32,
        kind: QuestionKind,
    ) -> Result<Vec<RawQuestion>, QuestionSourceError>;
}

/// HTTP client for the Open Trivia DB `api.php` endpoint.
#[derive(Clone, Debug)]
pub struct OpenTdbClient {
    client: Client,
    base_url: String,
}

impl OpenTdbClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self::new(settings.source_url())
    }

    fn endpoint(&self) -> String {
        format!("{}/api.php", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch_question_set(
        &self,
        count: u32,
        kind: QuestionKind,
    ) -> Result<Vec<RawQuestion>, QuestionSourceError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("amount", count.to_string()), ("type", kind.as_str().to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OpenTdbResponse {
    #[serde(default)]
    response_code: Option<u8>,
    #[serde(default)]
    results: Option<Vec<RawQuestion>>,
}

fn parse_response(body: &str) -> Result<Vec<RawQuestion>, QuestionSourceError> {
    let parsed: OpenTdbResponse = serde_json::from_str(body)?;
    match parsed.results {
        Some(results) => Ok(results),
        None => {
            tracing::debug!(
                response_code = ?parsed.response_code,
                "question response has no results"
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_results_list() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "type": "multiple",
                "difficulty": "easy",
                "category": "General Knowledge",
                "question": "What do bees make?",
                "correct_answer": "Honey",
                "incorrect_answers": ["Milk", "Wax", "Silk"]
            }]
        }"#;
        let questions = parse_response(body).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "Honey");
    }

    #[test]
    fn missing_results_means_no_questions() {
        assert!(parse_response(r#"{"response_code": 5}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_response("<html>rate limited</html>"),
            Err(QuestionSourceError::Decode(_))
        ));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = OpenTdbClient::new("https://opentdb.com/");
        assert_eq!(client.endpoint(), "https://opentdb.com/api.php");
    }
}
