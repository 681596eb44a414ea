//! Mock backend for testing without real API calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tutorgen_core::traits::{Completion, CompletionBackend, Operation};
use tutorgen_core::{AiError, TokenUsage};

/// A mock backend returning scripted replies based on prompt content.
///
/// Records the number of calls and the last prompt, so tests can assert
/// both what was sent and that nothing was sent at all.
pub struct MockClient {
    /// Map of prompt substring → reply text.
    responses: HashMap<String, String>,
    /// Reply when no substring matches.
    default_response: String,
    call_count: AtomicU32,
    last_prompt: Mutex<Option<String>>,
}

impl MockClient {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: "{}".to_string(),
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A mock that always returns the same reply text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The most recent prompt, if any call was made.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, prompt: &str, _op: Operation) -> Result<Completion, AiError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        let text = self
            .responses
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        // Rough estimate
        let usage = TokenUsage::new((prompt.len() / 4) as u32, (text.len() / 4) as u32);

        Ok(Completion {
            text,
            model: "mock-model".into(),
            usage: Some(usage),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorgen_core::model::{Difficulty, HintRequest};
    use tutorgen_core::traits::AiProvider;

    #[tokio::test]
    async fn fixed_response_and_bookkeeping() {
        let client = MockClient::with_fixed_response("{\"hint\": \"count on\"}");
        let completion = client.complete("anything", Operation::Hint).await.unwrap();

        assert_eq!(completion.text, "{\"hint\": \"count on\"}");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.last_prompt().unwrap(), "anything");
    }

    #[tokio::test]
    async fn prompt_substring_matching() {
        let mut responses = HashMap::new();
        responses.insert(
            "fractions".to_string(),
            "{\"hint\": \"find a common denominator\"}".to_string(),
        );
        responses.insert(
            "addition".to_string(),
            "{\"hint\": \"count up from the larger number\"}".to_string(),
        );
        let client = MockClient::new(responses);

        let request = HintRequest {
            statement: "1/2 + 1/3 = ?".into(),
            difficulty: Difficulty::Advanced,
            topic: "fractions".into(),
            previous_hints: vec![],
        };
        let response = client.generate_hint(&request).await;

        assert!(response.success);
        assert_eq!(
            response.data.unwrap().hint,
            "find a common denominator"
        );
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn default_reply_fails_hint_decoding() {
        // "{}" parses but has no hint field, exercising the Validation path.
        let client = MockClient::new(HashMap::new());
        let response = client
            .generate_hint(&HintRequest {
                statement: "2 + 2".into(),
                difficulty: Difficulty::Basic,
                topic: "basic addition".into(),
                previous_hints: vec![],
            })
            .await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("hint"));
    }
}
