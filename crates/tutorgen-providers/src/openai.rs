//! OpenAI chat-completions backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tutorgen_core::traits::{Completion, CompletionBackend, Operation};
use tutorgen_core::{AiError, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const SYSTEM_PROMPT: &str = "You are the generation engine of a tutoring platform. \
    Reply with ONLY the JSON structure the instructions describe. Do not add prose, \
    markdown fences, or commentary around it.";

/// OpenAI-compatible API backend.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
        model: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: OpenAiUsage,
    model: String,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

#[derive(Deserialize, Default)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, op = op.name()))]
    async fn complete(&self, prompt: &str, op: Operation) -> Result<Completion, AiError> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            max_tokens: op.max_tokens(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                AiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream { status, message });
        }

        let api_response: OpenAiResponse =
            response.json().await.map_err(|e| AiError::Upstream {
                status,
                message: format!("unreadable response body: {e}"),
            })?;

        let text = api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| AiError::Upstream {
                status,
                message: "reply contained no choices".into(),
            })?;

        Ok(Completion {
            text,
            model: api_response.model,
            usage: Some(TokenUsage::new(
                api_response.usage.prompt_tokens,
                api_response.usage.completion_tokens,
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorgen_core::model::{Difficulty, ValidationRequest};
    use tutorgen_core::traits::AiProvider;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn successful_completion() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "{\"is_correct\": true, \"feedback\": \"nice\"}",
                                     "role": "assistant"}, "index": 0}],
            "model": "gpt-4.1-mini",
            "usage": {"prompt_tokens": 40, "completion_tokens": 15, "total_tokens": 55}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("test-key", Some(server.uri()), None, None);
        let completion = client
            .complete("judge this answer", Operation::Validation)
            .await
            .unwrap();

        assert!(completion.text.contains("is_correct"));
        assert_eq!(completion.usage.unwrap().total_tokens, 55);
        assert_eq!(completion.model, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn server_error_is_upstream() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("key", Some(server.uri()), None, None);
        let err = client.complete("test", Operation::Hint).await.unwrap_err();

        match err {
            AiError::Upstream { status, .. } => assert_eq!(status, 500),
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_choices_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [],
                "model": "gpt-4.1-mini"
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("key", Some(server.uri()), None, None);
        let err = client.complete("test", Operation::Hint).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn validation_operation_end_to_end() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {
                "content": "{\"is_correct\": false, \"feedback\": \"Check the ones column.\"}",
                "role": "assistant"}, "index": 0}],
            "model": "gpt-4.1-mini",
            "usage": {"prompt_tokens": 60, "completion_tokens": 20, "total_tokens": 80}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("test-key", Some(server.uri()), None, None);
        let response = client
            .validate_answer(&ValidationRequest {
                statement: "17 + 25 = ?".into(),
                correct_answer: "42".into(),
                student_answer: "41".into(),
                difficulty: Difficulty::Medium,
                topic: "addition with carrying".into(),
            })
            .await;

        assert!(response.success);
        let data = response.data.unwrap();
        assert!(!data.is_correct);
        assert_eq!(data.feedback, "Check the ones column.");
    }
}
