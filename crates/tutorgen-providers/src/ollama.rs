//! Ollama (local LLM) backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tutorgen_core::traits::{Completion, CompletionBackend, Operation};
use tutorgen_core::{AiError, TokenUsage};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.1:8b";
const DEFAULT_TIMEOUT_SECS: u64 = 300; // Local models are slower
const SYSTEM_PROMPT: &str = "You are the generation engine of a tutoring platform. \
    Reply with ONLY the JSON structure the instructions describe. Do not add prose, \
    markdown fences, or commentary around it.";

/// Ollama local backend.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: Option<String>) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
    model: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl CompletionBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, op = op.name()))]
    async fn complete(&self, prompt: &str, op: Operation) -> Result<Completion, AiError> {
        let body = OllamaRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                num_predict: op.max_tokens(),
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else if e.is_connect() {
                    AiError::Network(format!(
                        "Ollama not reachable at {}. Is it running? Start with: ollama serve",
                        self.base_url
                    ))
                } else {
                    AiError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(AiError::Upstream {
                status,
                message: format!(
                    "model '{}' not found locally. Pull it with: ollama pull {}",
                    self.model, self.model
                ),
            });
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream { status, message });
        }

        let api_response: OllamaResponse =
            response.json().await.map_err(|e| AiError::Upstream {
                status,
                message: format!("unreadable response body: {e}"),
            })?;

        let usage = match (api_response.prompt_eval_count, api_response.eval_count) {
            (None, None) => None,
            (prompt_tokens, completion_tokens) => Some(TokenUsage::new(
                prompt_tokens.unwrap_or(0),
                completion_tokens.unwrap_or(0),
            )),
        };

        Ok(Completion {
            text: api_response.message.content,
            model: api_response.model,
            usage,
        })
    }
}
