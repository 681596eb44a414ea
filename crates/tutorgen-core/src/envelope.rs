//! The normalized response envelope returned by every public operation.

use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Token accounting reported by a backend, when available.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the reply.
    pub completion_tokens: u32,
    /// Sum of the two.
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Envelope wrapping every operation result.
///
/// Invariant: `success == true` iff `data` is present; `success == false`
/// iff `error` is present and `data` is absent. The two constructors are
/// the only way this type is built, so the invariant holds everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Identifier of the provider that serviced (or refused) the call.
    pub provider: String,
    /// Model that produced the reply, as reported by the backend.
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl<T> AiResponse<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T, provider: &str, model: &str, usage: Option<TokenUsage>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            provider: provider.to_string(),
            model: model.to_string(),
            usage,
        }
    }

    /// A failed envelope carrying the error's message.
    pub fn failure(error: AiError, provider: &str, model: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            provider: provider.to_string(),
            model: model.to_string(),
            usage: None,
        }
    }

    /// Unwrap into the carried data or the error message.
    pub fn into_result(self) -> Result<T, String> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(self.error.unwrap_or_else(|| "unknown failure".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_upholds_invariant() {
        let resp = AiResponse::ok(42u32, "mock", "mock-model", Some(TokenUsage::new(10, 5)));
        assert!(resp.success);
        assert_eq!(resp.data, Some(42));
        assert!(resp.error.is_none());
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn failure_envelope_upholds_invariant() {
        let resp: AiResponse<u32> =
            AiResponse::failure(AiError::Network("connection refused".into()), "openai", "gpt");
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert!(resp.error.as_deref().unwrap().contains("connection refused"));
    }

    #[test]
    fn failure_serializes_without_data_field() {
        let resp: AiResponse<u32> =
            AiResponse::failure(AiError::Validation("no hint".into()), "mock", "m");
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["success"], false);
    }

    #[test]
    fn into_result() {
        let ok = AiResponse::ok("hi".to_string(), "mock", "m", None);
        assert_eq!(ok.into_result().unwrap(), "hi");

        let err: AiResponse<String> =
            AiResponse::failure(AiError::Timeout(60), "mock", "m");
        assert!(err.into_result().unwrap_err().contains("timed out"));
    }
}
