//! Provider traits.
//!
//! `CompletionBackend` is the small surface a concrete backend
//! implements: one outbound call, raw text back. `AiProvider` is the
//! capability set the orchestrator consumes. The blanket impl turns any
//! backend into a full provider by running the shared pipeline —
//! build prompt, complete, extract, decode — and folding every failure
//! into a `success:false` envelope.

use async_trait::async_trait;

use crate::decode;
use crate::envelope::{AiResponse, TokenUsage};
use crate::error::AiError;
use crate::model::{
    ExerciseRequest, ExerciseResponse, ExplanationRequest, ExplanationResponse, HintRequest,
    HintResponse, ReportRequest, ReportResponse, ValidationRequest, ValidationResponse,
};
use crate::prompt;
use crate::report::SessionStats;

/// The operation a completion call services. Determines the token budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Exercises,
    Hint,
    Explanation,
    Validation,
    Report,
}

impl Operation {
    /// Maximum reply tokens to request from the backend. Hints and
    /// validations are short; exercise batches and reports are not.
    pub fn max_tokens(self) -> u32 {
        match self {
            Operation::Hint | Operation::Validation => 512,
            Operation::Explanation => 1024,
            Operation::Exercises | Operation::Report => 4096,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Exercises => "exercises",
            Operation::Hint => "hint",
            Operation::Explanation => "explanation",
            Operation::Validation => "validation",
            Operation::Report => "report",
        }
    }
}

/// Raw result of one completion call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Reply text as returned by the backend.
    pub text: String,
    /// Model that produced the reply, as reported by the backend.
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// One LLM backend: exactly one outbound network call per invocation,
/// no caching, immutable configuration after construction.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Provider identifier (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Configured model identifier.
    fn model(&self) -> &str;

    /// Send `prompt` and return the raw reply text.
    async fn complete(&self, prompt: &str, op: Operation) -> Result<Completion, AiError>;
}

/// The capability set exposed to callers. Every method returns a
/// normalized envelope; no error escapes as a fault.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    async fn generate_exercises(&self, request: &ExerciseRequest)
        -> AiResponse<ExerciseResponse>;
    async fn generate_hint(&self, request: &HintRequest) -> AiResponse<HintResponse>;
    async fn generate_explanation(
        &self,
        request: &ExplanationRequest,
    ) -> AiResponse<ExplanationResponse>;
    async fn validate_answer(&self, request: &ValidationRequest)
        -> AiResponse<ValidationResponse>;
    async fn generate_report(&self, request: &ReportRequest) -> AiResponse<ReportResponse>;
}

#[async_trait]
impl<B: CompletionBackend> AiProvider for B {
    fn name(&self) -> &str {
        CompletionBackend::name(self)
    }

    fn model(&self) -> &str {
        CompletionBackend::model(self)
    }

    async fn generate_exercises(
        &self,
        request: &ExerciseRequest,
    ) -> AiResponse<ExerciseResponse> {
        let prompt = prompt::exercises(request);
        match self.complete(&prompt, Operation::Exercises).await {
            Ok(completion) => match decode::exercises(&completion.text, request) {
                Ok(data) => AiResponse::ok(
                    data,
                    CompletionBackend::name(self),
                    &completion.model,
                    completion.usage,
                ),
                Err(e) => malformed(self, &completion, e),
            },
            Err(e) => transport_failure(self, e),
        }
    }

    async fn generate_hint(&self, request: &HintRequest) -> AiResponse<HintResponse> {
        let prompt = prompt::hint(request);
        match self.complete(&prompt, Operation::Hint).await {
            Ok(completion) => match decode::hint(&completion.text) {
                Ok(data) => AiResponse::ok(
                    data,
                    CompletionBackend::name(self),
                    &completion.model,
                    completion.usage,
                ),
                Err(e) => malformed(self, &completion, e),
            },
            Err(e) => transport_failure(self, e),
        }
    }

    async fn generate_explanation(
        &self,
        request: &ExplanationRequest,
    ) -> AiResponse<ExplanationResponse> {
        let prompt = prompt::explanation(request);
        match self.complete(&prompt, Operation::Explanation).await {
            Ok(completion) => match decode::explanation(&completion.text) {
                Ok(data) => AiResponse::ok(
                    data,
                    CompletionBackend::name(self),
                    &completion.model,
                    completion.usage,
                ),
                Err(e) => malformed(self, &completion, e),
            },
            Err(e) => transport_failure(self, e),
        }
    }

    async fn validate_answer(
        &self,
        request: &ValidationRequest,
    ) -> AiResponse<ValidationResponse> {
        let prompt = prompt::validation(request);
        match self.complete(&prompt, Operation::Validation).await {
            Ok(completion) => match decode::validation(&completion.text) {
                Ok(data) => AiResponse::ok(
                    data,
                    CompletionBackend::name(self),
                    &completion.model,
                    completion.usage,
                ),
                Err(e) => malformed(self, &completion, e),
            },
            Err(e) => transport_failure(self, e),
        }
    }

    async fn generate_report(&self, request: &ReportRequest) -> AiResponse<ReportResponse> {
        let stats = match SessionStats::from_request(request) {
            Ok(stats) => stats,
            Err(e) => {
                return AiResponse::failure(
                    e,
                    CompletionBackend::name(self),
                    CompletionBackend::model(self),
                )
            }
        };
        let prompt = prompt::report(request, &stats);
        match self.complete(&prompt, Operation::Report).await {
            Ok(completion) => match decode::report(&completion.text, &stats) {
                Ok(data) => AiResponse::ok(
                    data,
                    CompletionBackend::name(self),
                    &completion.model,
                    completion.usage,
                ),
                Err(e) => malformed(self, &completion, e),
            },
            Err(e) => transport_failure(self, e),
        }
    }
}

/// Failure after a reply was fetched: keep the reply's model identifier
/// and log the raw text for diagnostics.
fn malformed<B: CompletionBackend, T>(
    backend: &B,
    completion: &Completion,
    error: AiError,
) -> AiResponse<T> {
    tracing::debug!(
        provider = CompletionBackend::name(backend),
        raw = %completion.text,
        %error,
        "reply could not be decoded"
    );
    AiResponse::failure(error, CompletionBackend::name(backend), &completion.model)
}

/// Failure before any reply text existed.
fn transport_failure<B: CompletionBackend, T>(backend: &B, error: AiError) -> AiResponse<T> {
    tracing::debug!(
        provider = CompletionBackend::name(backend),
        %error,
        "completion call failed"
    );
    AiResponse::failure(
        error,
        CompletionBackend::name(backend),
        CompletionBackend::model(backend),
    )
}
