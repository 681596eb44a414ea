//! The generation orchestrator.
//!
//! One provider is chosen from configuration when the orchestrator is
//! built and services every operation for the process lifetime. Other
//! configured providers are never instantiated. There is no fallback and
//! no retry: if the active provider fails, the failure envelope is
//! returned as-is.

use std::sync::Arc;

use tutorgen_core::model::{
    ExerciseRequest, ExerciseResponse, ExplanationRequest, ExplanationResponse, HintRequest,
    HintResponse, ReportRequest, ReportResponse, ValidationRequest, ValidationResponse,
};
use tutorgen_core::traits::AiProvider;
use tutorgen_core::{AiError, AiResponse};

use crate::config::TutorgenConfig;

enum ActiveClient {
    Ready(Arc<dyn AiProvider>),
    /// Construction was refused; every operation reports this reason.
    Unconfigured { reason: String },
}

/// Single entry point for the five generation operations.
pub struct Orchestrator {
    active: String,
    client: ActiveClient,
}

impl Orchestrator {
    /// Build from an explicit, immutable configuration value.
    ///
    /// Only the active provider is instantiated. A missing entry or a
    /// missing/placeholder credential leaves the orchestrator in an
    /// unconfigured state in which every operation returns a
    /// configuration failure without any network I/O.
    pub fn from_config(config: &TutorgenConfig) -> Self {
        let active = config.active_provider.clone();

        let client = match config.providers.get(&active) {
            None => ActiveClient::Unconfigured {
                reason: format!("no configuration entry for provider '{active}'"),
            },
            Some(provider_config) => match provider_config.credential_error() {
                Some(reason) => ActiveClient::Unconfigured { reason },
                None => match crate::config::create_provider(provider_config) {
                    Ok(provider) => {
                        tracing::info!(provider = %active, model = provider.model(), "provider ready");
                        ActiveClient::Ready(Arc::from(provider))
                    }
                    Err(e) => ActiveClient::Unconfigured {
                        reason: e.to_string(),
                    },
                },
            },
        };

        if let ActiveClient::Unconfigured { reason } = &client {
            tracing::warn!(provider = %active, %reason, "provider not configured");
        }

        Self { active, client }
    }

    /// Build around an already-constructed provider. Used by tests and
    /// by embedders that manage their own clients.
    pub fn with_provider(name: &str, provider: Arc<dyn AiProvider>) -> Self {
        Self {
            active: name.to_string(),
            client: ActiveClient::Ready(provider),
        }
    }

    /// Identifier of the active provider.
    pub fn active_provider(&self) -> &str {
        &self.active
    }

    /// Model identifier of the active provider, when it is ready.
    pub fn active_model(&self) -> Option<&str> {
        match &self.client {
            ActiveClient::Ready(provider) => Some(provider.model()),
            ActiveClient::Unconfigured { .. } => None,
        }
    }

    /// Providers available to this process: the active one, or nothing.
    pub fn available_providers(&self) -> Vec<String> {
        match &self.client {
            ActiveClient::Ready(_) => vec![self.active.clone()],
            ActiveClient::Unconfigured { .. } => vec![],
        }
    }

    fn configuration_failure<T>(&self, reason: &str) -> AiResponse<T> {
        AiResponse::failure(
            AiError::Configuration {
                provider: self.active.clone(),
                reason: reason.to_string(),
            },
            &self.active,
            "",
        )
    }

    pub async fn generate_exercises(
        &self,
        request: &ExerciseRequest,
    ) -> AiResponse<ExerciseResponse> {
        match &self.client {
            ActiveClient::Ready(provider) => provider.generate_exercises(request).await,
            ActiveClient::Unconfigured { reason } => self.configuration_failure(reason),
        }
    }

    pub async fn generate_hint(&self, request: &HintRequest) -> AiResponse<HintResponse> {
        match &self.client {
            ActiveClient::Ready(provider) => provider.generate_hint(request).await,
            ActiveClient::Unconfigured { reason } => self.configuration_failure(reason),
        }
    }

    pub async fn generate_explanation(
        &self,
        request: &ExplanationRequest,
    ) -> AiResponse<ExplanationResponse> {
        match &self.client {
            ActiveClient::Ready(provider) => provider.generate_explanation(request).await,
            ActiveClient::Unconfigured { reason } => self.configuration_failure(reason),
        }
    }

    pub async fn validate_answer(
        &self,
        request: &ValidationRequest,
    ) -> AiResponse<ValidationResponse> {
        match &self.client {
            ActiveClient::Ready(provider) => provider.validate_answer(request).await,
            ActiveClient::Unconfigured { reason } => self.configuration_failure(reason),
        }
    }

    pub async fn generate_report(&self, request: &ReportRequest) -> AiResponse<ReportResponse> {
        match &self.client {
            ActiveClient::Ready(provider) => provider.generate_report(request).await,
            ActiveClient::Unconfigured { reason } => self.configuration_failure(reason),
        }
    }
}
