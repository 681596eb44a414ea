//! tutorgen-providers — LLM backend integrations.
//!
//! Implements `CompletionBackend` for Anthropic, OpenAI, and Ollama,
//! plus the configuration layer and the single-active-provider
//! `Orchestrator` the platform talks to.

pub mod anthropic;
pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod orchestrator;

pub use config::{create_provider, load_config, ProviderConfig, TutorgenConfig};
pub use orchestrator::Orchestrator;
