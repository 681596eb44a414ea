//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tutorgen_core::traits::AiProvider;

use crate::anthropic::AnthropicClient;
use crate::ollama::OllamaClient;
use crate::openai::OpenAiClient;

/// Credential values that mean "not configured".
const PLACEHOLDER_API_KEYS: &[&str] = &[
    "changeme",
    "your-api-key-here",
    "your_api_key_here",
    "sk-xxxx",
    "<api-key>",
];

/// Configuration for a single provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
                model,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .field("model", model)
                .finish(),
            ProviderConfig::Ollama { base_url, model } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Returns the reason this provider cannot be used, if any.
    ///
    /// An unset or placeholder credential means "not configured"; Ollama
    /// needs no credential.
    pub fn credential_error(&self) -> Option<String> {
        let api_key = match self {
            ProviderConfig::Anthropic { api_key, .. } => api_key,
            ProviderConfig::OpenAI { api_key, .. } => api_key,
            ProviderConfig::Ollama { .. } => return None,
        };
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Some("api key is unset".to_string());
        }
        if PLACEHOLDER_API_KEYS.contains(&trimmed.to_lowercase().as_str()) {
            return Some("api key is a placeholder value".to_string());
        }
        None
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level tutorgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorgenConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// The single provider that services all generation calls.
    #[serde(default = "default_provider")]
    pub active_provider: String,
}

fn default_provider() -> String {
    "anthropic".to_string()
}

impl Default for TutorgenConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            active_provider: default_provider(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Anthropic {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            model,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
            model: model.clone(),
        },
        ProviderConfig::Ollama { base_url, model } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
            model: model.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `tutorgen.toml` in the current directory
/// 2. `~/.config/tutorgen/config.toml`
///
/// Environment variable overrides: `TUTORGEN_ANTHROPIC_KEY`,
/// `TUTORGEN_OPENAI_KEY`, `TUTORGEN_PROVIDER`.
pub fn load_config() -> Result<TutorgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TutorgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("tutorgen.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TutorgenConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TutorgenConfig::default(),
    };

    // Apply env var overrides
    if let Ok(provider) = std::env::var("TUTORGEN_PROVIDER") {
        if !provider.trim().is_empty() {
            config.active_provider = provider;
        }
    }

    if let Ok(key) = std::env::var("TUTORGEN_ANTHROPIC_KEY") {
        config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(ProviderConfig::Anthropic { api_key, .. }) =
            config.providers.get_mut("anthropic")
        {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("TUTORGEN_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
                model: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("tutorgen"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn AiProvider>> {
    match config {
        ProviderConfig::Anthropic {
            api_key,
            base_url,
            model,
        } => Ok(Box::new(AnthropicClient::new(
            api_key,
            base_url.clone(),
            model.clone(),
        ))),
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            model,
        } => Ok(Box::new(OpenAiClient::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
            model.clone(),
        ))),
        ProviderConfig::Ollama { base_url, model } => {
            Ok(Box::new(OllamaClient::new(base_url, model.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_TUTORGEN_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_TUTORGEN_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_TUTORGEN_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_TUTORGEN_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = TutorgenConfig::default();
        assert_eq!(config.active_provider, "anthropic");
        assert!(config.providers.is_empty());
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
active_provider = "ollama"

[providers.anthropic]
type = "anthropic"
api_key = "sk-test"
model = "claude-sonnet-4-20250514"

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
model = "llama3.1:8b"
"#;
        let config: TutorgenConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.active_provider, "ollama");
        assert!(matches!(
            config.providers.get("anthropic"),
            Some(ProviderConfig::Anthropic { .. })
        ));
    }

    #[test]
    fn placeholder_credentials_are_detected() {
        let unset = ProviderConfig::Anthropic {
            api_key: "".into(),
            base_url: None,
            model: None,
        };
        assert!(unset.credential_error().unwrap().contains("unset"));

        let placeholder = ProviderConfig::OpenAI {
            api_key: "CHANGEME".into(),
            base_url: None,
            org_id: None,
            model: None,
        };
        assert!(placeholder
            .credential_error()
            .unwrap()
            .contains("placeholder"));

        let real = ProviderConfig::Anthropic {
            api_key: "sk-ant-abc123".into(),
            base_url: None,
            model: None,
        };
        assert!(real.credential_error().is_none());

        let ollama = ProviderConfig::Ollama {
            base_url: default_ollama_url(),
            model: None,
        };
        assert!(ollama.credential_error().is_none());
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::Anthropic {
            api_key: "sk-ant-secret".into(),
            base_url: None,
            model: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tutorgen.toml");
        std::fs::write(
            &path,
            r#"
active_provider = "openai"

[providers.openai]
type = "openai"
api_key = "sk-live"
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.active_provider, "openai");
        assert!(config.providers.contains_key("openai"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = load_config_from(Some(Path::new("/nonexistent/tutorgen.toml")));
        assert!(result.is_err());
    }
}
