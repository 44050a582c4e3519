//! TOML configuration for the inboxpilot binary.

use proto::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model id used for both triage and the response agent.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Optional OpenAI-compatible base URL override.
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
        }
    }
}

/// Response agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model-call budget per run.
    pub max_model_calls: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_model_calls: 10 }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub agent: AgentConfig,
}

impl Config {
    /// Loads configuration from `path`, or defaults when no path is given
    /// and `inboxpilot.toml` does not exist in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Path::new("inboxpilot.toml");
                if !default.exists() {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                default.to_path_buf()
            }
        };

        let raw = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        if self.agent.max_model_calls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_model_calls".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Resolves the API key from the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.llm.api_key_env)
            .map_err(|_| ConfigError::MissingField(self.llm.api_key_env.clone()))
    }
}
