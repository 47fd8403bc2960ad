//! Provider configuration and partial updates
//!
//! The completion core treats the LLM as a single abstract capability, so the
//! configuration here is provider-shape agnostic: an endpoint, a model name,
//! an optional key, and sampling knobs. Endpoint and model are required for a
//! completion attempt; everything else has a sensible default.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Continuation prompt used when the user has not supplied one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional document assistant. \
Please continue the text based on the context, maintaining consistency in style and logic. \
Provide only the continuation without explanations.";

fn default_max_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.7
}

/// Configuration for the completion provider binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completion endpoint URL. Required for a completion attempt.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model identifier sent with each request. Required for a completion attempt.
    #[serde(default)]
    pub model: Option<String>,
    /// Bearer token for the endpoint. Optional: local endpoints need none.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum tokens to request per continuation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Override for the built-in continuation prompt
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: None,
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: None,
        }
    }
}

impl LlmConfig {
    /// Check that the configuration is complete enough to attempt a completion.
    ///
    /// A missing endpoint or model is a setup problem, not a transient
    /// condition, and is reported to the caller as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self
            .endpoint
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
        {
            return Err(ProviderError::ConfigError(
                "completion endpoint is required".to_string(),
            ));
        }
        if self.model.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(ProviderError::ConfigError(
                "model selection is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The system prompt to send, falling back to the built-in default.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// Apply a partial update, field by field. Unset fields keep their value.
    pub fn merged(&self, update: &LlmConfigUpdate) -> LlmConfig {
        let mut merged = self.clone();
        if let Some(endpoint) = &update.endpoint {
            merged.endpoint = Some(endpoint.clone());
        }
        if let Some(model) = &update.model {
            merged.model = Some(model.clone());
        }
        if let Some(api_key) = &update.api_key {
            merged.api_key = Some(api_key.clone());
        }
        if let Some(max_tokens) = update.max_tokens {
            merged.max_tokens = max_tokens;
        }
        if let Some(temperature) = update.temperature {
            merged.temperature = temperature;
        }
        if let Some(system_prompt) = &update.system_prompt {
            merged.system_prompt = Some(system_prompt.clone());
        }
        merged
    }
}

/// Partial update for [`LlmConfig`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmConfigUpdate {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}
