//! OpenAI-compatible chat-completion transport
//!
//! One generic HTTP transport stands in for the abstract provider capability:
//! it POSTs `{model, messages, max_tokens, temperature}` to a user-supplied
//! endpoint and reads the first choice's message content. Per-vendor request
//! schemas are out of scope; anything speaking the common chat-completion
//! shape (hosted gateways, local inference servers) works unmodified.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::ProviderError;
use crate::provider::{LlmProvider, ProviderFactory};

/// Chat-completion provider over a user-configured endpoint
pub struct ChatCompletionProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
}

impl ChatCompletionProvider {
    /// Build a provider from a validated configuration.
    pub fn from_config(client: Client, config: &LlmConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            client,
            // validate() guarantees both fields are present and non-blank
            endpoint: config.endpoint.clone().unwrap_or_default(),
            model: config.model.clone().unwrap_or_default(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt().to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionProvider {
    async fn complete(&self, context: &str) -> Result<Option<String>, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: context,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting completion");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "completion endpoint returned an error status");
            return Err(ProviderError::ApiError(format!(
                "completion endpoint returned {}",
                status
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::ParseError(err.to_string()))?;

        Ok(extract_text(parsed))
    }
}

/// Default factory: validates the configuration and binds the HTTP transport.
pub struct HttpProviderFactory {
    client: Client,
}

impl HttpProviderFactory {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn build(&self, config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(ChatCompletionProvider::from_config(
            self.client.clone(),
            config,
        )?))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize, Default)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Map a parsed response to the capability result: first choice content,
/// trimmed; blank or absent content is "no suggestion".
fn extract_text(response: ChatResponse) -> Option<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content)?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
