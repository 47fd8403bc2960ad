//! DraftPilot provider layer
//!
//! The completion core consumes the LLM as one abstract capability:
//! `complete(context) -> Option<String>`. This crate supplies that capability:
//!
//! - [`LlmProvider`]: the async capability trait
//! - [`LlmConfig`] / [`LlmConfigUpdate`]: provider configuration with
//!   validation (endpoint and model are required) and nested partial updates
//! - [`ProviderFactory`] / [`HttpProviderFactory`]: binding construction, so
//!   the engine resolves configuration into a provider per cycle and tests
//!   substitute mocks
//! - [`ChatCompletionProvider`]: the one concrete transport, speaking the
//!   common chat-completion shape against a user-supplied endpoint
//!
//! Per-vendor adapters (wire schemas, model listing, credential storage) are
//! deliberately absent; they belong to the hosting application.

pub mod config;
pub mod error;
pub mod http;
pub mod provider;

pub use config::{LlmConfig, LlmConfigUpdate, DEFAULT_SYSTEM_PROMPT};
pub use error::ProviderError;
pub use http::{ChatCompletionProvider, HttpProviderFactory};
pub use provider::{LlmProvider, ProviderFactory};
