//! Provider capability trait and factory

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::error::ProviderError;

/// The completion capability consumed by the engine.
///
/// `complete` never panics. `Ok(None)` means the provider had nothing to
/// offer; `Err` is a transient provider failure. The engine treats both as
/// "no suggestion available" — only configuration problems (caught before a
/// provider is ever built, see [`LlmConfig::validate`]) are surfaced to the
/// caller.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request a continuation for the given document context.
    async fn complete(&self, context: &str) -> Result<Option<String>, ProviderError>;
}

/// Builds an [`LlmProvider`] binding from configuration.
///
/// The engine resolves the binding once per cycle through this trait so tests
/// can substitute recording or failing providers without touching the engine.
pub trait ProviderFactory: Send + Sync {
    /// Validate the configuration and build a provider bound to it.
    fn build(&self, config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, ProviderError>;
}
