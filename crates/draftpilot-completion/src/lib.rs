/// DraftPilot Completion Core
///
/// The auto-complete orchestration core for a word-processor add-in: it
/// decides *when* to request a text continuation, *what* document context to
/// send, and manages the lifecycle of the single pending suggestion.
///
/// # Architecture
///
/// One completion cycle flows one direction:
///
/// 1. **Change signal**: the host document notifies the engine of an edit
/// 2. **Trigger policy**: the engine coalesces rapid edits through a
///    single-slot trigger timer and a debounce gate
/// 3. **Context extraction**: the extractor turns document state into a
///    bounded string (paragraph, document, custom window, or smart outline)
/// 4. **Provider call**: the abstract completion capability returns a
///    candidate, or nothing
/// 5. **Suggestion lifecycle**: the store displays the candidate and governs
///    accept (tab gesture) / discard transitions
///
/// # Collaborators
///
/// The core consumes two capabilities and exposes one small API:
///
/// - [`DocumentHost`]: read selection/paragraph/body text, insert and delete
///   ranges, change notifications — one batched round-trip per call
/// - `LlmProvider` (from `draftpilot-providers`): `complete(context)`,
///   bound from configuration through a [`ProviderFactory`] so tests can
///   substitute mocks
/// - [`CompletionEngine`]: `initialize` / `trigger_completion` /
///   `apply_suggestion` / `update_config` / `dispose`
///
/// # Concurrency model
///
/// Single-logical-thread cooperative scheduling on tokio. The processing
/// flag serializes cycles (a second trigger mid-cycle is dropped, not
/// queued); both timers are single-slot, last-write-wins. Host round-trips
/// and the provider call are the only suspension points.
///
/// # Error policy
///
/// Only configuration errors cross the core boundary. Host failures degrade
/// to empty context / suggestion-not-shown / apply-abandoned; provider
/// failures surface as "no suggestion". Everything absorbed is logged via
/// `tracing`.
///
/// # Example
///
/// ```ignore
/// use draftpilot_completion::{CompletionEngine, EngineConfig};
/// use draftpilot_providers::HttpProviderFactory;
/// use std::sync::Arc;
///
/// let engine = CompletionEngine::new(
///     EngineConfig::default(),
///     host,            // Arc<dyn DocumentHost> from the add-in shell
///     surface,         // Arc<dyn SuggestionSurface> from the task pane
///     Arc::new(HttpProviderFactory::new()),
/// );
/// engine.initialize().await;
/// engine.trigger_completion().await?;
/// ```
pub mod config;
pub mod context;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod host;
pub mod suggestion;

// Re-export public types and traits
pub use config::{
    ContextRange, DisplayMode, EngineConfig, EngineConfigUpdate, TriggerMode,
    DEFAULT_CUSTOM_PARAGRAPHS, DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_CONTEXT_LENGTH,
    DEFAULT_TRIGGER_DELAY_MS, MAX_CUSTOM_PARAGRAPHS, MIN_CUSTOM_PARAGRAPHS,
};
pub use context::{
    truncate_around, truncate_tail, ContextCache, ContextExtractor, HeuristicClassifier,
    ParagraphClassifier, DEFAULT_CACHE_TTL,
};
pub use debounce::{DebouncedCompletion, SingleSlotScheduler};
pub use engine::{CompletionEngine, EngineState};
pub use error::{CompletionError, HostError, HostResult};
pub use host::{ChangeListener, DocumentHost, InsertStyle, ListenerHandle};
pub use suggestion::{PendingSuggestion, SuggestionStore, SuggestionSurface};

// Re-export the provider capability the engine is configured with
pub use draftpilot_providers::{LlmConfig, LlmConfigUpdate, LlmProvider, ProviderFactory};
