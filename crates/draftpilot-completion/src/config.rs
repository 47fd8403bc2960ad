/// Engine configuration and partial updates
///
/// Configuration is immutable per cycle: `update_config` swaps in a merged
/// copy that takes effect on the next cycle, never the one in flight. Merging
/// is shallow at the top level and nested for the provider sub-config, and
/// every merge re-normalizes: the custom-paragraph count is clamped to
/// [1, 10] and zero-valued lengths/delays fall back to their defaults.
use draftpilot_providers::{LlmConfig, LlmConfigUpdate};
use serde::{Deserialize, Serialize};

/// Lower bound for the custom-paragraph count
pub const MIN_CUSTOM_PARAGRAPHS: usize = 1;
/// Upper bound for the custom-paragraph count
pub const MAX_CUSTOM_PARAGRAPHS: usize = 10;

/// Default maximum context length, in characters
pub const DEFAULT_MAX_CONTEXT_LENGTH: usize = 2000;
/// Default custom-paragraph count
pub const DEFAULT_CUSTOM_PARAGRAPHS: usize = 3;
/// Default debounce window for provider requests, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Default delay between a content change and the scheduled trigger
pub const DEFAULT_TRIGGER_DELAY_MS: u64 = 2000;

/// When completion cycles are started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Schedule a cycle after every content change
    #[default]
    Auto,
    /// Only run cycles requested through `trigger_completion`
    Manual,
}

/// Which surrounding document text is sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextRange {
    /// The paragraph containing the selection
    #[default]
    Paragraph,
    /// The whole document body
    Document,
    /// The current paragraph plus surrounding paragraphs
    Custom,
    /// The custom window prefixed with a synthesized document outline
    Smart,
}

/// Where a pending suggestion is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Persistent side panel
    #[default]
    Sidebar,
    /// Provisional ghost text after the cursor
    Inline,
}

fn default_max_context_length() -> usize {
    DEFAULT_MAX_CONTEXT_LENGTH
}

fn default_custom_paragraphs() -> usize {
    DEFAULT_CUSTOM_PARAGRAPHS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_trigger_delay_ms() -> u64 {
    DEFAULT_TRIGGER_DELAY_MS
}

/// Engine configuration, one instance per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub trigger_mode: TriggerMode,
    #[serde(default)]
    pub context_range: ContextRange,
    /// Maximum context length in characters; 0 falls back to the default
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,
    /// Paragraph count for the custom strategy, clamped to [1, 10]
    #[serde(default = "default_custom_paragraphs")]
    pub custom_paragraphs: usize,
    /// Debounce window for provider requests, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Delay between a content change and the scheduled trigger; 0 falls back
    /// to the default
    #[serde(default = "default_trigger_delay_ms")]
    pub trigger_delay_ms: u64,
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Provider sub-configuration (merged nested, not replaced)
    #[serde(default)]
    pub provider: LlmConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::default(),
            context_range: ContextRange::default(),
            max_context_length: DEFAULT_MAX_CONTEXT_LENGTH,
            custom_paragraphs: DEFAULT_CUSTOM_PARAGRAPHS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            trigger_delay_ms: DEFAULT_TRIGGER_DELAY_MS,
            display_mode: DisplayMode::default(),
            provider: LlmConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Clamp and default fields so the configuration is always usable.
    pub fn normalized(mut self) -> Self {
        self.custom_paragraphs = self
            .custom_paragraphs
            .clamp(MIN_CUSTOM_PARAGRAPHS, MAX_CUSTOM_PARAGRAPHS);
        if self.max_context_length == 0 {
            self.max_context_length = DEFAULT_MAX_CONTEXT_LENGTH;
        }
        if self.trigger_delay_ms == 0 {
            self.trigger_delay_ms = DEFAULT_TRIGGER_DELAY_MS;
        }
        self
    }

    /// Merge a partial update: shallow at the top level, nested for the
    /// provider sub-config, then re-normalize.
    pub fn merged(&self, update: &EngineConfigUpdate) -> EngineConfig {
        let mut merged = self.clone();
        if let Some(trigger_mode) = update.trigger_mode {
            merged.trigger_mode = trigger_mode;
        }
        if let Some(context_range) = update.context_range {
            merged.context_range = context_range;
        }
        if let Some(max_context_length) = update.max_context_length {
            merged.max_context_length = max_context_length;
        }
        if let Some(custom_paragraphs) = update.custom_paragraphs {
            merged.custom_paragraphs = custom_paragraphs;
        }
        if let Some(debounce_ms) = update.debounce_ms {
            merged.debounce_ms = debounce_ms;
        }
        if let Some(trigger_delay_ms) = update.trigger_delay_ms {
            merged.trigger_delay_ms = trigger_delay_ms;
        }
        if let Some(display_mode) = update.display_mode {
            merged.display_mode = display_mode;
        }
        if let Some(provider) = &update.provider {
            merged.provider = merged.provider.merged(provider);
        }
        merged.normalized()
    }
}

/// Partial update for [`EngineConfig`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfigUpdate {
    #[serde(default)]
    pub trigger_mode: Option<TriggerMode>,
    #[serde(default)]
    pub context_range: Option<ContextRange>,
    #[serde(default)]
    pub max_context_length: Option<usize>,
    #[serde(default)]
    pub custom_paragraphs: Option<usize>,
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    #[serde(default)]
    pub trigger_delay_ms: Option<u64>,
    #[serde(default)]
    pub display_mode: Option<DisplayMode>,
    #[serde(default)]
    pub provider: Option<LlmConfigUpdate>,
}
