#![allow(dead_code)]
//! Shared mock collaborators for the integration suites: an in-memory
//! document host, a recording provider, and a recording sidebar surface.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use draftpilot_completion::{
    ChangeListener, CompletionEngine, DocumentHost, EngineConfig, HostError, HostResult,
    InsertStyle, ListenerHandle, LlmConfig, LlmProvider, ProviderFactory, SuggestionSurface,
};
use draftpilot_providers::ProviderError;

/// In-memory document host. Reads serve the stored fields; writes are
/// recorded so tests can assert on them.
pub struct MockHost {
    pub paragraph: Mutex<String>,
    pub body: Mutex<String>,
    pub before: Mutex<Vec<String>>,
    pub after: Mutex<Vec<String>>,
    pub caret: Mutex<Option<usize>>,
    pub selection: Mutex<String>,
    /// Content currently sitting after the cursor (the provisional range)
    pub after_cursor: Mutex<String>,

    pub paragraph_reads: AtomicUsize,
    pub body_reads: AtomicUsize,
    pub inserted_at_end: Mutex<Vec<String>>,
    pub inserted_after_cursor: Mutex<Vec<String>>,
    pub finalized: AtomicUsize,
    pub deleted_after_cursor: AtomicUsize,
    pub deleted_selections: AtomicUsize,

    /// When set, every read round-trip fails
    pub fail_reads: AtomicBool,

    listeners: Mutex<Vec<(ListenerHandle, ChangeListener)>>,
    next_listener: AtomicU64,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            paragraph: Mutex::new(String::new()),
            body: Mutex::new(String::new()),
            before: Mutex::new(Vec::new()),
            after: Mutex::new(Vec::new()),
            caret: Mutex::new(None),
            selection: Mutex::new(String::new()),
            after_cursor: Mutex::new(String::new()),
            paragraph_reads: AtomicUsize::new(0),
            body_reads: AtomicUsize::new(0),
            inserted_at_end: Mutex::new(Vec::new()),
            inserted_after_cursor: Mutex::new(Vec::new()),
            finalized: AtomicUsize::new(0),
            deleted_after_cursor: AtomicUsize::new(0),
            deleted_selections: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        })
    }

    pub fn set_paragraph(&self, text: &str) {
        *self.paragraph.lock() = text.to_string();
    }

    pub fn set_body(&self, text: &str) {
        *self.body.lock() = text.to_string();
    }

    pub fn set_selection(&self, text: &str) {
        *self.selection.lock() = text.to_string();
    }

    pub fn set_after_cursor(&self, text: &str) {
        *self.after_cursor.lock() = text.to_string();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver a document-change notification to every registered listener.
    pub async fn fire_change(&self) {
        let listeners: Vec<ChangeListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener().await;
        }
    }

    fn check_reads(&self) -> HostResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(HostError::Interaction("document read failed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentHost for MockHost {
    async fn paragraph_text(&self) -> HostResult<String> {
        self.check_reads()?;
        self.paragraph_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.paragraph.lock().clone())
    }

    async fn body_text(&self) -> HostResult<String> {
        self.check_reads()?;
        self.body_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.lock().clone())
    }

    async fn paragraphs_before(&self, count: usize) -> HostResult<Vec<String>> {
        self.check_reads()?;
        let before = self.before.lock();
        let start = before.len().saturating_sub(count);
        Ok(before[start..].to_vec())
    }

    async fn paragraphs_after(&self, count: usize) -> HostResult<Vec<String>> {
        self.check_reads()?;
        let after = self.after.lock();
        Ok(after.iter().take(count).cloned().collect())
    }

    async fn caret_offset_in_paragraph(&self) -> HostResult<Option<usize>> {
        self.check_reads()?;
        Ok(*self.caret.lock())
    }

    async fn selection_text(&self) -> HostResult<String> {
        self.check_reads()?;
        Ok(self.selection.lock().clone())
    }

    async fn delete_selection(&self) -> HostResult<()> {
        self.deleted_selections.fetch_add(1, Ordering::SeqCst);
        self.selection.lock().clear();
        Ok(())
    }

    async fn insert_at_selection_end(&self, text: &str) -> HostResult<()> {
        self.inserted_at_end.lock().push(text.to_string());
        Ok(())
    }

    async fn insert_after_cursor(&self, text: &str, _style: InsertStyle) -> HostResult<()> {
        self.inserted_after_cursor.lock().push(text.to_string());
        *self.after_cursor.lock() = text.to_string();
        Ok(())
    }

    async fn read_after_cursor(&self, chars: usize) -> HostResult<String> {
        self.check_reads()?;
        Ok(self.after_cursor.lock().chars().take(chars).collect())
    }

    async fn finalize_after_cursor(&self, _chars: usize) -> HostResult<()> {
        self.finalized.fetch_add(1, Ordering::SeqCst);
        self.after_cursor.lock().clear();
        Ok(())
    }

    async fn delete_after_cursor(&self, _chars: usize) -> HostResult<()> {
        self.deleted_after_cursor.fetch_add(1, Ordering::SeqCst);
        self.after_cursor.lock().clear();
        Ok(())
    }

    async fn add_change_listener(&self, listener: ChangeListener) -> HostResult<ListenerHandle> {
        let handle = ListenerHandle(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners.lock().push((handle, listener));
        Ok(handle)
    }

    async fn remove_change_listener(&self, handle: ListenerHandle) -> HostResult<()> {
        self.listeners.lock().retain(|(h, _)| *h != handle);
        Ok(())
    }
}

/// Recording provider with a configurable reply and an optional gate that
/// holds the call open until the test releases it.
pub struct MockProvider {
    pub calls: Mutex<Vec<String>>,
    pub reply: Mutex<Result<Option<String>, ProviderError>>,
    pub gate: Mutex<Option<Arc<tokio::sync::Semaphore>>>,
}

impl MockProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(Ok(Some(text.to_string()))),
            gate: Mutex::new(None),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(Ok(None)),
            gate: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(Err(ProviderError::NetworkError("unreachable".to_string()))),
            gate: Mutex::new(None),
        })
    }

    /// Install a gate; `complete` blocks until the test adds a permit.
    pub fn gated(&self) -> Arc<tokio::sync::Semaphore> {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, context: &str) -> Result<Option<String>, ProviderError> {
        self.calls.lock().push(context.to_string());
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.reply.lock().clone()
    }
}

/// Factory handing out one shared mock provider, or a configuration error.
pub struct MockFactory {
    pub provider: Arc<MockProvider>,
    pub fail_with: Mutex<Option<String>>,
}

impl MockFactory {
    pub fn new(provider: Arc<MockProvider>) -> Arc<Self> {
        Arc::new(Self {
            provider,
            fail_with: Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            provider: MockProvider::empty(),
            fail_with: Mutex::new(Some(message.to_string())),
        })
    }
}

impl ProviderFactory for MockFactory {
    fn build(&self, _config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(ProviderError::ConfigError(message));
        }
        Ok(Arc::clone(&self.provider) as Arc<dyn LlmProvider>)
    }
}

/// Recording sidebar surface
pub struct MockSurface {
    pub created_hidden: AtomicUsize,
    pub shown: Mutex<Vec<String>>,
    pub hidden: AtomicUsize,
    pub removed: AtomicUsize,
    pub fail_show: AtomicBool,
}

impl MockSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            created_hidden: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
            hidden: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
            fail_show: AtomicBool::new(false),
        })
    }
}

impl SuggestionSurface for MockSurface {
    fn create_hidden(&self) {
        self.created_hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn show(&self, text: &str) -> Result<(), HostError> {
        if self.fail_show.load(Ordering::SeqCst) {
            return Err(HostError::Interaction("panel unavailable".to_string()));
        }
        self.shown.lock().push(text.to_string());
        Ok(())
    }

    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn remove(&self) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }
}

/// A configuration whose provider sub-config passes validation.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        debounce_ms: 0,
        provider: LlmConfig {
            endpoint: Some("http://localhost:11434/v1/chat/completions".to_string()),
            model: Some("test-model".to_string()),
            ..LlmConfig::default()
        },
        ..EngineConfig::default()
    }
}

/// Engine wired to fresh mocks.
pub fn build_engine(
    config: EngineConfig,
    provider: Arc<MockProvider>,
) -> (Arc<CompletionEngine>, Arc<MockHost>, Arc<MockSurface>) {
    let host = MockHost::new();
    let surface = MockSurface::new();
    let engine = CompletionEngine::new(
        config,
        Arc::clone(&host) as Arc<dyn DocumentHost>,
        Arc::clone(&surface) as Arc<dyn SuggestionSurface>,
        MockFactory::new(provider) as Arc<dyn ProviderFactory>,
    );
    (engine, host, surface)
}
