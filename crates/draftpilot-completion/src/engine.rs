/// Completion engine: the auto-complete orchestrator
///
/// Listens for document-change signals, runs the trigger/debounce policy,
/// extracts context, calls the completion provider, and forwards non-empty
/// results to the suggestion store. Owns the single source of truth for
/// "is a completion in flight".
///
/// The engine is `Arc`-shared: the hosting shell holds the instance and
/// passes clones to whatever dispatches keyboard commands — there is no
/// ambient global. Change notifications reach it through a listener
/// registered in [`CompletionEngine::initialize`].
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, warn};

use draftpilot_providers::ProviderFactory;

use crate::config::{DisplayMode, EngineConfig, EngineConfigUpdate, TriggerMode};
use crate::context::ContextExtractor;
use crate::debounce::{DebouncedCompletion, SingleSlotScheduler};
use crate::error::CompletionError;
use crate::host::{ChangeListener, DocumentHost, ListenerHandle};
use crate::suggestion::{SuggestionStore, SuggestionSurface};

/// Observable engine state, derived from the processing flag and the
/// trigger timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    /// A trigger is scheduled and waiting out the trigger delay
    AwaitingTrigger,
    /// A completion cycle is in flight
    Processing,
}

/// Collaborators rebuilt from configuration on every `update_config`.
/// A cycle captures them at its start and keeps using them even if the
/// configuration changes mid-flight.
struct Bindings {
    extractor: Arc<ContextExtractor>,
    completion: Result<Arc<DebouncedCompletion>, CompletionError>,
}

/// The auto-complete orchestration core
pub struct CompletionEngine {
    /// Handed to timers and listeners so they never keep a disposed engine
    /// alive.
    weak_self: Weak<CompletionEngine>,
    host: Arc<dyn DocumentHost>,
    factory: Arc<dyn ProviderFactory>,
    store: SuggestionStore,
    config: RwLock<EngineConfig>,
    bindings: RwLock<Bindings>,
    processing: AtomicBool,
    /// Bumped by `update_config`; cycles discard their result when it moved.
    generation: AtomicU64,
    disposed: AtomicBool,
    trigger_timer: Mutex<SingleSlotScheduler>,
    last_paragraph: Mutex<Option<String>>,
    listener: Mutex<Option<ListenerHandle>>,
}

impl CompletionEngine {
    pub fn new(
        config: EngineConfig,
        host: Arc<dyn DocumentHost>,
        surface: Arc<dyn SuggestionSurface>,
        factory: Arc<dyn ProviderFactory>,
    ) -> Arc<Self> {
        let config = config.normalized();
        let store = SuggestionStore::new(Arc::clone(&host), surface, config.display_mode);
        let bindings = Self::build_bindings(&config, factory.as_ref());

        Arc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            host,
            factory,
            store,
            config: RwLock::new(config),
            bindings: RwLock::new(bindings),
            processing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
            trigger_timer: Mutex::new(SingleSlotScheduler::new()),
            last_paragraph: Mutex::new(None),
            listener: Mutex::new(None),
        })
    }

    fn build_bindings(config: &EngineConfig, factory: &dyn ProviderFactory) -> Bindings {
        let completion = factory
            .build(&config.provider)
            .map(|provider| {
                Arc::new(DebouncedCompletion::new(
                    provider,
                    Duration::from_millis(config.debounce_ms),
                ))
            })
            .map_err(|err| CompletionError::Config(err.to_string()));

        Bindings {
            extractor: Arc::new(ContextExtractor::new(config)),
            completion,
        }
    }

    /// Register for document-change notifications. Failure is logged, not
    /// fatal: the engine still works in manual mode.
    pub async fn initialize(&self) {
        let weak = self.weak_self.clone();
        let listener: ChangeListener = Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(engine) = weak.upgrade() {
                    engine.handle_document_change().await;
                }
            }
            .boxed()
        });

        match self.host.add_change_listener(listener).await {
            Ok(handle) => {
                *self.listener.lock() = Some(handle);
            }
            Err(err) => {
                error!("failed to register document-change listener: {err}");
            }
        }
    }

    /// Current configuration (a cycle in flight may still be using the
    /// configuration captured at its start).
    pub fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }

    /// The presentation mode the store is currently using.
    pub fn display_mode(&self) -> DisplayMode {
        self.config.read().display_mode
    }

    /// True iff a suggestion is currently pending.
    pub fn has_suggestion(&self) -> bool {
        self.store.has_suggestion()
    }

    /// Derived engine state.
    pub fn state(&self) -> EngineState {
        if self.processing.load(Ordering::SeqCst) {
            EngineState::Processing
        } else if self.trigger_timer.lock().is_armed() {
            EngineState::AwaitingTrigger
        } else {
            EngineState::Idle
        }
    }

    /// React to one document-change signal.
    ///
    /// An accept gesture (a pending suggestion plus a change that introduced
    /// exactly one tab character) consumes the suggestion and stops. Any
    /// other change, in auto mode and with no cycle in flight, compares the
    /// current paragraph with the last observed one and (re)schedules the
    /// trigger when it differs.
    pub async fn handle_document_change(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        if self.store.has_suggestion() && self.consume_accept_gesture().await {
            return;
        }

        let (auto, delay_ms) = {
            let config = self.config.read();
            (
                config.trigger_mode == TriggerMode::Auto,
                config.trigger_delay_ms,
            )
        };
        if !auto || self.processing.load(Ordering::SeqCst) {
            return;
        }

        let paragraph = match self.host.paragraph_text().await {
            Ok(text) => text,
            Err(err) => {
                warn!("failed to read paragraph for trigger check: {err}");
                return;
            }
        };

        {
            let mut last = self.last_paragraph.lock();
            if last.as_deref() == Some(paragraph.as_str()) {
                return;
            }
            *last = Some(paragraph);
        }

        let weak = self.weak_self.clone();
        self.trigger_timer
            .lock()
            .schedule(Duration::from_millis(delay_ms), async move {
                if let Some(engine) = weak.upgrade() {
                    if let Err(err) = engine.trigger_completion().await {
                        warn!("scheduled completion failed: {err}");
                    }
                }
            });
    }

    /// Recognize and consume an accept gesture. Returns true when the change
    /// was the gesture and has been handled.
    async fn consume_accept_gesture(&self) -> bool {
        match self.host.selection_text().await {
            Ok(selection) if selection == "\t" => {
                debug!("tab accept gesture recognized");
                if let Err(err) = self.host.delete_selection().await {
                    warn!("failed to remove accept-gesture tab: {err}");
                }
                self.store.apply_suggestion().await;
                true
            }
            Ok(_) => false,
            Err(err) => {
                warn!("failed to inspect change for accept gesture: {err}");
                false
            }
        }
    }

    /// Run one completion cycle.
    ///
    /// Re-entrant calls while a cycle is in flight are dropped silently. The
    /// only error that crosses this boundary is a configuration error; host
    /// and provider failures resolve to "no suggestion" with a log line.
    pub async fn trigger_completion(&self) -> Result<(), CompletionError> {
        if self.processing.swap(true, Ordering::SeqCst) {
            debug!("completion already in flight; trigger dropped");
            return Ok(());
        }
        let _processing = ProcessingGuard {
            flag: &self.processing,
        };

        let generation = self.generation.load(Ordering::SeqCst);
        let (extractor, completion) = {
            let bindings = self.bindings.read();
            (
                Arc::clone(&bindings.extractor),
                bindings.completion.clone(),
            )
        };
        let completion = completion?;

        let context = extractor.get_context(self.host.as_ref()).await;
        let Some(text) = completion.complete(context).await else {
            return Ok(());
        };
        if text.is_empty() {
            return Ok(());
        }

        if self.generation.load(Ordering::SeqCst) != generation
            || self.disposed.load(Ordering::SeqCst)
        {
            debug!("engine reconfigured mid-cycle; completion discarded");
            return Ok(());
        }

        self.store.show_suggestion(&text).await;
        Ok(())
    }

    /// Commit the pending suggestion, if any.
    pub async fn apply_suggestion(&self) {
        self.store.apply_suggestion().await;
    }

    /// Merge a partial configuration update and rebuild the collaborators.
    ///
    /// Takes effect for subsequent cycles only; a cycle in flight keeps the
    /// bindings it captured and its result is discarded on completion.
    pub async fn update_config(&self, update: EngineConfigUpdate) {
        let new_config = {
            let mut config = self.config.write();
            let merged = config.merged(&update);
            *config = merged.clone();
            merged
        };
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.bindings.write() = Self::build_bindings(&new_config, self.factory.as_ref());
        self.store.update_display_mode(new_config.display_mode).await;
    }

    /// Deregister the change listener, cancel any scheduled trigger, and
    /// clear the suggestion store.
    pub async fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.trigger_timer.lock().cancel();

        let handle = self.listener.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = self.host.remove_change_listener(handle).await {
                warn!("failed to deregister document-change listener: {err}");
            }
        }

        self.store.dispose().await;
    }
}

/// Clears the processing flag on every exit path of a cycle.
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
