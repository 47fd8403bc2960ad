/// Suggestion lifecycle management
///
/// Holds at most one pending suggestion and governs its accept/clear
/// transitions. Sidebar suggestions render in a persistent panel behind the
/// [`SuggestionSurface`] trait; inline suggestions are written into the
/// document as provisional styled text through the host capability. A
/// suggestion is consumed (applied) or discarded, never both, and a new one
/// implicitly discards its predecessor.
///
/// Every host or surface failure here is caught, logged, and collapsed to
/// "suggestion not active"; nothing propagates to the caller.
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::DisplayMode;
use crate::error::HostError;
use crate::host::{DocumentHost, InsertStyle};

/// The single in-memory candidate completion awaiting acceptance or discard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSuggestion {
    pub text: String,
    pub mode: DisplayMode,
}

/// Presentation surface for sidebar suggestions.
///
/// The hosting UI supplies the panel; the store only drives visibility. The
/// panel is created hidden and shown per suggestion.
pub trait SuggestionSurface: Send + Sync {
    /// Create the panel, hidden.
    fn create_hidden(&self);

    /// Render the suggestion text and reveal the panel.
    fn show(&self, text: &str) -> Result<(), HostError>;

    /// Hide the panel, keeping it around for the next suggestion.
    fn hide(&self);

    /// Tear the panel down entirely.
    fn remove(&self);
}

struct StoreState {
    pending: Option<PendingSuggestion>,
    mode: DisplayMode,
    disposed: bool,
}

/// Owner of the single pending-suggestion slot
pub struct SuggestionStore {
    host: Arc<dyn DocumentHost>,
    surface: Arc<dyn SuggestionSurface>,
    state: Mutex<StoreState>,
}

impl SuggestionStore {
    pub fn new(
        host: Arc<dyn DocumentHost>,
        surface: Arc<dyn SuggestionSurface>,
        mode: DisplayMode,
    ) -> Self {
        if mode == DisplayMode::Sidebar {
            surface.create_hidden();
        }
        Self {
            host,
            surface,
            state: Mutex::new(StoreState {
                pending: None,
                mode,
                disposed: false,
            }),
        }
    }

    /// True iff a suggestion is currently pending.
    pub fn has_suggestion(&self) -> bool {
        let state = self.state.lock();
        !state.disposed && state.pending.is_some()
    }

    /// Discard any pending suggestion, then record and render the new one.
    ///
    /// Safe to call after `dispose`; it becomes a no-op.
    pub async fn show_suggestion(&self, text: &str) {
        let (mode, prior) = {
            let mut state = self.state.lock();
            if state.disposed {
                debug!("suggestion store disposed; display request ignored");
                return;
            }
            (state.mode, state.pending.take())
        };
        if let Some(prior) = prior {
            self.remove_rendering(&prior).await;
        }

        let rendered = match mode {
            DisplayMode::Sidebar => match self.surface.show(text) {
                Ok(()) => true,
                Err(err) => {
                    warn!("failed to render sidebar suggestion: {err}");
                    false
                }
            },
            DisplayMode::Inline => {
                match self
                    .host
                    .insert_after_cursor(text, InsertStyle::Provisional)
                    .await
                {
                    Ok(()) => true,
                    Err(err) => {
                        warn!("failed to insert inline suggestion: {err}");
                        false
                    }
                }
            }
        };

        if rendered {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.pending = Some(PendingSuggestion {
                text: text.to_string(),
                mode,
            });
        }
    }

    /// Commit the pending suggestion into the document, if any.
    ///
    /// Sidebar mode inserts the text at the current insertion point. Inline
    /// mode first verifies the provisional range still matches the pending
    /// text (the user may have typed over it) and abandons the apply silently
    /// on mismatch. The pending slot is cleared in every outcome.
    pub async fn apply_suggestion(&self) {
        let pending = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.pending.take()
        };
        let Some(pending) = pending else {
            return;
        };

        match pending.mode {
            DisplayMode::Sidebar => {
                if let Err(err) = self.host.insert_at_selection_end(&pending.text).await {
                    warn!("failed to apply suggestion: {err}");
                }
                self.surface.hide();
            }
            DisplayMode::Inline => {
                let len = pending.text.chars().count();
                match self.host.read_after_cursor(len).await {
                    Ok(current) if current == pending.text => {
                        if let Err(err) = self.host.finalize_after_cursor(len).await {
                            warn!("failed to finalize inline suggestion: {err}");
                        }
                    }
                    Ok(_) => {
                        debug!("inline suggestion no longer intact; apply abandoned");
                    }
                    Err(err) => {
                        warn!("failed to verify inline suggestion: {err}");
                    }
                }
            }
        }
    }

    /// Discard the pending suggestion without applying it.
    pub async fn clear_suggestion(&self) {
        let pending = {
            let mut state = self.state.lock();
            state.pending.take()
        };
        if let Some(pending) = pending {
            self.remove_rendering(&pending).await;
        }
    }

    /// Switch presentation mode. A no-op when unchanged; otherwise the
    /// pending suggestion is discarded, the old surface torn down, and the
    /// sidebar panel re-created hidden when switching to sidebar mode.
    pub async fn update_display_mode(&self, mode: DisplayMode) {
        {
            let state = self.state.lock();
            if state.disposed || state.mode == mode {
                return;
            }
        }
        self.clear_suggestion().await;

        self.surface.remove();
        if mode == DisplayMode::Sidebar {
            self.surface.create_hidden();
        }
        self.state.lock().mode = mode;
    }

    /// Clear the pending suggestion and remove the presentation surface.
    pub async fn dispose(&self) {
        self.clear_suggestion().await;
        self.state.lock().disposed = true;
        self.surface.remove();
    }

    /// Take down whatever a previously rendered suggestion put on screen.
    async fn remove_rendering(&self, suggestion: &PendingSuggestion) {
        match suggestion.mode {
            DisplayMode::Sidebar => self.surface.hide(),
            DisplayMode::Inline => {
                let len = suggestion.text.chars().count();
                match self.host.read_after_cursor(len).await {
                    Ok(current) if current == suggestion.text => {
                        if let Err(err) = self.host.delete_after_cursor(len).await {
                            warn!("failed to remove inline suggestion: {err}");
                        }
                    }
                    Ok(_) => {
                        // The user typed over it; the document owns that text now.
                        debug!("inline suggestion diverged; leaving document as-is");
                    }
                    Err(err) => {
                        warn!("failed to inspect inline suggestion: {err}");
                    }
                }
            }
        }
    }
}
