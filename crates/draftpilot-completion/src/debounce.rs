/// Deferred-invocation primitives
///
/// Two timers drive the engine: the auto-trigger delay and the provider-call
/// debounce window. Both are built on [`SingleSlotScheduler`], which makes
/// the coalescing contract explicit: scheduling cancels and replaces any
/// armed slot (last write wins, nothing is queued).
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

use draftpilot_providers::LlmProvider;

/// A single deferred invocation slot.
///
/// `schedule` aborts any previously armed slot before arming the new one;
/// `cancel` clears it. Cancellation is cooperative: an invocation that has
/// already started is not interrupted.
#[derive(Default)]
pub struct SingleSlotScheduler {
    slot: Option<JoinHandle<()>>,
}

impl SingleSlotScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot: run `task` after `delay`, replacing any pending slot.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Disarm the slot, if armed.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.slot.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled invocation is still waiting to run.
    pub fn is_armed(&self) -> bool {
        self.slot
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SingleSlotScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Debounce gate in front of the completion provider.
///
/// Calls arriving within the window coalesce into the trailing call only:
/// each call re-arms the slot with its own context, and a superseded caller
/// resolves to `None` — the same path as "no suggestion available". Provider
/// errors are absorbed here and likewise resolve to `None`.
pub struct DebouncedCompletion {
    provider: Arc<dyn LlmProvider>,
    window: Duration,
    scheduler: Mutex<SingleSlotScheduler>,
}

impl DebouncedCompletion {
    pub fn new(provider: Arc<dyn LlmProvider>, window: Duration) -> Self {
        Self {
            provider,
            window,
            scheduler: Mutex::new(SingleSlotScheduler::new()),
        }
    }

    /// Request a completion through the debounce gate.
    pub async fn complete(&self, context: String) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        let provider = Arc::clone(&self.provider);
        self.scheduler.lock().schedule(self.window, async move {
            let result = match provider.complete(&context).await {
                Ok(text) => text,
                Err(err) => {
                    warn!("completion provider failed: {err}");
                    None
                }
            };
            let _ = tx.send(result);
        });
        // A replaced slot drops its sender; the superseded caller gets None.
        rx.await.unwrap_or(None)
    }
}
