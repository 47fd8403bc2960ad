/// Host document capability
///
/// The engine never talks to a word processor directly; it consumes this
/// trait. Each method is one batched read/write round-trip against the host
/// document (the adapter owns batch-and-flush semantics), and each is a
/// suspension point for the cooperative scheduler.
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::HostResult;

/// Callback invoked on every document-change notification
pub type ChangeListener = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Opaque handle identifying a registered change listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// How inserted text is styled in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStyle {
    /// Ordinary committed text
    Plain,
    /// Visually distinguished, non-final text (inline ghost suggestion)
    Provisional,
}

/// Read and write access to the document hosting the add-in
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Text of the paragraph containing the current selection
    async fn paragraph_text(&self) -> HostResult<String>;

    /// Full document body text
    async fn body_text(&self) -> HostResult<String>;

    /// Up to `count` paragraphs immediately before the current one, in
    /// document order (earliest first)
    async fn paragraphs_before(&self, count: usize) -> HostResult<Vec<String>>;

    /// Up to `count` paragraphs immediately after the current one, in
    /// document order
    async fn paragraphs_after(&self, count: usize) -> HostResult<Vec<String>>;

    /// Caret position as a char offset within the current paragraph, when the
    /// host can report one
    async fn caret_offset_in_paragraph(&self) -> HostResult<Option<usize>>;

    /// Text of the current selection (the content a change event introduced)
    async fn selection_text(&self) -> HostResult<String>;

    /// Delete the current selection
    async fn delete_selection(&self) -> HostResult<()>;

    /// Insert committed text at the end of the current selection
    async fn insert_at_selection_end(&self, text: &str) -> HostResult<()>;

    /// Insert text immediately after the cursor with the given styling,
    /// without moving the insertion point for ordinary typing
    async fn insert_after_cursor(&self, text: &str, style: InsertStyle) -> HostResult<()>;

    /// Read up to `chars` characters immediately following the cursor
    async fn read_after_cursor(&self, chars: usize) -> HostResult<String>;

    /// Convert the `chars` characters after the cursor from provisional to
    /// committed styling and move the cursor past them
    async fn finalize_after_cursor(&self, chars: usize) -> HostResult<()>;

    /// Delete the `chars` characters immediately following the cursor
    async fn delete_after_cursor(&self, chars: usize) -> HostResult<()>;

    /// Register for document-change notifications
    async fn add_change_listener(&self, listener: ChangeListener) -> HostResult<ListenerHandle>;

    /// Deregister a previously registered listener
    async fn remove_change_listener(&self, handle: ListenerHandle) -> HostResult<()>;
}
