/// Context extraction for completion requests
///
/// Turns host-document state into a bounded text string by one of four
/// strategies (current paragraph, whole document, N surrounding paragraphs,
/// or a structure-aware blend), with snapshot-keyed caching and
/// sentence-boundary-aware truncation. `get_context` never fails: every host
/// error degrades to an empty string with a log line.
///
/// All lengths and offsets are measured in characters, never bytes, so
/// truncation can never split a UTF-8 code point.
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::{ContextRange, EngineConfig};
use crate::error::HostResult;
use crate::host::DocumentHost;

/// Default lifetime of a cached context
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(5000);

/// How far past the computed cut point to look for a sentence terminator
const SENTENCE_SEARCH_WINDOW: usize = 100;

/// Characters of each paragraph quoted in the "Structure" outline section
const STRUCTURE_SUMMARY_CHARS: usize = 50;

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n' | '。' | '！' | '？')
}

/// First position after a sentence terminator within the search window
/// starting at `cut`, if any.
fn boundary_after(chars: &[char], cut: usize) -> Option<usize> {
    let limit = (cut + SENTENCE_SEARCH_WINDOW).min(chars.len());
    (cut..limit)
        .find(|&i| is_sentence_terminator(chars[i]))
        .map(|i| i + 1)
}

/// First position after the last sentence terminator within the search window
/// ending at `cut`, if any.
fn boundary_before(chars: &[char], cut: usize) -> Option<usize> {
    let lower = cut.saturating_sub(SENTENCE_SEARCH_WINDOW);
    (lower..cut)
        .rev()
        .find(|&i| is_sentence_terminator(chars[i]))
        .map(|i| i + 1)
}

/// Truncate to at most `max_chars` characters, keeping the tail (the text
/// closest to the edit point).
///
/// The cut prefers a sentence boundary: up to 100 characters past the
/// computed cut point are scanned for a terminator, and the text resumes just
/// after it. With no terminator in range, the cut is a hard one.
pub fn truncate_tail(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let cut = chars.len() - max_chars;
    let start = boundary_after(&chars, cut).unwrap_or(cut);
    chars[start..]
        .iter()
        .collect::<String>()
        .trim_start()
        .to_string()
}

/// Truncate to at most `max_chars` characters, keeping a window around
/// `focus` (a char offset into `text`).
///
/// The window is symmetric around the focus and shifts toward the tail when
/// it would run past the end. Both edges prefer sentence boundaries within
/// the search window.
pub fn truncate_around(text: &str, focus: usize, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let focus = focus.min(chars.len());
    let half = max_chars / 2;
    let mut start = focus.saturating_sub(half);
    let mut end = start + max_chars;
    if end > chars.len() {
        end = chars.len();
        start = end - max_chars;
    }

    if start > 0 {
        if let Some(boundary) = boundary_after(&chars, start) {
            start = boundary.min(end);
        }
    }
    if end < chars.len() {
        if let Some(boundary) = boundary_before(&chars, end) {
            end = boundary.max(start);
        }
    }

    chars[start..end]
        .iter()
        .collect::<String>()
        .trim_start()
        .to_string()
}

/// Cached context with explicit validity transitions.
///
/// A cached entry is served only while it is younger than the TTL and the
/// current paragraph text is byte-identical to the snapshot taken at capture
/// time. A snapshot mismatch invalidates regardless of age. The transitions
/// are pure in `now`, so validity is unit-testable without a timer.
#[derive(Debug, Clone, Default)]
pub enum ContextCache {
    #[default]
    Empty,
    Valid {
        content: String,
        snapshot: String,
        expires_at: Instant,
    },
}

impl ContextCache {
    /// The cached content, if still fresh for the given paragraph snapshot.
    pub fn lookup(&self, current_snapshot: &str, now: Instant) -> Option<&str> {
        match self {
            ContextCache::Valid {
                content,
                snapshot,
                expires_at,
            } if now < *expires_at && snapshot == current_snapshot => Some(content),
            _ => None,
        }
    }

    /// Record a fresh extraction, overwriting any previous entry.
    pub fn store(&mut self, content: String, snapshot: String, now: Instant, ttl: Duration) {
        *self = ContextCache::Valid {
            content,
            snapshot,
            expires_at: now + ttl,
        };
    }

    pub fn clear(&mut self) {
        *self = ContextCache::Empty;
    }
}

/// Heuristic paragraph classification for the smart strategy.
///
/// Pluggable so an alternate heuristic, or a real document-outline API, can
/// be substituted without touching the extractor's control flow.
pub trait ParagraphClassifier: Send + Sync {
    /// Best-effort heading detection; there is no ground truth.
    fn is_heading(&self, paragraph: &str) -> bool;
}

/// Default classifier: short colon-terminated, all-caps, or short and
/// period-free paragraphs read as headings.
#[derive(Debug, Default)]
pub struct HeuristicClassifier;

impl ParagraphClassifier for HeuristicClassifier {
    fn is_heading(&self, paragraph: &str) -> bool {
        let text = paragraph.trim();
        if text.is_empty() {
            return false;
        }
        let len = text.chars().count();
        if len <= 40 && (text.ends_with(':') || text.ends_with('：')) {
            return true;
        }
        if len <= 80
            && text.chars().any(|c| c.is_alphabetic())
            && !text.chars().any(|c| c.is_lowercase())
        {
            return true;
        }
        len <= 30 && !text.contains('.') && !text.contains('。')
    }
}

/// Extracts bounded context text from the host document
pub struct ContextExtractor {
    range: ContextRange,
    max_chars: usize,
    custom_paragraphs: usize,
    cache_ttl: Duration,
    classifier: Arc<dyn ParagraphClassifier>,
    cache: Mutex<ContextCache>,
}

impl ContextExtractor {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_classifier(config, Arc::new(HeuristicClassifier))
    }

    pub fn with_classifier(config: &EngineConfig, classifier: Arc<dyn ParagraphClassifier>) -> Self {
        Self {
            range: config.context_range,
            max_chars: config.max_context_length,
            custom_paragraphs: config.custom_paragraphs,
            cache_ttl: DEFAULT_CACHE_TTL,
            classifier,
            cache: Mutex::new(ContextCache::Empty),
        }
    }

    /// Override the cache TTL (tests pin this for determinism).
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Extract context for a completion request. Never fails: host errors
    /// degrade to an empty string.
    pub async fn get_context(&self, host: &dyn DocumentHost) -> String {
        match self.extract(host).await {
            Ok(content) => content,
            Err(err) => {
                warn!("context extraction failed: {err}");
                String::new()
            }
        }
    }

    async fn extract(&self, host: &dyn DocumentHost) -> HostResult<String> {
        let snapshot = host.paragraph_text().await?;

        let cached = self
            .cache
            .lock()
            .lookup(&snapshot, Instant::now())
            .map(str::to_owned);
        if let Some(content) = cached {
            debug!("serving cached context");
            return Ok(content);
        }

        let content = match self.range {
            ContextRange::Paragraph => truncate_tail(&snapshot, self.max_chars),
            ContextRange::Document => truncate_tail(&host.body_text().await?, self.max_chars),
            ContextRange::Custom => {
                let (window, focus) = self.custom_window(host, &snapshot).await?;
                truncate_around(&window, focus, self.max_chars)
            }
            ContextRange::Smart => self.smart_context(host, &snapshot).await?,
        };

        self.cache
            .lock()
            .store(content.clone(), snapshot, Instant::now(), self.cache_ttl);
        Ok(content)
    }

    /// The current paragraph plus ⌊N/2⌋ neighbors on each side, concatenated
    /// in document order, and the caret's char offset within that window.
    ///
    /// The caret offset comes from the host when available; otherwise the
    /// midpoint of the current paragraph stands in for it.
    async fn custom_window(
        &self,
        host: &dyn DocumentHost,
        current: &str,
    ) -> HostResult<(String, usize)> {
        let neighbors = self.custom_paragraphs / 2;
        let before = host.paragraphs_before(neighbors).await?;
        let after = host.paragraphs_after(neighbors).await?;

        let current_chars = current.chars().count();
        let caret = host
            .caret_offset_in_paragraph()
            .await?
            .unwrap_or(current_chars / 2)
            .min(current_chars);

        let mut window = String::new();
        let mut focus = caret;
        for paragraph in &before {
            window.push_str(paragraph);
            window.push('\n');
            focus += paragraph.chars().count() + 1;
        }
        window.push_str(current);
        for paragraph in &after {
            window.push('\n');
            window.push_str(paragraph);
        }

        Ok((window, focus))
    }

    /// The custom window prefixed with a synthesized outline of the document:
    /// heading-classified paragraphs as "Titles", the head of every paragraph
    /// as "Structure". The outline takes at most half the budget; the window
    /// fills the rest.
    async fn smart_context(&self, host: &dyn DocumentHost, current: &str) -> HostResult<String> {
        let body = host.body_text().await?;
        let paragraphs: Vec<&str> = body
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let outline: String = self
            .build_outline(&paragraphs)
            .chars()
            .take(self.max_chars / 2)
            .collect();

        let (window, focus) = self.custom_window(host, current).await?;
        let budget = self.max_chars.saturating_sub(outline.chars().count());
        let window = truncate_around(&window, focus, budget);

        if outline.is_empty() {
            Ok(window)
        } else {
            Ok(format!("{outline}\n{window}"))
        }
    }

    fn build_outline(&self, paragraphs: &[&str]) -> String {
        let titles: Vec<&&str> = paragraphs
            .iter()
            .filter(|p| self.classifier.is_heading(p))
            .collect();

        let mut outline = String::new();
        if !titles.is_empty() {
            outline.push_str("Titles:\n");
            for title in titles {
                outline.push_str("- ");
                outline.push_str(title);
                outline.push('\n');
            }
        }
        if !paragraphs.is_empty() {
            outline.push_str("Structure:\n");
            for paragraph in paragraphs {
                let head: String = paragraph.chars().take(STRUCTURE_SUMMARY_CHARS).collect();
                outline.push_str("- ");
                outline.push_str(&head);
                outline.push('\n');
            }
        }
        outline
    }
}
