//! Error types for the completion core
//!
//! Only configuration errors cross the core boundary. Host-interaction and
//! provider failures are absorbed at their point of use and reflected as an
//! empty context or a missing suggestion, with a log line for diagnosis.

use thiserror::Error;

/// Error surfaced by a completion attempt.
///
/// `trigger_completion` returns this only when the captured configuration is
/// unusable (missing endpoint or model) — a setup problem the UI should show,
/// not a transient condition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompletionError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure of a host-document round-trip.
///
/// Never propagated past the component that issued the call; the enclosing
/// operation degrades to its safe default.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("host interaction failed: {0}")]
    Interaction(String),

    #[error("host capability unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for host round-trips
pub type HostResult<T> = Result<T, HostError>;
