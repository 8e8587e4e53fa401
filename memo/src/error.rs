//! Memoization error types.
//!
//! Every variant indicates a programming-context misuse, not a transient
//! condition: nothing here is retried, defaulted, or silently skipped.

use thiserror::Error;

/// Errors surfaced by the memoize entry points.
#[derive(Error, Debug)]
pub enum MemoError {
    /// The entry point was invoked with no resolvable owner; memoization
    /// without an owner is undefined.
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// An argument could not be canonically encoded for fingerprinting.
    /// The registry is left unmodified.
    #[error("Unhashable argument: {0}")]
    UnhashableArgument(#[from] serde_json::Error),

    /// A stored value at this triple has a different type than the one
    /// requested. Cannot occur through `once!`, which fixes one result type
    /// per call-site.
    #[error("Cached value at `{call_site}` has a different type than requested")]
    ValueTypeMismatch { call_site: String },
}

pub type Result<T> = std::result::Result<T, MemoError>;
