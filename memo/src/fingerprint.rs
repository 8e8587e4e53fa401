//! Key builder: deterministic fingerprints over argument lists.
//!
//! Arguments are canonically encoded with `serde_json` and the encoding is
//! kept whole as the cache sub-key. Order- and value-sensitive by
//! construction; structurally equal argument lists encode identically.
//! Values `serde_json` cannot encode fail with
//! [`MemoError::UnhashableArgument`] instead of aliasing distinct values to
//! one key.

use serde::Serialize;

use crate::error::{MemoError, Result};

/// Deterministic digest of an argument list, used as a cache sub-key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Canonically encodes `args`, normally a tuple of references to the
    /// enclosing callable's arguments.
    pub fn of<A: Serialize + ?Sized>(args: &A) -> Result<Self> {
        let encoded = serde_json::to_string(args).map_err(MemoError::UnhashableArgument)?;
        Ok(Fingerprint(encoded))
    }

    /// The fixed fingerprint of an empty argument list.
    pub fn no_args() -> Self {
        Fingerprint("null".to_string())
    }

    /// The canonical encoding backing this fingerprint.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
