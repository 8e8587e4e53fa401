//! # memo
//!
//! Per-owner, per-call-site memoization: a method body wraps a computation in
//! [`once!`] and the computation runs at most once per (owner, call-site,
//! arguments) triple for the lifetime of the process. Results live in a
//! process-scoped [`MemoRegistry`], not in the owner itself, so serializing an
//! owner's data never carries its cache along.
//!
//! ## Modules
//!
//! - [`error`] – [`MemoError`] taxonomy and the crate [`Result`] alias
//! - [`owner`] – [`OwnerId`], [`OwnerToken`], the [`MemoOwner`] seam
//! - [`context`] – [`Caller`] context, [`CallerDescriptor`], [`call_site!`]
//! - [`fingerprint`] – [`Fingerprint`] key builder over canonical encoding
//! - [`registry`] – [`MemoRegistry`] store and its maintenance surface
//! - `memoize` – [`memoize()`]/[`memoize_in()`] entry points and [`once!`]
//! - [`logger`] – tracing initialization

pub mod context;
pub mod error;
pub mod fingerprint;
pub mod logger;
pub mod memoize;
pub mod owner;
pub mod registry;


pub use context::{Caller, CallerDescriptor};
pub use error::{MemoError, Result};
pub use fingerprint::Fingerprint;
pub use logger::init_tracing;
pub use memoize::{memoize, memoize_in};
pub use owner::{MemoOwner, OwnerId, OwnerToken};
pub use registry::{clear_all, clear_owner, MemoRegistry};
