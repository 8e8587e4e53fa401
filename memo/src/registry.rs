//! Process-scoped memo registry.
//!
//! A three-level mapping — owner identity → call-site name → argument
//! fingerprint → stored value — so one owner's entries are removable as a
//! unit. Presence is the map entry itself: a stored `None::<T>` or `()` is a
//! first-class cached value, distinct from absence.
//!
//! Single-threaded cooperative use: the default registry is thread-local and
//! no borrow is held while a computation runs. A parallel-safe variant would
//! need per-triple mutual exclusion, which this registry does not provide.

use std::any::Any;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{MemoError, Result};
use crate::fingerprint::Fingerprint;
use crate::owner::OwnerId;

type Slots = HashMap<Fingerprint, Box<dyn Any>>;
type CallSites = HashMap<&'static str, Slots>;

thread_local! {
    static DEFAULT_REGISTRY: RefCell<MemoRegistry> = RefCell::new(MemoRegistry::new());
}

/// Process-scoped store of memoized results.
///
/// For a fixed (owner, call-site, fingerprint) triple the registry holds at
/// most one entry; once written, an entry is never overwritten and never
/// expires. Entries leave the registry only through [`clear_owner`] and
/// [`clear_all`](MemoRegistry::clear_all).
#[derive(Default)]
pub struct MemoRegistry {
    entries: HashMap<OwnerId, CallSites>,
}

impl MemoRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Scoped access to the process-default registry. Thread-local, matching
    /// the single-threaded usage model.
    pub fn with_default<R>(f: impl FnOnce(&mut MemoRegistry) -> R) -> R {
        DEFAULT_REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
    }

    /// Returns a copy of the stored value for the triple, or `None` when no
    /// entry exists.
    pub fn get<T: Clone + 'static>(
        &self,
        owner: &OwnerId,
        call_site: &str,
        fingerprint: &Fingerprint,
    ) -> Result<Option<T>> {
        let Some(stored) = self
            .entries
            .get(owner)
            .and_then(|sites| sites.get(call_site))
            .and_then(|slots| slots.get(fingerprint))
        else {
            return Ok(None);
        };
        let value = stored
            .downcast_ref::<T>()
            .ok_or_else(|| MemoError::ValueTypeMismatch {
                call_site: call_site.to_string(),
            })?;
        Ok(Some(value.clone()))
    }

    /// Stores `value` for the triple unless an entry already exists, and
    /// returns the value that ends up stored. The first write always wins:
    /// an entry is never overwritten, even when a nested memoized call
    /// raced the outer insert.
    pub fn insert_if_absent<T: Clone + 'static>(
        &mut self,
        owner: OwnerId,
        call_site: &'static str,
        fingerprint: Fingerprint,
        value: T,
    ) -> Result<T> {
        let slot = self
            .entries
            .entry(owner)
            .or_default()
            .entry(call_site)
            .or_default()
            .entry(fingerprint);
        match slot {
            Entry::Occupied(existing) => {
                trace!(call_site, "kept existing entry over a second insert");
                existing
                    .get()
                    .downcast_ref::<T>()
                    .cloned()
                    .ok_or_else(|| MemoError::ValueTypeMismatch {
                        call_site: call_site.to_string(),
                    })
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Box::new(value.clone()));
                Ok(value)
            }
        }
    }

    /// Returns the stored value for the triple, computing and storing it on
    /// first use. Central contract: `compute` never runs when an entry
    /// exists, and runs exactly once otherwise.
    pub fn get_or_compute<T, F>(
        &mut self,
        owner: OwnerId,
        call_site: &'static str,
        fingerprint: Fingerprint,
        compute: F,
    ) -> Result<T>
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        if let Some(hit) = self.get(&owner, call_site, &fingerprint)? {
            debug!(owner = %owner, call_site, "memo hit");
            return Ok(hit);
        }
        debug!(owner = %owner, call_site, "memo miss, computing");
        let value = compute();
        self.insert_if_absent(owner, call_site, fingerprint, value)
    }

    /// Removes every entry under `owner` and reports whether anything was
    /// removed. Request-boundary hygiene for callers; nothing calls this
    /// automatically, in particular not owner destruction.
    pub fn clear_owner(&mut self, owner: &OwnerId) -> bool {
        let removed = self.entries.remove(owner).is_some();
        if removed {
            debug!(owner = %owner, "cleared owner subtree");
        }
        removed
    }

    /// Drops every entry.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        debug!("cleared memo registry");
    }

    /// Total number of stored entries, across all owners.
    pub fn entry_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|sites| sites.values())
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

impl fmt::Debug for MemoRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoRegistry")
            .field("owners", &self.entries.len())
            .field("entries", &self.entry_count())
            .finish()
    }
}

/// Removes every entry memoized under `owner` in the process-default
/// registry.
pub fn clear_owner(owner: &OwnerId) -> bool {
    MemoRegistry::with_default(|registry| registry.clear_owner(owner))
}

/// Resets the process-default registry. Intended for test isolation and
/// request-boundary hygiene.
pub fn clear_all() {
    MemoRegistry::with_default(|registry| registry.clear_all());
}
