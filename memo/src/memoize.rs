//! Memoize entry points and the [`once!`] macro.
//!
//! Orchestration is resolve → fingerprint → get-or-compute: the caller
//! context names the owner and call-site, the key builder fingerprints the
//! enclosing callable's arguments, and the registry returns the stored value
//! or runs the supplied computation exactly once.

use serde::Serialize;
use tracing::trace;

use crate::context::Caller;
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::registry::MemoRegistry;

/// Memoizes `compute` under the caller's (owner, call-site, arguments)
/// triple in the process-default registry.
///
/// Returns exactly what `compute` returned on first call, or a copy of the
/// stored value thereafter. Propagates
/// [`InvalidContext`](crate::MemoError::InvalidContext) and
/// [`UnhashableArgument`](crate::MemoError::UnhashableArgument) unchanged;
/// it never falls back to skipping memoization.
pub fn memoize<A, T, F>(caller: Caller<'_, A>, compute: F) -> Result<T>
where
    A: Serialize + ?Sized,
    T: Clone + 'static,
    F: FnOnce() -> T,
{
    let descriptor = caller.resolve()?;
    let fingerprint = Fingerprint::of(caller.arguments())?;
    // Look up and insert under separate borrows so the registry is free
    // while `compute` runs; a computation may itself memoize.
    if let Some(hit) = MemoRegistry::with_default(|registry| {
        registry.get::<T>(&descriptor.owner, descriptor.call_site, &fingerprint)
    })? {
        trace!(call_site = descriptor.call_site, "memo hit");
        return Ok(hit);
    }
    trace!(call_site = descriptor.call_site, "memo miss, computing");
    let value = compute();
    MemoRegistry::with_default(move |registry| {
        registry.insert_if_absent(descriptor.owner, descriptor.call_site, fingerprint, value)
    })
}

/// Same orchestration against an explicit registry, for callers that scope
/// the store themselves (tests, request-bounded stores).
pub fn memoize_in<A, T, F>(registry: &mut MemoRegistry, caller: Caller<'_, A>, compute: F) -> Result<T>
where
    A: Serialize + ?Sized,
    T: Clone + 'static,
    F: FnOnce() -> T,
{
    let descriptor = caller.resolve()?;
    let fingerprint = Fingerprint::of(caller.arguments())?;
    registry.get_or_compute(descriptor.owner, descriptor.call_site, fingerprint, compute)
}

/// Memoizes the wrapped computation under the enclosing method's call-site,
/// in the process-default registry.
///
/// ```
/// use std::cell::Cell;
/// use memo::{once, MemoOwner, OwnerId, OwnerToken};
///
/// struct Lookup {
///     token: OwnerToken,
///     misses: Cell<u32>,
/// }
///
/// impl MemoOwner for Lookup {
///     fn owner_id(&self) -> OwnerId {
///         self.token.id()
///     }
/// }
///
/// impl Lookup {
///     fn number_for_letter(&self, letter: &str) -> memo::Result<String> {
///         once!(self, (letter), || {
///             self.misses.set(self.misses.get() + 1);
///             format!("{letter}{}", self.misses.get())
///         })
///     }
/// }
///
/// let lookup = Lookup { token: OwnerToken::new(), misses: Cell::new(0) };
/// let first = lookup.number_for_letter("A")?;
/// assert_eq!(lookup.number_for_letter("A")?, first);
/// assert_eq!(lookup.misses.get(), 1);
/// # Ok::<(), memo::MemoError>(())
/// ```
///
/// The argument list names the enclosing callable's own arguments and may be
/// omitted when there are none. `once!(type T, …)` scopes the call to a type
/// instead of an instance, for callables with no receiver.
#[macro_export]
macro_rules! once {
    (type $ty:ty, ($($arg:expr),* $(,)?), $compute:expr $(,)?) => {
        $crate::memoize(
            $crate::Caller::new($crate::call_site!())
                .of_type::<$ty>()
                .args(&($(&$arg,)*)),
            $compute,
        )
    };
    (type $ty:ty, $compute:expr $(,)?) => {
        $crate::once!(type $ty, (), $compute)
    };
    ($owner:expr, ($($arg:expr),* $(,)?), $compute:expr $(,)?) => {
        $crate::memoize(
            $crate::Caller::new($crate::call_site!())
                .instance(&$owner)
                .args(&($(&$arg,)*)),
            $compute,
        )
    };
    ($owner:expr, $compute:expr $(,)?) => {
        $crate::once!($owner, (), $compute)
    };
}
