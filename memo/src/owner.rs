//! Owner identity: whose memoized state a call belongs to.
//!
//! An owner is either one live instance (identified through an embedded
//! [`OwnerToken`]) or a type, for calls made without an instance context.
//! Instance ids are drawn from a process-wide monotonic counter and never
//! reused, so a dropped owner's entries cannot bleed into a later owner.
//! The original allocator-handle scheme, where an identity slot can be
//! recycled, survives as [`OwnerId::for_address`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

fn next_owner_id() -> u64 {
    NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identity a memoized value is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerId {
    /// One live instance. Unique per [`OwnerToken`] for the process lifetime.
    Instance(u64),
    /// A type, used for calls without an instance context.
    Type(&'static str),
}

impl OwnerId {
    /// Type identity for `T`.
    pub fn of_type<T: ?Sized>() -> Self {
        OwnerId::Type(std::any::type_name::<T>())
    }

    /// Compatibility mode: derives instance identity from the referent's
    /// address, like the original allocator-handle scheme. An address can be
    /// reused after its referent is dropped; entries memoized under the old
    /// referent then become visible to the new one. Prefer [`OwnerToken`],
    /// which never reuses an id.
    pub fn for_address<T: ?Sized>(value: &T) -> Self {
        OwnerId::Instance(value as *const T as *const () as usize as u64)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerId::Instance(id) => write!(f, "instance#{}", id),
            OwnerId::Type(name) => write!(f, "type:{}", name),
        }
    }
}

/// Seam between application owner structs and the registry's identity key.
///
/// Owner structs embed an [`OwnerToken`] and delegate to it.
pub trait MemoOwner {
    fn owner_id(&self) -> OwnerId;
}

impl MemoOwner for OwnerId {
    fn owner_id(&self) -> OwnerId {
        self.clone()
    }
}

impl<T: MemoOwner + ?Sized> MemoOwner for &T {
    fn owner_id(&self) -> OwnerId {
        (**self).owner_id()
    }
}

/// Embeddable identity cell for owner structs.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct OwnerToken {
    id: u64,
}

impl OwnerToken {
    /// Draws the next monotonic id.
    pub fn new() -> Self {
        Self {
            id: next_owner_id(),
        }
    }

    /// This token's identity.
    pub fn id(&self) -> OwnerId {
        OwnerId::Instance(self.id)
    }
}

impl Default for OwnerToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A duplicated owner starts with a cold cache: the clone draws a fresh id.
/// Owners that want shared identity across copies share the token by
/// reference or reuse an explicit [`OwnerId`].
impl Clone for OwnerToken {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl MemoOwner for OwnerToken {
    fn owner_id(&self) -> OwnerId {
        self.id()
    }
}

/// Emits the raw id, for diagnostics only. Cache entries are not part of an
/// owner's serialized state; see the `Deserialize` impl.
impl Serialize for OwnerToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.id)
    }
}

/// Reads and discards the stored id: identity is assigned at restoration
/// time, so restoring an owner's data never implicitly restores its memoized
/// cache. Entries memoized under the previous identity stay in the registry
/// untouched.
impl<'de> Deserialize<'de> for OwnerToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let _ = u64::deserialize(deserializer)?;
        Ok(Self::new())
    }
}
