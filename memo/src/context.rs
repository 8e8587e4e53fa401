//! Caller context: who is calling, from where, with what arguments.
//!
//! The original scheme inspected the live call stack at a fixed depth to
//! discover the caller. Here the context is explicit: the call point
//! assembles a [`Caller`] naming its owner, its qualified callable name
//! (captured by [`call_site!`]) and the enclosing callable's own arguments.
//! [`Caller::resolve`] turns that into a [`CallerDescriptor`] or fails with
//! [`MemoError::InvalidContext`] when no owner is in play.

use crate::error::{MemoError, Result};
use crate::owner::{MemoOwner, OwnerId};

/// Unresolved caller context, assembled at the call point.
///
/// `A` is the enclosing callable's argument tuple, borrowed so nothing is
/// copied before fingerprinting.
#[derive(Debug)]
pub struct Caller<'a, A: ?Sized = ()> {
    owner: Option<OwnerId>,
    call_site: &'static str,
    args: &'a A,
}

impl Caller<'static, ()> {
    /// Starts a context for the named call-site: no owner, no arguments.
    pub fn new(call_site: &'static str) -> Self {
        Caller {
            owner: None,
            call_site,
            args: &(),
        }
    }
}

impl<'a, A: ?Sized> Caller<'a, A> {
    /// Scopes the call to a live instance.
    pub fn instance(mut self, owner: &impl MemoOwner) -> Self {
        self.owner = Some(owner.owner_id());
        self
    }

    /// Scopes the call to a type, for calls without an instance context.
    pub fn of_type<T: ?Sized>(mut self) -> Self {
        self.owner = Some(OwnerId::of_type::<T>());
        self
    }

    /// Replaces the argument list the fingerprint is computed over.
    pub fn args<'b, B: ?Sized>(self, args: &'b B) -> Caller<'b, B> {
        Caller {
            owner: self.owner,
            call_site: self.call_site,
            args,
        }
    }

    /// The argument list in scope at the call-site.
    pub fn arguments(&self) -> &'a A {
        self.args
    }

    /// Resolves the context into owner identity and call-site name.
    ///
    /// Fails with [`MemoError::InvalidContext`] when no owner was supplied,
    /// the "invoked from top-level code" case.
    pub fn resolve(&self) -> Result<CallerDescriptor> {
        if self.call_site.is_empty() {
            return Err(MemoError::InvalidContext(
                "empty call-site name".to_string(),
            ));
        }
        let owner = self.owner.clone().ok_or_else(|| {
            MemoError::InvalidContext(format!(
                "no owner for call-site `{}`; memoize must be called from an instance or type context",
                self.call_site
            ))
        })?;
        Ok(CallerDescriptor {
            owner,
            call_site: self.call_site,
        })
    }
}

/// Resolved caller: which owner and which callable are responsible for a
/// memoization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerDescriptor {
    pub owner: OwnerId,
    pub call_site: &'static str,
}

/// Expands to the fully qualified name of the enclosing function or method,
/// e.g. `my_app::report::ReportBuilder::summary`. Type-qualified, so
/// same-named methods on different types never collide.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __call_site_probe() {}
        fn __name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __name_of(__call_site_probe);
        let name = &name[..name.len() - "::__call_site_probe".len()];
        name.trim_end_matches("::{{closure}}")
    }};
}
