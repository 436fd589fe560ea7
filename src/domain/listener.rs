//! The listener capability.
//!
//! A [`Listener`] is anything that can be told "something happened". The
//! publisher only ever sees listeners through `Arc<dyn Listener<E>>`, so
//! concrete variants are interchangeable and carry no shared base state.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::ListenerError;

/// Reactive behaviour invoked by a publisher on every notification pass.
///
/// `E` is the notification payload; use `()` for payload-free
/// notifications. Implementations may do arbitrary work and may fail. A
/// failure aborts the rest of the pass it happened in.
pub trait Listener<E>: Send + Sync {
    /// Handles one notification.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the listener cannot process the
    /// notification. The publisher propagates it to its own caller.
    fn notify(&self, event: &E) -> Result<(), ListenerError>;

    /// Label used in logs and error reports.
    fn name(&self) -> &str {
        "anonymous"
    }
}

impl<E, F> Listener<E> for F
where
    F: Fn(&E) -> Result<(), ListenerError> + Send + Sync,
{
    fn notify(&self, event: &E) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Shared handle through which listeners are attached.
pub type SharedListener<E> = Arc<dyn Listener<E>>;

/// Closure listener with an explicit name.
pub struct FnListener<F> {
    name: String,
    callback: F,
}

impl<F> FnListener<F> {
    /// Wraps `callback` under `name`.
    #[must_use]
    pub fn new<E>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&E) -> Result<(), ListenerError> + Send + Sync,
    {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<E, F> Listener<E> for FnListener<F>
where
    F: Fn(&E) -> Result<(), ListenerError> + Send + Sync,
{
    fn notify(&self, event: &E) -> Result<(), ListenerError> {
        (self.callback)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Returns `true` if `weak` and `strong` point at the same listener.
///
/// Only the data address is compared; two `dyn` pointers to one allocation
/// may carry different vtable pointers.
pub(crate) fn same_listener<E>(weak: &Weak<dyn Listener<E>>, strong: &SharedListener<E>) -> bool {
    std::ptr::eq(
        weak.as_ptr().cast::<()>(),
        Arc::as_ptr(strong).cast::<()>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_listeners() {
        let listener: SharedListener<u32> = Arc::new(|n: &u32| {
            if *n == 0 {
                Err(ListenerError::rejected("zero"))
            } else {
                Ok(())
            }
        });
        assert!(listener.notify(&1).is_ok());
        assert!(listener.notify(&0).is_err());
        assert_eq!(listener.name(), "anonymous");
    }

    #[test]
    fn fn_listener_keeps_its_name() {
        let listener = FnListener::new("audit", |_: &()| Ok(()));
        assert_eq!(Listener::<()>::name(&listener), "audit");
        assert!(format!("{listener:?}").contains("audit"));
    }

    #[test]
    fn identity_is_by_allocation() {
        let a: SharedListener<()> = Arc::new(FnListener::new("a", |_: &()| Ok(())));
        let b: SharedListener<()> = Arc::new(FnListener::new("a", |_: &()| Ok(())));
        let weak_a = Arc::downgrade(&a);
        assert!(same_listener(&weak_a, &a));
        assert!(same_listener(&weak_a, &Arc::clone(&a)));
        assert!(!same_listener(&weak_a, &b));
    }
}
