//! Publisher: owns a registry and fans notifications out to it.
//!
//! Every [`Publisher::notify`] call freezes the current membership into a
//! [`Snapshot`](super::Snapshot) under the registry lock, releases the lock,
//! and then invokes each listener in registration order. Listeners may
//! therefore attach or detach (themselves or others) while being notified;
//! such changes apply from the next pass on.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::listener::SharedListener;
use super::{ListenerId, Registry};
use crate::config::FanoutConfig;
use crate::error::ObserverError;

/// Callback run around a notification pass.
pub type Hook<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// What `detach` does when the listener is not registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetachPolicy {
    /// Silently succeed. Detach is idempotent.
    #[default]
    Lenient,
    /// Report [`ObserverError::ListenerNotAttached`].
    Strict,
}

impl DetachPolicy {
    /// Parses `"lenient"` or `"strict"` (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Synchronous publisher of `E` notifications.
///
/// # Concurrency
///
/// - `attach`, `detach` and the snapshot step of `notify` are serialized
///   by one lock per publisher.
/// - The lock is never held while listeners or hooks run.
/// - Separate publishers share no state.
pub struct Publisher<E> {
    registry: Mutex<Registry<E>>,
    detach_policy: DetachPolicy,
    on_start: Option<Hook<E>>,
    on_finish: Option<Hook<E>>,
}

impl<E> Publisher<E> {
    /// Creates a publisher with no listeners and the lenient detach policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_detach_policy(DetachPolicy::default())
    }

    /// Creates a publisher with the given detach policy.
    #[must_use]
    pub fn with_detach_policy(detach_policy: DetachPolicy) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            detach_policy,
            on_start: None,
            on_finish: None,
        }
    }

    /// Creates a publisher configured from `config`.
    #[must_use]
    pub fn with_config(config: &FanoutConfig) -> Self {
        Self::with_detach_policy(config.detach_policy)
    }

    /// Returns the active detach policy.
    #[must_use]
    pub const fn detach_policy(&self) -> DetachPolicy {
        self.detach_policy
    }

    /// Registers `listener` at the end of the notification order.
    ///
    /// The publisher keeps only a weak reference; the caller owns the
    /// listener's lifetime.
    pub fn attach(&self, listener: &SharedListener<E>) -> ListenerId {
        let id = self.registry.lock().add(listener);
        tracing::debug!(listener = %id, name = listener.name(), "listener attached");
        id
    }

    /// Removes the first registration of `listener`.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::ListenerNotAttached`] if `listener` is not
    /// registered and the policy is [`DetachPolicy::Strict`]. Under
    /// [`DetachPolicy::Lenient`] this never fails.
    pub fn detach(&self, listener: &SharedListener<E>) -> Result<(), ObserverError> {
        let removed = self.registry.lock().remove(listener);
        match removed {
            Some(id) => {
                tracing::debug!(listener = %id, name = listener.name(), "listener detached");
                Ok(())
            }
            None => self.detach_missing(listener.name()),
        }
    }

    /// Removes the registration `id`.
    ///
    /// # Errors
    ///
    /// Same policy as [`Publisher::detach`].
    pub fn detach_id(&self, id: ListenerId) -> Result<(), ObserverError> {
        if self.registry.lock().remove_id(id) {
            tracing::debug!(listener = %id, "listener detached");
            Ok(())
        } else {
            self.detach_missing(&id.to_string())
        }
    }

    fn detach_missing(&self, name: &str) -> Result<(), ObserverError> {
        match self.detach_policy {
            DetachPolicy::Lenient => {
                tracing::debug!(name, "detach of unattached listener ignored");
                Ok(())
            }
            DetachPolicy::Strict => {
                tracing::warn!(name, "detach of unattached listener rejected");
                Err(ObserverError::ListenerNotAttached)
            }
        }
    }

    /// Notifies every attached listener, in attachment order.
    ///
    /// Membership is captured once, before any listener runs. The
    /// `on_start` hook runs before the first listener; `on_finish` runs
    /// only if every listener succeeded. Returns the number of listeners
    /// invoked.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::ListenerFailed`] for the first listener
    /// that fails. Listeners after it are not invoked in this pass.
    pub fn notify(&self, event: &E) -> Result<usize, ObserverError> {
        let snapshot = self.registry.lock().snapshot();
        tracing::debug!(listeners = snapshot.len(), "notification pass started");

        if let Some(hook) = &self.on_start {
            hook(event);
        }

        for (id, listener) in snapshot.iter() {
            tracing::trace!(listener = %id, name = listener.name(), "notifying listener");
            if let Err(source) = listener.notify(event) {
                tracing::warn!(
                    listener = %id,
                    name = listener.name(),
                    error = %source,
                    "listener failed; aborting notification pass"
                );
                return Err(ObserverError::ListenerFailed {
                    listener: id,
                    name: listener.name().to_string(),
                    source,
                });
            }
        }

        if let Some(hook) = &self.on_finish {
            hook(event);
        }
        Ok(snapshot.len())
    }

    /// Sets the hook run at the start of every notification pass.
    pub fn set_on_start(&mut self, hook: impl Fn(&E) + Send + Sync + 'static) {
        self.on_start = Some(Arc::new(hook));
    }

    /// Sets the hook run after every fully successful notification pass.
    pub fn set_on_finish(&mut self, hook: impl Fn(&E) + Send + Sync + 'static) {
        self.on_finish = Some(Arc::new(hook));
    }

    /// Removes both hooks.
    pub fn clear_hooks(&mut self) {
        self.on_start = None;
        self.on_finish = None;
    }

    /// Returns `true` if `listener` has at least one registration.
    #[must_use]
    pub fn is_attached(&self, listener: &SharedListener<E>) -> bool {
        self.registry.lock().contains(listener)
    }

    /// Number of live registrations.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Returns `true` if no listener is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }
}

impl<E> Default for Publisher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Publisher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("registry", &*self.registry.lock())
            .field("detach_policy", &self.detach_policy)
            .field("on_start", &self.on_start.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}
