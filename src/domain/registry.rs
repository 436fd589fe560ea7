//! Ordered listener membership.
//!
//! [`Registry`] is a plain ordered sequence of registrations. It holds only
//! [`Weak`] references, so it never decides when a listener dies: once the
//! caller drops its last `Arc`, the registration becomes dead, is skipped
//! by [`Registry::snapshot`], and is pruned on the next mutation.
//!
//! The registry itself is not synchronized. [`super::Publisher`] keeps it
//! behind a lock and only ever iterates a [`Snapshot`].

use std::fmt;
use std::sync::{Arc, Weak};

use super::ListenerId;
use super::listener::{Listener, SharedListener, same_listener};

struct Entry<E> {
    id: ListenerId,
    listener: Weak<dyn Listener<E>>,
}

impl<E> Entry<E> {
    fn is_live(&self) -> bool {
        self.listener.strong_count() > 0
    }
}

/// Ordered collection of attached listeners.
///
/// Insertion order is preserved and duplicates are allowed: attaching the
/// same listener twice yields two registrations, and removal by identity
/// takes out the first one only.
pub struct Registry<E> {
    entries: Vec<Entry<E>>,
}

impl<E> Registry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `listener` and returns the id of the new registration.
    pub fn add(&mut self, listener: &SharedListener<E>) -> ListenerId {
        self.prune();
        let id = ListenerId::new();
        self.entries.push(Entry {
            id,
            listener: Arc::downgrade(listener),
        });
        id
    }

    /// Removes the first registration of `listener`, in current order.
    ///
    /// Returns the removed registration's id, or `None` if `listener` is
    /// not registered.
    pub fn remove(&mut self, listener: &SharedListener<E>) -> Option<ListenerId> {
        self.prune();
        let pos = self
            .entries
            .iter()
            .position(|entry| same_listener(&entry.listener, listener))?;
        Some(self.entries.remove(pos).id)
    }

    /// Removes the registration with the given id.
    ///
    /// Returns `false` if no such registration exists.
    pub fn remove_id(&mut self, id: ListenerId) -> bool {
        self.prune();
        let Some(pos) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.entries.remove(pos);
        true
    }

    /// Returns the live registrations, in order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<E> {
        let members = self
            .entries
            .iter()
            .filter_map(|entry| entry.listener.upgrade().map(|l| (entry.id, l)))
            .collect();
        Snapshot { members }
    }

    /// Returns `true` if `listener` has at least one registration.
    #[must_use]
    pub fn contains(&self, listener: &SharedListener<E>) -> bool {
        self.entries
            .iter()
            .any(|entry| same_listener(&entry.listener, listener))
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_live()).count()
    }

    /// Returns `true` if there are no live registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.entries.iter().any(Entry::is_live)
    }

    /// Drops registrations whose listener no longer exists.
    ///
    /// Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(Entry::is_live);
        let pruned = before.saturating_sub(self.entries.len());
        if pruned > 0 {
            tracing::debug!(pruned, "pruned dropped listeners");
        }
        pruned
    }
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.id))
            .finish()
    }
}

/// Frozen, ordered copy of a registry's live members.
///
/// Holds strong references, so every listener in it stays alive until the
/// snapshot is dropped, even if detached or released meanwhile.
pub struct Snapshot<E> {
    members: Vec<(ListenerId, SharedListener<E>)>,
}

impl<E> Snapshot<E> {
    /// Number of listeners in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the snapshot holds no listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates `(id, listener)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ListenerId, &dyn Listener<E>)> {
        self.members.iter().map(|(id, l)| (*id, l.as_ref()))
    }

    /// Registration ids, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<ListenerId> {
        self.members.iter().map(|(id, _)| *id).collect()
    }
}

impl<E> fmt::Debug for Snapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(|(id, l)| (id, l.name())))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::FnListener;

    fn listener(name: &str) -> SharedListener<()> {
        Arc::new(FnListener::new(name, |_: &()| Ok(())))
    }

    fn names(snapshot: &Snapshot<()>) -> Vec<String> {
        snapshot.iter().map(|(_, l)| l.name().to_string()).collect()
    }

    #[test]
    fn add_preserves_order() {
        let mut registry = Registry::new();
        let (a, b, c) = (listener("a"), listener("b"), listener("c"));
        registry.add(&a);
        registry.add(&b);
        registry.add(&c);
        assert_eq!(names(&registry.snapshot()), vec!["a", "b", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicates_are_kept_and_removed_one_at_a_time() {
        let mut registry = Registry::new();
        let (a, b) = (listener("a"), listener("b"));
        let first = registry.add(&a);
        registry.add(&b);
        let second = registry.add(&a);
        assert_eq!(names(&registry.snapshot()), vec!["a", "b", "a"]);

        assert_eq!(registry.remove(&a), Some(first));
        assert_eq!(names(&registry.snapshot()), vec!["b", "a"]);
        assert_eq!(registry.snapshot().ids().last(), Some(&second));
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut registry = Registry::new();
        let (a, b) = (listener("a"), listener("b"));
        registry.add(&a);
        assert_eq!(registry.remove(&b), None);
        assert_eq!(registry.len(), 1);
        assert!(!registry.remove_id(ListenerId::new()));
    }

    #[test]
    fn remove_id_targets_one_registration() {
        let mut registry = Registry::new();
        let a = listener("a");
        registry.add(&a);
        let second = registry.add(&a);
        assert!(registry.remove_id(second));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&a));
    }

    #[test]
    fn dropped_listeners_are_skipped_and_pruned() {
        let mut registry = Registry::new();
        let a = listener("a");
        let b = listener("b");
        registry.add(&a);
        registry.add(&b);
        drop(b);

        assert_eq!(names(&registry.snapshot()), vec!["a"]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.prune(), 1);
        assert_eq!(registry.prune(), 0);
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let mut registry = Registry::new();
        let (a, b) = (listener("a"), listener("b"));
        registry.add(&a);
        let snapshot = registry.snapshot();
        registry.add(&b);
        registry.remove(&a);
        assert_eq!(names(&snapshot), vec!["a"]);
        assert_eq!(names(&registry.snapshot()), vec!["b"]);
    }

    #[test]
    fn empty_registry() {
        let registry: Registry<()> = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
        assert_eq!(format!("{registry:?}"), "[]");
    }
}
