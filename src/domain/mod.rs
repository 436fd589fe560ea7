//! Domain layer: listeners, the registry, and the publisher.
//!
//! This module contains the notification core: the [`Listener`]
//! capability and its concrete variants, per-registration identity, the
//! ordered [`Registry`] with its frozen [`Snapshot`], and the
//! [`Publisher`] that fans notifications out over a snapshot.

pub mod listener;
pub mod listener_id;
pub mod publisher;
pub mod registry;
pub mod subscriber;

pub use listener::{FnListener, Listener, SharedListener};
pub use listener_id::ListenerId;
pub use publisher::{DetachPolicy, Hook, Publisher};
pub use registry::{Registry, Snapshot};
pub use subscriber::{SpecialSubscriber, Subscriber, Transcript};
