//! # fanout
//!
//! Synchronous publisher/subscriber notification core.
//!
//! A [`domain::Publisher`] owns an ordered registry of listeners and, on
//! every `notify`, invokes each of them once per registration in attachment
//! order. Membership is frozen into a snapshot before the first listener
//! runs, so listeners may attach or detach during a pass without disturbing
//! it.
//!
//! ## Architecture
//!
//! ```text
//! Caller (demo harness, application code)
//!     │
//!     ├── Publisher (domain/)      attach / detach / notify, hooks
//!     │      │
//!     │      └── Registry          ordered weak registrations
//!     │             │
//!     │             └── Snapshot   frozen membership for one pass
//!     │
//!     └── Listener (domain/)       Subscriber, SpecialSubscriber, closures
//! ```

pub mod config;
pub mod domain;
pub mod error;
