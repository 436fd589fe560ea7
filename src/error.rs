//! Error types for listeners, publishers, and configuration.
//!
//! [`ObserverError`] is what a [`crate::domain::Publisher`] returns to its
//! caller. [`ListenerError`] is what an individual listener returns from
//! its `notify`. Both carry a stable numeric code, in the same ranges the
//! table below lists.
//!
//! # Error Code Ranges
//!
//! | Range     | Category              |
//! |-----------|-----------------------|
//! | 1000–1999 | Configuration         |
//! | 2000–2999 | Registration          |
//! | 3000–3999 | Notification / fan-out|

use crate::domain::ListenerId;

/// Failure reported by a single listener while handling a notification.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The listener refused or failed to process the notification.
    #[error("listener rejected notification: {0}")]
    Rejected(String),

    /// The listener failed writing its output.
    #[error("listener i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ListenerError {
    /// Convenience constructor for [`ListenerError::Rejected`].
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Error surfaced by publisher operations.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// Detach was requested for a listener that is not registered and the
    /// publisher runs with [`crate::domain::DetachPolicy::Strict`].
    #[error("listener is not attached to this publisher")]
    ListenerNotAttached,

    /// A listener failed during fan-out. Listeners after it in the same
    /// pass were not invoked.
    #[error("listener {name} ({listener}) failed: {source}")]
    ListenerFailed {
        /// Registration that failed.
        listener: ListenerId,
        /// Display name of the failing listener.
        name: String,
        /// The listener's own error.
        #[source]
        source: ListenerError,
    },
}

impl ObserverError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::ListenerNotAttached => 2001,
            Self::ListenerFailed { .. } => 3001,
        }
    }

    /// Returns the failing listener's id, if this error came out of fan-out.
    #[must_use]
    pub const fn failed_listener(&self) -> Option<ListenerId> {
        match self {
            Self::ListenerFailed { listener, .. } => Some(*listener),
            Self::ListenerNotAttached => None,
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be understood.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// The offending raw value.
        value: String,
    },
}

impl ConfigError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidValue { .. } => 1001,
        }
    }
}
