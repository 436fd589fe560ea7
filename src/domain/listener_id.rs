//! Registration tokens.
//!
//! Every `attach` mints a fresh [`ListenerId`], so attaching the same
//! listener twice yields two tokens that can be detached independently.
//! The token is opaque; it only compares, hashes, prints and serializes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token naming one listener registration on a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(uuid::Uuid);

impl ListenerId {
    /// Mints a token that no other registration shares.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
