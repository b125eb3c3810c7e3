//! Debounce configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the cart-quantity debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSyncConfig {
    /// Debounce delay in milliseconds.
    ///
    /// After a quantity edit, the syncer waits this long before sending.
    /// Further edits reset the timer, so only the last value of a quiet
    /// window is ever sent.
    pub delay_ms: u64,

    /// Whether issued mutations ask the server for a snack notification.
    pub show_snack: bool,
}

impl Default for CartSyncConfig {
    fn default() -> Self {
        Self {
            delay_ms: 250,
            show_snack: false,
        }
    }
}
