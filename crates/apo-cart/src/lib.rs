//! Cart synchronization for the Apotheca storefront client.
//!
//! Quantity steppers produce edits far faster than the backend wants to
//! hear about them. [`QuantityDebouncer`] collapses every edit inside a
//! quiet window (250 ms by default) into a single `set`-quantity mutation
//! carrying the last value, skips values the server already has, and never
//! retries a failed send — failures are surfaced for UI notification only.
//!
//! Teardown is deterministic: [`QuantityDebouncer::cancel`] (or drop)
//! clears the armed timer so nothing mutates state after the owning screen
//! is gone.

mod config;
mod debounce;
mod mutation;

pub use config::CartSyncConfig;
pub use debounce::QuantityDebouncer;
pub use mutation::{CART_ENDPOINT, CartMutation, QuantityAction};
