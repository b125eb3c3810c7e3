//! Tri-phase resource loading for the Apotheca storefront client.
//!
//! A screen binds one endpoint into a [`ResourceSync`] and renders from its
//! [`SyncSnapshot`]:
//!
//! - the very first fetch runs as `loading`,
//! - every later refresh runs as `updating` so existing data keeps
//!   rendering,
//! - overlapping triggers are resolved last-trigger-wins (a stale response
//!   never overwrites a fresher one),
//! - a failed background refresh preserves the last-good data and stays
//!   observable through [`ResourceSync::last_refresh_error`].
//!
//! Re-fetch-on-dependency-change is explicit here: the caller names the
//! value that changed via [`ResourceSync::set_params`], and payloads are
//! compared structurally, not by reference identity.

mod binding;
mod phase;

pub use binding::{BindingConfig, ResourceSync, SyncSnapshot};
pub use phase::LoadPhase;
