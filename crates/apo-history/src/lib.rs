//! Search history for the Apotheca storefront client.
//!
//! A fixed-capacity, insertion-ordered, duplicate-suppressing buffer of
//! past search queries:
//!
//! - capacity is [`HISTORY_CAPACITY`] (5); inserting into a full buffer
//!   evicts the oldest entry and shifts the rest down,
//! - inserting an already-present query is a no-op,
//! - mutations are pure — [`SearchHistory::insert`] returns a new snapshot
//!   and the caller persists it through a [`HistoryStore`],
//! - corrupted oversized persisted state is repaired on write, not
//!   rejected.
//!
//! The store speaks the legacy key-value format: stringified sequential
//! integer keys (`"0".."4"`), oldest first.

mod buffer;
mod store;

pub use buffer::{HISTORY_CAPACITY, SearchHistory};
pub use store::{FileHistoryStore, HistoryError, HistoryStore, Result};
