//! Wire payload of the cart mutation collaborator.

use serde::{Deserialize, Serialize};

/// Endpoint the cart mutation is posted to.
pub const CART_ENDPOINT: &str = "cart";

/// Mutation verb. The debouncer only ever sets an absolute quantity;
/// relative increments would reorder badly under coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAction {
    Set,
}

/// One cart mutation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    /// Product identifier.
    pub id: u64,
    /// Product display name, echoed for the server-side snack message.
    pub name: String,
    /// Absolute quantity to set.
    pub quantity: u32,
    /// Mutation verb.
    pub quantity_action: QuantityAction,
    /// Whether the server should answer with a snack notification.
    pub show_snack: bool,
}

impl CartMutation {
    /// Build a `set` mutation.
    pub fn set(id: u64, name: impl Into<String>, quantity: u32, show_snack: bool) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            quantity_action: QuantityAction::Set,
            show_snack,
        }
    }
}
