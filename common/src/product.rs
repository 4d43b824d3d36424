use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Sequential product identifier, assigned from 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked product and its custody fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Display name, immutable after creation.
    pub name: String,
    /// Price in the smallest currency unit. Always > 0.
    pub price: u128,
    /// Unsold units remaining.
    pub stock: u32,
    /// Free-text label set by the custodian for display. Lifecycle gating
    /// uses `final_customer` and `is_delivered`, never this field.
    pub status: String,
    /// Current supply-chain custodian. Never the zero sentinel.
    pub owner: AccountId,
    pub location: String,
    /// End buyer, or `AccountId::ZERO` until the product is purchased.
    /// Write-once: set by the first purchase, never reset.
    pub final_customer: AccountId,
    pub is_delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether an end customer has claimed this product.
    pub fn is_claimed(&self) -> bool {
        !self.final_customer.is_zero()
    }

    /// Lifecycle position derived from the authoritative fields.
    pub fn stage(&self) -> LifecycleStage {
        if self.is_delivered {
            LifecycleStage::Delivered
        } else if self.is_claimed() {
            LifecycleStage::Purchased
        } else {
            LifecycleStage::Created
        }
    }
}

/// Per-product lifecycle states. `Removed` is reachable only from
/// `Created`; nothing leaves `Delivered` or `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleStage {
    Created,
    Purchased,
    Delivered,
    Removed,
}

impl LifecycleStage {
    /// Returns true if transitioning from self to `next` is valid.
    pub fn can_transition_to(self, next: LifecycleStage) -> bool {
        matches!(
            (self, next),
            (LifecycleStage::Created, LifecycleStage::Purchased)
                | (LifecycleStage::Created, LifecycleStage::Removed)
                | (LifecycleStage::Purchased, LifecycleStage::Delivered)
        )
    }
}
