use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use provenance_common::account::AccountId;
use provenance_common::history::HistoryEvent;
use provenance_common::product::{Product, ProductId};

use crate::access::RoleRegistry;
use crate::error::{LedgerError, Result};

/// The authoritative product-tracking store.
///
/// One table of products keyed by sequential id, the retained audit
/// trails, the role registry, and the payout balances from settlement.
/// Mutations go through the component modules (`registry`, `custody`,
/// `settlement`, `delivery`); each takes `&mut self`, so callers provide
/// the serialization the underlying ordering mechanism used to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub(crate) products: BTreeMap<ProductId, Product>,
    /// Audit trails keyed by product id. Entries survive product removal.
    pub(crate) history: BTreeMap<ProductId, Vec<HistoryEvent>>,
    pub(crate) roles: RoleRegistry,
    /// Payouts credited by purchase settlement.
    pub(crate) balances: BTreeMap<AccountId, u128>,
    /// Next id to assign. Ids are dense from 1 and never reused.
    pub(crate) next_id: u64,
}

/// Descriptive fields of a product, as read by dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBasicDetails {
    pub id: ProductId,
    pub name: String,
    pub price: u128,
    pub stock: u32,
    pub status: String,
    pub owner: AccountId,
    pub location: String,
}

/// Delivery-side fields of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDeliveryDetails {
    pub id: ProductId,
    pub final_customer: AccountId,
    pub is_delivered: bool,
}

impl Ledger {
    /// Fresh ledger with `admin` seeded as the sole administrator.
    pub fn new(admin: AccountId) -> Self {
        Ledger {
            products: BTreeMap::new(),
            history: BTreeMap::new(),
            roles: RoleRegistry::with_admin(admin),
            balances: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Total ids ever assigned, including removed products. Ids are dense,
    /// so callers may iterate `1..=product_count()` and treat `NotFound`
    /// as "removed".
    pub fn product_count(&self) -> u64 {
        self.next_id - 1
    }

    /// Full product record. `NotFound` for unknown or removed ids.
    pub fn product(&self, id: ProductId) -> Result<&Product> {
        self.products.get(&id).ok_or(LedgerError::NotFound(id))
    }

    pub fn get_product_basic_details(&self, id: ProductId) -> Result<ProductBasicDetails> {
        let product = self.product(id)?;
        Ok(ProductBasicDetails {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            status: product.status.clone(),
            owner: product.owner,
            location: product.location.clone(),
        })
    }

    pub fn get_product_delivery_details(&self, id: ProductId) -> Result<ProductDeliveryDetails> {
        let product = self.product(id)?;
        Ok(ProductDeliveryDetails {
            id: product.id,
            final_customer: product.final_customer,
            is_delivered: product.is_delivered,
        })
    }

    /// Payout balance credited to `account` by settlement.
    pub fn balance_of(&self, account: AccountId) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Lookup gated on custody: the product must exist and `caller` must
    /// be its current owner.
    pub(crate) fn require_owned(&self, id: ProductId, caller: AccountId) -> Result<&Product> {
        let product = self.product(id)?;
        if product.owner != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not the owner of product {id}"
            )));
        }
        Ok(product)
    }

    /// Mutable variant of [`require_owned`](Ledger::require_owned).
    /// Callers must finish all validation against the returned product
    /// before writing to it.
    pub(crate) fn require_owned_mut(
        &mut self,
        id: ProductId,
        caller: AccountId,
    ) -> Result<&mut Product> {
        let product = self.products.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if product.owner != caller {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is not the owner of product {id}"
            )));
        }
        Ok(product)
    }
}
