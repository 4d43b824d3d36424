use chrono::{DateTime, Utc};

use provenance_common::account::AccountId;
use provenance_common::product::{Product, ProductId};
use provenance_common::roles::Role;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

impl Ledger {
    /// Register a new product. Requires the administrator role; the
    /// caller becomes the initial custodian.
    pub fn add_product(
        &mut self,
        caller: AccountId,
        name: &str,
        price: u128,
        stock: u32,
        now: DateTime<Utc>,
    ) -> Result<ProductId> {
        if !self.roles.has_role(Role::Administrator, caller) {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} does not hold the {} role",
                Role::Administrator
            )));
        }
        if name.is_empty() {
            return Err(LedgerError::InvalidInput(
                "product name must not be empty".into(),
            ));
        }
        if price == 0 {
            return Err(LedgerError::InvalidInput("price must be positive".into()));
        }

        let id = ProductId(self.next_id);
        self.products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                price,
                stock,
                status: "Created".into(),
                owner: caller,
                location: String::new(),
                final_customer: AccountId::ZERO,
                is_delivered: false,
                created_at: now,
            },
        );
        self.next_id += 1;
        self.record(id, "Product Created".into(), now);
        Ok(id)
    }

    /// Overwrite the location label. Owner only; allowed before or after
    /// sale.
    pub fn update_location(
        &mut self,
        caller: AccountId,
        id: ProductId,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.require_owned_mut(id, caller)?;
        product.location = location.to_string();
        self.record(id, format!("Location updated to {location}"), now);
        Ok(())
    }

    /// Overwrite the free-text status label. Owner only; allowed before
    /// or after sale.
    pub fn update_status(
        &mut self,
        caller: AccountId,
        id: ProductId,
        status: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.require_owned_mut(id, caller)?;
        product.status = status.to_string();
        self.record(id, format!("Status updated to {status}"), now);
        Ok(())
    }

    /// Change the price of an unsold product. Owner only.
    pub fn update_product_price(
        &mut self,
        caller: AccountId,
        id: ProductId,
        new_price: u128,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.require_owned_mut(id, caller)?;
        if product.is_claimed() {
            return Err(LedgerError::InvalidState(format!(
                "product {id} has already been purchased"
            )));
        }
        if new_price == 0 {
            return Err(LedgerError::InvalidInput("price must be positive".into()));
        }
        product.price = new_price;
        self.record(id, format!("Price updated to {new_price}"), now);
        Ok(())
    }

    /// Change the stock of an unsold product. Owner only.
    pub fn update_product_stock(
        &mut self,
        caller: AccountId,
        id: ProductId,
        new_stock: u32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.require_owned_mut(id, caller)?;
        if product.is_claimed() {
            return Err(LedgerError::InvalidState(format!(
                "product {id} has already been purchased"
            )));
        }
        product.stock = new_stock;
        self.record(id, format!("Stock updated to {new_stock}"), now);
        Ok(())
    }

    /// Delete an unsold product's row. Owner only. The audit trail is
    /// retained and stays queryable through `get_history`.
    pub fn remove_product(
        &mut self,
        caller: AccountId,
        id: ProductId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.require_owned(id, caller)?;
        if product.is_claimed() {
            return Err(LedgerError::InvalidState(format!(
                "product {id} has already been purchased"
            )));
        }
        self.products.remove(&id);
        self.record(id, "Product Removed".into(), now);
        Ok(())
    }
}
