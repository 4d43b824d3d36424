use chrono::{DateTime, Utc};

use provenance_common::account::AccountId;
use provenance_common::product::ProductId;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

impl Ledger {
    /// Record a final-customer purchase of `quantity` units with an
    /// attached `payment` in the smallest currency unit.
    ///
    /// The first purchase claims the product for its lifetime: once
    /// `final_customer` is set, every later attempt fails `InvalidState`
    /// regardless of remaining stock. Payment must equal
    /// `price * quantity` exactly and is credited to the current owner.
    pub fn purchase_product(
        &mut self,
        caller: AccountId,
        id: ProductId,
        quantity: u32,
        payment: u128,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.products.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if product.is_claimed() {
            return Err(LedgerError::InvalidState(format!(
                "product {id} has already been purchased"
            )));
        }
        if caller.is_zero() {
            return Err(LedgerError::InvalidInput(
                "purchase requires a real account".into(),
            ));
        }
        if quantity == 0 {
            return Err(LedgerError::InvalidInput("quantity must be positive".into()));
        }
        if product.stock < quantity {
            return Err(LedgerError::InvalidInput(format!(
                "requested {quantity} units but only {} in stock",
                product.stock
            )));
        }
        let required = product
            .price
            .checked_mul(quantity as u128)
            .ok_or_else(|| LedgerError::InvalidInput("payment amount overflows".into()))?;
        if payment != required {
            return Err(LedgerError::PaymentMismatch {
                expected: required,
                actual: payment,
            });
        }

        product.stock -= quantity;
        product.final_customer = caller;
        product.status = "Purchased".into();
        let owner = product.owner;

        let balance = self.balances.entry(owner).or_insert(0);
        *balance = balance.saturating_add(payment);

        self.record(id, format!("Product Purchased by {caller}"), now);
        Ok(())
    }
}
