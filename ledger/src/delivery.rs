use chrono::{DateTime, Utc};

use provenance_common::account::AccountId;
use provenance_common::product::ProductId;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

impl Ledger {
    /// Confirm physical delivery of a purchased product.
    ///
    /// Callable by the current owner or the final customer. The product
    /// must have been purchased, and `Delivered` is terminal: re-invoking
    /// on an already-delivered product fails `InvalidState`.
    pub fn mark_delivered(
        &mut self,
        caller: AccountId,
        id: ProductId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.products.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if !product.is_claimed() {
            return Err(LedgerError::InvalidState(format!(
                "product {id} has not been purchased"
            )));
        }
        if product.is_delivered {
            return Err(LedgerError::InvalidState(format!(
                "product {id} has already been delivered"
            )));
        }
        if caller != product.owner && caller != product.final_customer {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} is neither the owner nor the final customer of product {id}"
            )));
        }

        product.is_delivered = true;
        product.status = "Delivered".into();
        self.record(id, "Delivered".into(), now);
        Ok(())
    }
}
