use chrono::{DateTime, Utc};

use provenance_common::account::AccountId;
use provenance_common::product::ProductId;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

impl Ledger {
    /// Reassign custody of a product to `new_owner`.
    ///
    /// Owner only. Usable at any lifecycle stage, including after a sale:
    /// products keep moving through intermediate custodians on their way
    /// to the final customer. Touches nothing but `owner`.
    pub fn transfer_product(
        &mut self,
        caller: AccountId,
        id: ProductId,
        new_owner: AccountId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let product = self.require_owned_mut(id, caller)?;
        if new_owner.is_zero() {
            return Err(LedgerError::InvalidInput(
                "cannot transfer custody to the zero account".into(),
            ));
        }
        product.owner = new_owner;
        self.record(id, format!("Ownership transferred to {new_owner}"), now);
        Ok(())
    }
}
