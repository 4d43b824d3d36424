use chrono::{DateTime, Utc};

use provenance_common::history::HistoryEvent;
use provenance_common::product::ProductId;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

impl Ledger {
    /// A product's audit trail in insertion order.
    ///
    /// `NotFound` only if the id was never assigned; removed products
    /// still return their full trail.
    pub fn get_history(&self, id: ProductId) -> Result<&[HistoryEvent]> {
        if id.0 == 0 || id.0 >= self.next_id {
            return Err(LedgerError::NotFound(id));
        }
        Ok(self.history.get(&id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Append one event to `id`'s trail. Called by every mutator after
    /// its validation has passed; never exposed as a boundary operation.
    pub(crate) fn record(&mut self, id: ProductId, description: String, now: DateTime<Utc>) {
        self.history
            .entry(id)
            .or_default()
            .push(HistoryEvent::new(description, now));
    }
}
