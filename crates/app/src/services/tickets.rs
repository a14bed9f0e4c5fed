use propinas_core::{DataDocument, NewTicket, ReportTotals, Ticket};
use propinas_store::Store;

use crate::error::Result;
use crate::ledger::prepare_ticket;
use crate::reports::summarize;
use crate::services::{SharedConfig, WriteLock, open_store, write_guard};

#[derive(Clone)]
pub struct TicketsService {
    config: SharedConfig,
    lock: WriteLock,
}

impl TicketsService {
    pub(super) fn new(config: SharedConfig, lock: WriteLock) -> Self {
        Self { config, lock }
    }

    fn store(&self) -> Result<Store> {
        open_store(&self.config)
    }

    pub fn data(&self) -> Result<DataDocument> {
        Ok(self.store()?.read()?)
    }

    pub fn list(&self) -> Result<Vec<Ticket>> {
        Ok(self.store()?.list_tickets()?)
    }

    pub fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let prepared = prepare_ticket(ticket)?;
        let store = self.store()?;
        let _guard = write_guard(&self.lock);
        let stored = store.insert_ticket(prepared)?;
        tracing::info!(
            id = stored.id,
            amount = stored.amount,
            employees = stored.employees.len(),
            "ticket created"
        );
        Ok(stored)
    }

    /// Returns whether a ticket was removed; absent ids are not an error.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let store = self.store()?;
        let _guard = write_guard(&self.lock);
        let removed = store.delete_ticket(id)?;
        tracing::info!(id, removed, "ticket deleted");
        Ok(removed)
    }

    /// Per-employee totals over every stored ticket, largest first.
    pub fn totals(&self) -> Result<ReportTotals> {
        Ok(summarize(&self.list()?))
    }
}
