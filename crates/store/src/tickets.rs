use chrono::Utc;
use propinas_core::{NewTicket, Ticket, next_ticket_id};

use crate::Store;
use crate::error::Result;

impl Store {
    pub fn list_tickets(&self) -> Result<Vec<Ticket>> {
        Ok(self.read()?.tickets)
    }

    pub fn insert_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        self.insert_ticket_at(ticket, Utc::now().timestamp_millis())
    }

    /// Appends `ticket` with an id derived from `now_ms` and persists the document.
    pub fn insert_ticket_at(&self, ticket: NewTicket, now_ms: i64) -> Result<Ticket> {
        let mut document = self.read()?;
        let id = next_ticket_id(now_ms, document.tickets.iter().map(|ticket| ticket.id));
        let stored = ticket.into_ticket(id);
        document.tickets.push(stored.clone());
        self.write(&document)?;
        tracing::debug!(id, amount = stored.amount, "ticket stored");
        Ok(stored)
    }

    /// Removes the ticket if present and rewrites the file either way.
    pub fn delete_ticket(&self, id: i64) -> Result<bool> {
        let mut document = self.read()?;
        let before = document.tickets.len();
        document.tickets.retain(|ticket| ticket.id != id);
        let removed = document.tickets.len() != before;
        self.write(&document)?;
        Ok(removed)
    }
}
