use std::path::Path;

use propinas_core::{DataDocument, Employee, NewTicket, Ticket};
use propinas_store::Store;

use crate::error::Result;
use crate::gateway::Gateway;

/// Reads and writes the data file directly, without a server.
#[derive(Debug, Clone)]
pub struct LocalGateway {
    store: Store,
}

impl LocalGateway {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Opens the data file at `path`, seeding it when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Store::open(path)?;
        store.initialize()?;
        Ok(Self { store })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Gateway for LocalGateway {
    fn fetch(&mut self) -> Result<DataDocument> {
        Ok(self.store.read()?)
    }

    fn create_ticket(&mut self, ticket: &NewTicket) -> Result<Ticket> {
        Ok(self.store.insert_ticket(ticket.clone())?)
    }

    fn delete_ticket(&mut self, id: i64) -> Result<()> {
        self.store.delete_ticket(id)?;
        Ok(())
    }

    fn replace_employees(&mut self, employees: &[Employee]) -> Result<Vec<Employee>> {
        Ok(self.store.replace_employees(employees.to_vec())?)
    }
}
