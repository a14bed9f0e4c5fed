//! Where the client session reads and writes the shared document.

mod local;
mod remote;

use propinas_core::{DataDocument, Employee, NewTicket, Ticket};

use crate::error::Result;

pub use local::LocalGateway;
pub use remote::RemoteGateway;

/// Blocking access to the persisted tickets and roster.
pub trait Gateway: Send {
    fn fetch(&mut self) -> Result<DataDocument>;

    /// Persists `ticket` and returns the stored record with its assigned id.
    fn create_ticket(&mut self, ticket: &NewTicket) -> Result<Ticket>;

    /// Succeeds whether or not the id existed.
    fn delete_ticket(&mut self, id: i64) -> Result<()>;

    fn replace_employees(&mut self, employees: &[Employee]) -> Result<Vec<Employee>>;
}

impl<G: Gateway + ?Sized> Gateway for Box<G> {
    fn fetch(&mut self) -> Result<DataDocument> {
        (**self).fetch()
    }

    fn create_ticket(&mut self, ticket: &NewTicket) -> Result<Ticket> {
        (**self).create_ticket(ticket)
    }

    fn delete_ticket(&mut self, id: i64) -> Result<()> {
        (**self).delete_ticket(id)
    }

    fn replace_employees(&mut self, employees: &[Employee]) -> Result<Vec<Employee>> {
        (**self).replace_employees(employees)
    }
}
