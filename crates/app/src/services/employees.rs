use propinas_core::Employee;
use propinas_store::Store;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, WriteLock, open_store, write_guard};

#[derive(Clone)]
pub struct EmployeesService {
    config: SharedConfig,
    lock: WriteLock,
}

impl EmployeesService {
    pub(super) fn new(config: SharedConfig, lock: WriteLock) -> Self {
        Self { config, lock }
    }

    fn store(&self) -> Result<Store> {
        open_store(&self.config)
    }

    pub fn list(&self) -> Result<Vec<Employee>> {
        Ok(self.store()?.list_employees()?)
    }

    /// Replaces the whole persisted roster.
    pub fn replace(&self, employees: Vec<Employee>) -> Result<Vec<Employee>> {
        let employees = employees
            .into_iter()
            .map(|employee| {
                let name = employee.name.trim();
                if name.is_empty() {
                    return Err(AppError::InvalidInput(format!(
                        "employee {} has an empty name",
                        employee.id
                    )));
                }
                Ok(Employee {
                    name: name.to_string(),
                    ..employee
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let store = self.store()?;
        let _guard = write_guard(&self.lock);
        let stored = store.replace_employees(employees)?;
        tracing::info!(count = stored.len(), "employees replaced");
        Ok(stored)
    }
}
