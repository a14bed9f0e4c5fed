use propinas_core::Employee;

use crate::Store;
use crate::error::Result;

impl Store {
    pub fn list_employees(&self) -> Result<Vec<Employee>> {
        Ok(self.read()?.employees)
    }

    pub fn replace_employees(&self, employees: Vec<Employee>) -> Result<Vec<Employee>> {
        let mut document = self.read()?;
        document.employees = employees;
        self.write(&document)?;
        Ok(document.employees)
    }
}
