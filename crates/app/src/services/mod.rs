mod employees;
mod reports;
mod tickets;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::app::AppConfig;
use crate::error::Result;
use propinas_store::Store;

pub use employees::EmployeesService;
pub use reports::ReportsService;
pub use tickets::TicketsService;

type SharedConfig = Arc<AppConfig>;
type WriteLock = Arc<Mutex<()>>;

/// Service registry for server-side operations on the data file.
#[derive(Clone)]
pub struct AppServices {
    pub tickets: TicketsService,
    pub employees: EmployeesService,
    pub reports: ReportsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        let lock: WriteLock = Arc::default();
        Self {
            tickets: TicketsService::new(shared.clone(), lock.clone()),
            employees: EmployeesService::new(shared.clone(), lock),
            reports: ReportsService::new(shared),
        }
    }
}

fn open_store(config: &SharedConfig) -> Result<Store> {
    Ok(Store::open(&config.data_path)?)
}

/// Serialises read-modify-write cycles within this process. A poisoned lock
/// guards no data, so it is simply reclaimed.
fn write_guard(lock: &WriteLock) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
