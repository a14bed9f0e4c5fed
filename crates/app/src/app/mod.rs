use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::services::AppServices;
use propinas_store::Store;

/// Files needed to serve the ledger.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_path: PathBuf,
}

/// Application state shared by the HTTP server and the CLI.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(data_path: PathBuf) -> Self {
        let config = AppConfig { data_path };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn is_fresh(&self) -> bool {
        !self.config.data_path.exists()
    }

    /// Seeds the data file when it does not exist yet.
    pub fn initialize(&self) -> Result<bool> {
        let store = self.open_store()?;
        store
            .initialize()
            .map_err(|err| AppError::Message(format!("initialize data file: {}", err)))
    }

    pub fn open_store(&self) -> Result<Store> {
        Ok(Store::open(&self.config.data_path)?)
    }
}
