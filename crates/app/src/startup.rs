use std::path::PathBuf;

use crate::Result;

pub const DATA_FILE_NAME: &str = "data.json";

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub data_path: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let data_path = app_data_dir.join(DATA_FILE_NAME);
        Self {
            app_data_dir,
            data_path,
        }
    }

    /// Uses an explicit data file, keeping its directory as the data dir.
    pub fn with_data_file(data_path: PathBuf) -> Self {
        let app_data_dir = data_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        Self {
            app_data_dir,
            data_path,
        }
    }
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    if !paths.app_data_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&paths.app_data_dir)?;
    }
    Ok(())
}
