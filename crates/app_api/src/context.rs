use std::path::PathBuf;

use propinas_app::AppState;

#[derive(Clone)]
pub struct AppContext {
    pub app_state: AppState,
    pub app_data_dir: PathBuf,
}

impl AppContext {
    pub fn new(app_state: AppState) -> Self {
        let app_data_dir = app_state
            .config
            .data_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        Self {
            app_state,
            app_data_dir,
        }
    }
}
