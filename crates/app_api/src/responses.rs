use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub data_path: String,
    pub app_data_dir: String,
    pub tickets: usize,
    pub employees: usize,
}

/// Rendered report ready to be sent as a file download.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub filename: String,
    pub pages: usize,
    pub body: String,
}
