use serde::Deserialize;

use propinas_app::ReportParams;

#[derive(Debug, Deserialize)]
pub struct TicketIdRequest {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub kind: String,
    pub period: Option<String>,
}

impl From<ReportRequest> for ReportParams {
    fn from(req: ReportRequest) -> Self {
        ReportParams {
            kind: req.kind,
            period: req.period,
        }
    }
}
