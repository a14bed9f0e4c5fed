use chrono::NaiveDateTime;
use propinas_core::Report;
use propinas_store::Store;

use crate::error::Result;
use crate::export::{ReportDocument, render_report};
use crate::reports::{ReportPeriod, build_report};
use crate::services::{SharedConfig, open_store};

#[derive(Clone)]
pub struct ReportsService {
    config: SharedConfig,
}

impl ReportsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn store(&self) -> Result<Store> {
        open_store(&self.config)
    }

    pub fn report(&self, period: ReportPeriod) -> Result<Report> {
        let tickets = self.store()?.list_tickets()?;
        build_report(&tickets, period)
    }

    pub fn export(&self, period: ReportPeriod, generated_at: NaiveDateTime) -> Result<ReportDocument> {
        let report = self.report(period)?;
        let document = render_report(&report, generated_at);
        tracing::debug!(
            filename = %document.filename,
            pages = document.pages.len(),
            "report exported"
        );
        Ok(document)
    }
}
