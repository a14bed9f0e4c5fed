use propinas_app::{Result, local_now, resolve_period};
use propinas_core::{DataDocument, Employee, NewTicket, Report, ReportTotals, Ticket};

use crate::{
    AppContext, ExportResponse, InfoResponse, ReportRequest, SuccessResponse, TicketIdRequest,
};

pub fn data(ctx: &AppContext) -> Result<DataDocument> {
    ctx.app_state.services.tickets.data()
}

pub fn create_ticket(ctx: &AppContext, req: NewTicket) -> Result<Ticket> {
    ctx.app_state.services.tickets.create(req)
}

/// Deleting an unknown id still reports success.
pub fn delete_ticket(ctx: &AppContext, req: TicketIdRequest) -> Result<SuccessResponse> {
    ctx.app_state.services.tickets.delete(req.id)?;
    Ok(SuccessResponse { success: true })
}

pub fn replace_employees(ctx: &AppContext, req: Vec<Employee>) -> Result<Vec<Employee>> {
    ctx.app_state.services.employees.replace(req)
}

pub fn totals(ctx: &AppContext) -> Result<ReportTotals> {
    ctx.app_state.services.tickets.totals()
}

pub fn report(ctx: &AppContext, req: ReportRequest) -> Result<Report> {
    let period = resolve_period(&req.into())?;
    ctx.app_state.services.reports.report(period)
}

pub fn export_report(ctx: &AppContext, req: ReportRequest) -> Result<ExportResponse> {
    let period = resolve_period(&req.into())?;
    let document = ctx.app_state.services.reports.export(period, local_now())?;
    Ok(ExportResponse {
        filename: document.filename.clone(),
        pages: document.pages.len(),
        body: document.to_text(),
    })
}

pub fn info(ctx: &AppContext) -> Result<InfoResponse> {
    let document = data(ctx)?;
    Ok(InfoResponse {
        data_path: ctx.app_state.config.data_path.to_string_lossy().to_string(),
        app_data_dir: ctx.app_data_dir.to_string_lossy().to_string(),
        tickets: document.tickets.len(),
        employees: document.employees.len(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use propinas_app::{AppError, AppState};

    use super::*;

    fn context(dir: &tempfile::TempDir) -> AppContext {
        let state = AppState::new(dir.path().join("data.json"));
        state.initialize().expect("initialize");
        AppContext::new(state)
    }

    #[test]
    fn delete_reports_success_for_missing_ids() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);

        let response = delete_ticket(&ctx, TicketIdRequest { id: 42 }).expect("delete");

        assert!(response.success);
        assert!(data(&ctx).expect("data").tickets.is_empty());
    }

    #[test]
    fn export_uses_report_title_for_filename() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        create_ticket(
            &ctx,
            NewTicket::new(40.0, date, vec!["Rodrigo".to_string(), "Martha".to_string()]),
        )
        .expect("create");

        let export = export_report(
            &ctx,
            ReportRequest {
                kind: "daily".to_string(),
                period: Some("2024-03-15".to_string()),
            },
        )
        .expect("export");

        assert_eq!(export.filename, "Reporte_Diario_-_15_03_2024.txt");
        assert_eq!(export.pages, 1);
        assert!(export.body.contains("Martha"));
    }

    #[test]
    fn report_rejects_malformed_period() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);

        let err = report(
            &ctx,
            ReportRequest {
                kind: "weekly".to_string(),
                period: Some("2024-03".to_string()),
            },
        )
        .expect_err("bad week");

        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn info_reports_paths_and_counts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = context(&dir);

        let info = info(&ctx).expect("info");

        assert!(info.data_path.ends_with("data.json"));
        assert_eq!(info.tickets, 0);
        assert_eq!(info.employees, 4);
    }
}
