pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod ledger;
pub mod reports;
pub mod services;
pub mod session;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::{ReportParams, SessionConfig, SyncPolicy, default_roster};
pub use error::{ApiError, AppError, Result};
pub use export::{LINES_PER_PAGE, ReportDocument, export_filename, render_report};
pub use gateway::{Gateway, LocalGateway, RemoteGateway};
pub use ledger::{Ledger, prepare_ticket};
pub use reports::{ReportPeriod, build_report};
pub use services::{AppServices, EmployeesService, ReportsService, TicketsService};
pub use session::{Session, SyncOutcome, reconcile};
pub use startup::{AppPaths, ensure_app_data_dir};
pub use util::time::{local_now, parse_report_kind, resolve_period, resolve_period_at, today};
