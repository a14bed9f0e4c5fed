use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Totals that fall below this after a decrement are treated as rounding drift.
pub const TOTAL_EPSILON: f64 = 0.01;

pub const UNKNOWN_USER: &str = "Unknown";

const WEEKDAY_NAMES: [&str; 7] = [
    "Domingo",
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
];

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub number: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
    pub employees: Vec<String>,
    pub tip_per_employee: f64,
    #[serde(default)]
    pub created_by: String,
}

impl Ticket {
    pub fn includes(&self, employee: &str) -> bool {
        self.employees.iter().any(|name| name == employee)
    }
}

/// Ticket body as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    #[serde(default)]
    pub number: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
    pub employees: Vec<String>,
    #[serde(default)]
    pub tip_per_employee: f64,
    #[serde(default)]
    pub created_by: String,
}

impl NewTicket {
    pub fn new(amount: f64, date: NaiveDate, employees: Vec<String>) -> Self {
        Self {
            number: None,
            amount,
            date,
            tip_per_employee: split_tip(amount, employees.len()),
            employees,
            created_by: String::new(),
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_creator(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    pub fn into_ticket(self, id: i64) -> Ticket {
        Ticket {
            id,
            number: self.number,
            amount: self.amount,
            date: self.date,
            employees: self.employees,
            tip_per_employee: self.tip_per_employee,
            created_by: self.created_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// The whole persisted file: every mutation rewrites it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDocument {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl DataDocument {
    pub fn seeded() -> Self {
        Self {
            tickets: Vec::new(),
            employees: default_employees(),
        }
    }
}

pub fn default_employees() -> Vec<Employee> {
    (1..=4)
        .map(|id| Employee {
            id,
            name: format!("Empleado {id}"),
            active: true,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAmount {
    pub employee: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub employees: Vec<EmployeeAmount>,
    pub grand_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketGroup {
    pub label: String,
    pub total: f64,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub tickets: Vec<Ticket>,
    pub groups: Vec<TicketGroup>,
    pub totals: ReportTotals,
}

/// Tickets sharing a date, as listed on the main screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub total: f64,
    pub tickets: Vec<Ticket>,
}

/// Even share of `amount`; zero when nobody is selected.
pub fn split_tip(amount: f64, employee_count: usize) -> f64 {
    if employee_count == 0 {
        return 0.0;
    }
    amount / employee_count as f64
}

/// Time-based id that stays unique when several tickets land in the same millisecond.
pub fn next_ticket_id<I>(now_ms: i64, existing: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    match existing.into_iter().max() {
        Some(max) if max >= now_ms => max.saturating_add(1),
        _ => now_ms,
    }
}

/// Sunday = 0 … Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[weekday_index(date) as usize]
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = month.checked_sub(1)? as usize;
    MONTH_NAMES.get(index).copied()
}

/// Display week number used by the monthly report.
///
/// Not ISO 8601: elapsed time is measured from January 1st midnight to the
/// date at noon, so every date carries an extra half day before the ceiling.
pub fn week_number(date: NaiveDate) -> u32 {
    let elapsed = date.ordinal0();
    let first_weekday = (weekday_index(date) + 7 - elapsed % 7) % 7;
    let days = f64::from(elapsed) + 0.5 + f64::from(first_weekday) + 1.0;
    (days / 7.0).ceil() as u32
}

/// Monday of `week`, where week 1 is the week containing January 4th.
pub fn iso_week_start(year: i32, week: u32) -> Option<NaiveDate> {
    if !(1..=53).contains(&week) {
        return None;
    }
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    let first_monday =
        jan4.checked_sub_days(Days::new(u64::from(jan4.weekday().num_days_from_monday())))?;
    first_monday.checked_add_days(Days::new(u64::from(week - 1) * 7))
}

pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Start shown next to a monthly bucket: the ticket date moved back to its
/// Sunday and forward one day. A Sunday therefore shows the following Monday.
pub fn display_week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(weekday_index(date))))?
        .checked_add_days(Days::new(1))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}
