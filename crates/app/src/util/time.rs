use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Utc};

use crate::config::ReportParams;
use crate::error::{AppError, Result};
use crate::reports::ReportPeriod;
use propinas_core::{ReportKind, iso_week_start, month_bounds};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| AppError::InvalidInput(format!("invalid date {value}: {err}")))
}

/// Parses `YYYY-Www`, the value of an HTML week input.
pub fn parse_week(value: &str) -> Result<(i32, u32)> {
    let invalid = || AppError::InvalidInput(format!("invalid week {value}, expected YYYY-Www"));
    let trimmed = value.trim();
    let (year, week) = trimmed
        .split_once("-W")
        .or_else(|| trimmed.split_once("-w"))
        .ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let week = week.parse::<u32>().map_err(|_| invalid())?;
    iso_week_start(year, week).ok_or_else(invalid)?;
    Ok((year, week))
}

/// Parses `YYYY-MM`, the value of an HTML month input.
pub fn parse_month(value: &str) -> Result<(i32, u32)> {
    let invalid = || AppError::InvalidInput(format!("invalid month {value}, expected YYYY-MM"));
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    month_bounds(year, month).ok_or_else(invalid)?;
    Ok((year, month))
}

pub fn parse_report_kind(value: &str) -> Result<ReportKind> {
    match value.trim() {
        "daily" | "day" => Ok(ReportKind::Daily),
        "weekly" | "week" => Ok(ReportKind::Weekly),
        "monthly" | "month" => Ok(ReportKind::Monthly),
        other => Err(AppError::InvalidInput(format!(
            "unsupported report kind {other}"
        ))),
    }
}

pub fn resolve_period(params: &ReportParams) -> Result<ReportPeriod> {
    resolve_period_at(params, today())
}

/// Missing periods default to the day, ISO week or month containing `today`.
pub fn resolve_period_at(params: &ReportParams, today: NaiveDate) -> Result<ReportPeriod> {
    let kind = parse_report_kind(&params.kind)?;
    let period = params
        .period
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let resolved = match (kind, period) {
        (ReportKind::Daily, Some(value)) => ReportPeriod::Day(parse_day(value)?),
        (ReportKind::Daily, None) => ReportPeriod::Day(today),
        (ReportKind::Weekly, Some(value)) => {
            let (year, week) = parse_week(value)?;
            ReportPeriod::Week { year, week }
        }
        (ReportKind::Weekly, None) => {
            let iso = today.iso_week();
            ReportPeriod::Week {
                year: iso.year(),
                week: iso.week(),
            }
        }
        (ReportKind::Monthly, Some(value)) => {
            let (year, month) = parse_month(value)?;
            ReportPeriod::Month { year, month }
        }
        (ReportKind::Monthly, None) => ReportPeriod::Month {
            year: today.year(),
            month: today.month(),
        },
    };
    Ok(resolved)
}
