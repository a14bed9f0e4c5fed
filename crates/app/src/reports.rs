use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use propinas_core::{
    DateGroup, EmployeeAmount, Report, ReportKind, ReportTotals, Ticket, TicketGroup,
    display_week_start, format_date, iso_week_start, month_bounds, month_name, week_number,
    weekday_index, weekday_name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl ReportPeriod {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportPeriod::Day(_) => ReportKind::Daily,
            ReportPeriod::Week { .. } => ReportKind::Weekly,
            ReportPeriod::Month { .. } => ReportKind::Monthly,
        }
    }
}

pub fn build_report(tickets: &[Ticket], period: ReportPeriod) -> Result<Report> {
    match period {
        ReportPeriod::Day(day) => daily_report(tickets, day),
        ReportPeriod::Week { year, week } => weekly_report(tickets, year, week),
        ReportPeriod::Month { year, month } => monthly_report(tickets, year, month),
    }
}

pub fn daily_report(tickets: &[Ticket], day: NaiveDate) -> Result<Report> {
    let matched = filter_range(tickets, day, day);
    if matched.is_empty() {
        return Err(AppError::NotFound(format!("no tickets recorded on {day}")));
    }
    let groups = vec![group("Detalle de Tickets".to_string(), matched.clone())];
    Ok(Report {
        kind: ReportKind::Daily,
        title: format!("Reporte Diario - {}", format_date(day)),
        start: day,
        end: day,
        totals: summarize(&matched),
        tickets: matched,
        groups,
    })
}

pub fn weekly_report(tickets: &[Ticket], iso_year: i32, iso_week: u32) -> Result<Report> {
    let invalid = || AppError::InvalidInput(format!("invalid week {iso_year}-W{iso_week:02}"));
    let start = iso_week_start(iso_year, iso_week).ok_or_else(invalid)?;
    let end = start.checked_add_days(Days::new(6)).ok_or_else(invalid)?;
    let matched = filter_range(tickets, start, end);
    if matched.is_empty() {
        return Err(AppError::NotFound(format!(
            "no tickets recorded for week {iso_year}-W{iso_week:02}"
        )));
    }
    // Buckets follow the Domingo..Sábado order of the weekday names.
    let mut days: Vec<NaiveDate> = start.iter_days().take(7).collect();
    days.sort_by_key(|day| weekday_index(*day));
    let groups = days
        .into_iter()
        .filter_map(|day| {
            let day_tickets: Vec<Ticket> = matched
                .iter()
                .filter(|ticket| ticket.date == day)
                .cloned()
                .collect();
            (!day_tickets.is_empty()).then(|| group(weekday_name(day).to_string(), day_tickets))
        })
        .collect();
    Ok(Report {
        kind: ReportKind::Weekly,
        title: format!(
            "Reporte Semanal - {} al {}",
            format_date(start),
            format_date(end)
        ),
        start,
        end,
        totals: summarize(&matched),
        tickets: matched,
        groups,
    })
}

pub fn monthly_report(tickets: &[Ticket], year: i32, month: u32) -> Result<Report> {
    let invalid = || AppError::InvalidInput(format!("invalid month {year}-{month:02}"));
    let (start, end) = month_bounds(year, month).ok_or_else(invalid)?;
    let name = month_name(month).ok_or_else(invalid)?;
    let matched = filter_range(tickets, start, end);
    if matched.is_empty() {
        return Err(AppError::NotFound(format!(
            "no tickets recorded for {year}-{month:02}"
        )));
    }
    let mut by_week: BTreeMap<u32, Vec<Ticket>> = BTreeMap::new();
    for ticket in &matched {
        by_week
            .entry(week_number(ticket.date))
            .or_default()
            .push(ticket.clone());
    }
    let groups = by_week
        .into_iter()
        .map(|(week, week_tickets)| {
            let label = week_label(week, week_tickets[0].date);
            group(label, week_tickets)
        })
        .collect();
    Ok(Report {
        kind: ReportKind::Monthly,
        title: format!("Reporte Mensual - {name} {year}"),
        start,
        end,
        totals: summarize(&matched),
        tickets: matched,
        groups,
    })
}

/// Tickets dated within `[start, end]`, both ends included.
pub fn filter_range(tickets: &[Ticket], start: NaiveDate, end: NaiveDate) -> Vec<Ticket> {
    tickets
        .iter()
        .filter(|ticket| ticket.date >= start && ticket.date <= end)
        .cloned()
        .collect()
}

pub fn summarize(tickets: &[Ticket]) -> ReportTotals {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for ticket in tickets {
        for employee in &ticket.employees {
            *totals.entry(employee.as_str()).or_insert(0.0) += ticket.tip_per_employee;
        }
    }
    let employees = ranked(totals.into_iter());
    let grand_total = employees.iter().map(|row| row.amount).sum();
    ReportTotals {
        employees,
        grand_total,
    }
}

/// Drops zero totals and orders by amount descending, then by name.
pub fn ranked<'a, I>(totals: I) -> Vec<EmployeeAmount>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut rows: Vec<EmployeeAmount> = totals
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(employee, amount)| EmployeeAmount {
            employee: employee.to_string(),
            amount,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.employee.cmp(&b.employee))
    });
    rows
}

/// Most recent date first, tickets in recorded order within a date.
pub fn group_by_date(tickets: &[Ticket]) -> Vec<DateGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Ticket>> = BTreeMap::new();
    for ticket in tickets {
        by_date.entry(ticket.date).or_default().push(ticket.clone());
    }
    by_date
        .into_iter()
        .rev()
        .map(|(date, tickets)| DateGroup {
            date,
            total: tickets.iter().map(|ticket| ticket.amount).sum(),
            tickets,
        })
        .collect()
}

fn group(label: String, tickets: Vec<Ticket>) -> TicketGroup {
    TicketGroup {
        label,
        total: tickets.iter().map(|ticket| ticket.amount).sum(),
        tickets,
    }
}

fn week_label(week: u32, first_date: NaiveDate) -> String {
    let range = display_week_start(first_date).and_then(|start| {
        start
            .checked_add_days(Days::new(6))
            .map(|end| (start, end))
    });
    match range {
        Some((start, end)) => format!(
            "Semana {week} ({} - {})",
            format_date(start),
            format_date(end)
        ),
        None => format!("Semana {week}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propinas_core::split_tip;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
    }

    fn ticket(id: i64, amount: f64, date: &str, employees: &[&str]) -> Ticket {
        Ticket {
            id,
            number: Some(id.to_string()),
            amount,
            date: day(date),
            employees: employees.iter().map(|name| name.to_string()).collect(),
            tip_per_employee: split_tip(amount, employees.len()),
            created_by: "Cami".to_string(),
        }
    }

    fn sample() -> Vec<Ticket> {
        vec![
            ticket(1, 100.0, "2024-03-15", &["Kike", "Pedro"]),
            ticket(2, 30.0, "2024-03-11", &["Cami"]),
            ticket(3, 60.0, "2024-03-17", &["Kike", "Cami", "Sofi"]),
            ticket(4, 25.0, "2024-03-18", &["Juan"]),
            ticket(5, 10.0, "2024-03-10", &["Juan"]),
            ticket(6, 40.0, "2024-03-01", &["Lulu"]),
            ticket(7, 8.0, "2024-03-31", &["Lulu"]),
            ticket(8, 99.0, "2024-04-01", &["Martha"]),
        ]
    }

    #[test]
    fn daily_report_matches_exact_date() {
        let report = daily_report(&sample(), day("2024-03-15")).expect("report");

        assert_eq!(report.kind, ReportKind::Daily);
        assert_eq!(report.title, "Reporte Diario - 15/03/2024");
        assert_eq!(report.tickets.len(), 1);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.totals.grand_total, 100.0);
        let names: Vec<_> = report
            .totals
            .employees
            .iter()
            .map(|row| row.employee.as_str())
            .collect();
        assert_eq!(names, vec!["Kike", "Pedro"]);
    }

    #[test]
    fn daily_report_without_tickets_is_not_found() {
        let err = daily_report(&sample(), day("2024-03-16")).expect_err("empty");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn weekly_report_buckets_by_weekday() {
        let report = weekly_report(&sample(), 2024, 11).expect("report");

        assert_eq!(report.start, day("2024-03-11"));
        assert_eq!(report.end, day("2024-03-17"));
        assert_eq!(report.title, "Reporte Semanal - 11/03/2024 al 17/03/2024");
        let ids: Vec<_> = report.tickets.iter().map(|ticket| ticket.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let labels: Vec<_> = report.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Domingo", "Lunes", "Viernes"]);
        let friday = &report.groups[2];
        assert_eq!(friday.tickets[0].id, 1);
        assert_eq!(friday.total, 100.0);
    }

    #[test]
    fn weekly_report_includes_both_boundaries() {
        let tickets = vec![
            ticket(1, 10.0, "2024-03-10", &["Kike"]),
            ticket(2, 10.0, "2024-03-11", &["Kike"]),
            ticket(3, 10.0, "2024-03-17", &["Kike"]),
            ticket(4, 10.0, "2024-03-18", &["Kike"]),
        ];
        let report = weekly_report(&tickets, 2024, 11).expect("report");
        let ids: Vec<_> = report.tickets.iter().map(|ticket| ticket.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn weekly_report_rejects_invalid_week() {
        let err = weekly_report(&sample(), 2024, 0).expect_err("invalid");
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn monthly_report_covers_whole_month_by_week_number() {
        let report = monthly_report(&sample(), 2024, 3).expect("report");

        assert_eq!(report.title, "Reporte Mensual - Marzo 2024");
        assert_eq!(report.start, day("2024-03-01"));
        assert_eq!(report.end, day("2024-03-31"));
        assert_eq!(report.tickets.len(), 7);
        assert!(report.tickets.iter().all(|ticket| ticket.id != 8));

        let labels: Vec<_> = report.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Semana 9 (26/02/2024 - 03/03/2024)",
                "Semana 11 (11/03/2024 - 17/03/2024)",
                "Semana 12 (18/03/2024 - 24/03/2024)",
                "Semana 14 (01/04/2024 - 07/04/2024)",
            ]
        );
        let week_11: Vec<_> = report.groups[1].tickets.iter().map(|t| t.id).collect();
        assert_eq!(week_11, vec![1, 2, 5]);
    }

    #[test]
    fn monthly_report_rejects_invalid_month() {
        let err = monthly_report(&sample(), 2024, 13).expect_err("invalid");
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn summarize_ranks_and_totals() {
        let totals = summarize(&sample()[..3]);

        let rows: Vec<_> = totals
            .employees
            .iter()
            .map(|row| (row.employee.as_str(), row.amount))
            .collect();
        assert_eq!(rows[0], ("Kike", 70.0));
        assert_eq!(rows[1], ("Cami", 50.0));
        assert_eq!(rows[2], ("Pedro", 50.0));
        assert_eq!(rows[3], ("Sofi", 20.0));
        assert!((totals.grand_total - 190.0).abs() < 1e-9);
    }

    #[test]
    fn group_by_date_lists_recent_first() {
        let groups = group_by_date(&sample()[..4]);
        let dates: Vec<_> = groups.iter().map(|g| g.date).collect();
        assert_eq!(
            dates,
            vec![
                day("2024-03-18"),
                day("2024-03-17"),
                day("2024-03-15"),
                day("2024-03-11")
            ]
        );
        assert_eq!(groups[2].total, 100.0);
    }
}
