//! Client commands run against the data file or a remote server.

use std::path::PathBuf;

use propinas_app::{
    Gateway, LocalGateway, RemoteGateway, ReportParams, Result, Session, SessionConfig,
    local_now, render_report, resolve_period, today,
};
use propinas_core::{Employee, NewTicket, format_amount, format_date, weekday_name};

use crate::args::Command;

pub type ClientSession = Session<Box<dyn Gateway>>;

/// Where client commands read and write tickets.
#[derive(Debug, Clone)]
pub enum Target {
    Local(PathBuf),
    Remote(String),
}

pub fn open_session(target: &Target, config: SessionConfig) -> Result<ClientSession> {
    let gateway: Box<dyn Gateway> = match target {
        Target::Local(path) => Box::new(LocalGateway::open(path)?),
        Target::Remote(url) => Box::new(RemoteGateway::new(url)?),
    };
    Session::load(gateway, config)
}

pub fn run(command: Command, target: &Target, config: SessionConfig) -> Result<()> {
    let mut session = open_session(target, config)?;
    match command {
        Command::List => print_tickets(&session),
        Command::Add {
            amount,
            employees,
            date,
            number,
        } => {
            let mut draft = NewTicket::new(amount, date.unwrap_or_else(today), employees);
            if let Some(number) = number {
                draft = draft.with_number(number);
            }
            let ticket = session.add_ticket(draft)?;
            println!(
                "Ticket {} guardado: {} entre {} ({} c/u)",
                ticket.id,
                format_amount(ticket.amount),
                ticket.employees.join(", "),
                format_amount(ticket.tip_per_employee)
            );
        }
        Command::Remove { id } => {
            if session.remove_ticket(id)? {
                println!("Ticket {id} eliminado");
            } else {
                println!("Ticket {id} no existe");
            }
        }
        Command::Totals => print_totals(&session),
        Command::Clear { yes } => {
            let cleared = session.clear_all(yes)?;
            println!("{cleared} tickets eliminados");
        }
        Command::Report { kind, period, out } => {
            let period = resolve_period(&ReportParams { kind, period })?;
            let report = session.report(period)?;
            let document = render_report(&report, local_now());
            match out {
                Some(dir) => {
                    let path = document.write_to(&dir)?;
                    println!("Reporte guardado en {}", path.display());
                }
                None => println!("{}", document.to_text()),
            }
        }
        Command::Employees { set } => {
            if let Some(names) = set {
                let roster = names
                    .into_iter()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .zip(1..)
                    .map(|(name, id)| Employee {
                        id,
                        name,
                        active: true,
                    })
                    .collect();
                session.replace_employees(roster)?;
            }
            for employee in session.employees() {
                let status = if employee.active { "" } else { " (inactivo)" };
                println!("{:>3}  {}{}", employee.id, employee.name, status);
            }
        }
        Command::Serve { .. } | Command::Watch { .. } => {
            return Err(propinas_app::AppError::Message(
                "serve and watch run on the async runtime".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn print_tickets(session: &ClientSession) {
    let groups = session.ledger().grouped_by_date();
    if groups.is_empty() {
        println!("No hay tickets registrados");
        return;
    }
    for group in groups {
        println!(
            "{} {} - {}",
            weekday_name(group.date),
            format_date(group.date),
            format_amount(group.total)
        );
        for ticket in &group.tickets {
            let number = ticket
                .number
                .as_deref()
                .map(|number| format!(" #{number}"))
                .unwrap_or_default();
            println!(
                "  [{}]{} {} - {} ({} c/u) por {}",
                ticket.id,
                number,
                format_amount(ticket.amount),
                ticket.employees.join(", "),
                format_amount(ticket.tip_per_employee),
                ticket.created_by
            );
        }
    }
}

pub fn print_totals(session: &ClientSession) {
    let rows = session.ledger().sorted_totals();
    if rows.is_empty() {
        println!("Sin propinas acumuladas");
        return;
    }
    for row in rows {
        println!("{:<12} {}", row.employee, format_amount(row.amount));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use propinas_app::AppError;
    use propinas_store::Store;

    use super::*;

    fn local_target(dir: &tempfile::TempDir) -> (Target, PathBuf) {
        let path = dir.path().join("data.json");
        (Target::Local(path.clone()), path)
    }

    fn config(user: &str) -> SessionConfig {
        SessionConfig {
            user: user.to_string(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn add_then_remove_through_the_data_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (target, path) = local_target(&dir);

        run(
            Command::Add {
                amount: 100.0,
                employees: vec!["Kike".to_string(), "Pedro".to_string()],
                date: NaiveDate::from_ymd_opt(2024, 3, 15),
                number: Some("A-7".to_string()),
            },
            &target,
            config("Cami"),
        )
        .expect("add");

        let store = Store::open(&path).expect("store");
        let tickets = store.list_tickets().expect("list");
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].number.as_deref(), Some("A-7"));
        assert_eq!(tickets[0].created_by, "Cami");
        assert!((tickets[0].tip_per_employee - 50.0).abs() < 1e-9);

        let session = open_session(&target, config("Cami")).expect("session");
        assert!((session.ledger().total_for("Pedro") - 50.0).abs() < 1e-9);
        print_tickets(&session);
        print_totals(&session);

        run(Command::Remove { id: tickets[0].id }, &target, config("Cami")).expect("remove");
        assert!(store.list_tickets().expect("list").is_empty());
        run(Command::Remove { id: tickets[0].id }, &target, config("Cami"))
            .expect("removing a missing id");
    }

    #[test]
    fn clear_without_confirmation_keeps_tickets() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (target, path) = local_target(&dir);
        run(
            Command::Add {
                amount: 30.0,
                employees: vec!["Sofi".to_string()],
                date: None,
                number: None,
            },
            &target,
            SessionConfig::default(),
        )
        .expect("add");

        let err = run(Command::Clear { yes: false }, &target, SessionConfig::default())
            .expect_err("unconfirmed");
        assert!(matches!(err, AppError::InvalidInput(_)));
        let store = Store::open(&path).expect("store");
        assert_eq!(store.list_tickets().expect("list").len(), 1);

        run(Command::Clear { yes: true }, &target, SessionConfig::default()).expect("clear");
        assert!(store.list_tickets().expect("list").is_empty());
    }

    #[test]
    fn report_writes_document_into_out_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (target, _) = local_target(&dir);
        run(
            Command::Add {
                amount: 12.0,
                employees: vec!["Lulu".to_string()],
                date: NaiveDate::from_ymd_opt(2024, 3, 15),
                number: None,
            },
            &target,
            SessionConfig::default(),
        )
        .expect("add");

        let out = dir.path().join("reportes");
        run(
            Command::Report {
                kind: "daily".to_string(),
                period: Some("2024-03-15".to_string()),
                out: Some(out.clone()),
            },
            &target,
            SessionConfig::default(),
        )
        .expect("report");

        assert!(out.join("Reporte_Diario_-_15_03_2024.txt").is_file());
    }
}
