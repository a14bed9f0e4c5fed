//! Tickets plus the per-employee totals derived from them.

use std::collections::BTreeMap;

use propinas_core::{
    DateGroup, EmployeeAmount, NewTicket, TOTAL_EPSILON, Ticket, UNKNOWN_USER, next_ticket_id,
    split_tip,
};

use crate::error::{AppError, Result};
use crate::reports;
use crate::util::time::now_millis;

/// Validates a submitted ticket and fills in the derived fields.
///
/// Blank employee names are dropped and repeated names count once. The tip is
/// always recomputed from the amount, whatever the caller sent.
pub fn prepare_ticket(ticket: NewTicket) -> Result<NewTicket> {
    if !ticket.amount.is_finite() || ticket.amount <= 0.0 {
        return Err(AppError::InvalidInput(
            "amount must be a positive number".to_string(),
        ));
    }
    let mut employees: Vec<String> = Vec::with_capacity(ticket.employees.len());
    for name in ticket.employees {
        let name = name.trim();
        if !name.is_empty() && !employees.iter().any(|existing| existing == name) {
            employees.push(name.to_string());
        }
    }
    if employees.is_empty() {
        return Err(AppError::InvalidInput(
            "select at least one employee".to_string(),
        ));
    }
    let number = ticket
        .number
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let created_by = match ticket.created_by.trim() {
        "" => UNKNOWN_USER.to_string(),
        value => value.to_string(),
    };
    Ok(NewTicket {
        number,
        amount: ticket.amount,
        date: ticket.date,
        tip_per_employee: split_tip(ticket.amount, employees.len()),
        employees,
        created_by,
    })
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    roster: Vec<String>,
    tickets: Vec<Ticket>,
    totals: BTreeMap<String, f64>,
}

impl Ledger {
    pub fn new<I, S>(roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roster: Vec<String> = roster.into_iter().map(Into::into).collect();
        let totals = fold_totals(&roster, &[]);
        Self {
            roster,
            tickets: Vec::new(),
            totals,
        }
    }

    pub fn from_tickets<I, S>(roster: I, tickets: Vec<Ticket>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ledger = Self::new(roster);
        ledger.replace_tickets(tickets);
        ledger
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn ticket(&self, id: i64) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| ticket.id == id)
    }

    pub fn totals(&self) -> &BTreeMap<String, f64> {
        &self.totals
    }

    pub fn total_for(&self, employee: &str) -> f64 {
        self.totals.get(employee).copied().unwrap_or(0.0)
    }

    /// Non-zero totals, largest first.
    pub fn sorted_totals(&self) -> Vec<EmployeeAmount> {
        reports::ranked(self.totals.iter().map(|(name, amount)| (name.as_str(), *amount)))
    }

    pub fn grouped_by_date(&self) -> Vec<DateGroup> {
        reports::group_by_date(&self.tickets)
    }

    /// Validates, assigns a time-based id and records the ticket.
    pub fn add_ticket(&mut self, ticket: NewTicket) -> Result<Ticket> {
        let prepared = prepare_ticket(ticket)?;
        let id = next_ticket_id(now_millis(), self.tickets.iter().map(|ticket| ticket.id));
        let ticket = prepared.into_ticket(id);
        self.apply(ticket.clone());
        Ok(ticket)
    }

    /// Records a ticket that already carries an id, e.g. one returned by the server.
    pub fn insert(&mut self, ticket: Ticket) -> Result<()> {
        if self.ticket(ticket.id).is_some() {
            return Err(AppError::InvalidInput(format!(
                "ticket {} already recorded",
                ticket.id
            )));
        }
        if ticket.employees.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "ticket {} has no employees",
                ticket.id
            )));
        }
        self.apply(ticket);
        Ok(())
    }

    /// Returns the removed ticket, or `None` when no ticket has `id`.
    pub fn remove_ticket(&mut self, id: i64) -> Option<Ticket> {
        let index = self.tickets.iter().position(|ticket| ticket.id == id)?;
        let ticket = self.tickets.remove(index);
        for employee in &ticket.employees {
            let total = self.totals.entry(employee.clone()).or_insert(0.0);
            *total -= ticket.tip_per_employee;
            if *total < TOTAL_EPSILON {
                *total = 0.0;
            }
        }
        Some(ticket)
    }

    pub fn recompute(&mut self) {
        self.totals = fold_totals(&self.roster, &self.tickets);
    }

    pub fn clear_all(&mut self) {
        self.tickets.clear();
        self.recompute();
    }

    pub fn replace_tickets(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.recompute();
    }

    fn apply(&mut self, ticket: Ticket) {
        for employee in &ticket.employees {
            *self.totals.entry(employee.clone()).or_insert(0.0) += ticket.tip_per_employee;
        }
        self.tickets.push(ticket);
    }
}

fn fold_totals(roster: &[String], tickets: &[Ticket]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> =
        roster.iter().map(|name| (name.clone(), 0.0)).collect();
    for ticket in tickets {
        for employee in &ticket.employees {
            *totals.entry(employee.clone()).or_insert(0.0) += ticket.tip_per_employee;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::default_roster;

    fn draft(amount: f64, date: &str, employees: &[&str]) -> NewTicket {
        NewTicket::new(
            amount,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date"),
            employees.iter().map(|name| name.to_string()).collect(),
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_ledger_has_zero_entry_per_roster_name() {
        let ledger = Ledger::new(default_roster());
        assert_eq!(ledger.totals().len(), 9);
        assert!(ledger.totals().values().all(|total| *total == 0.0));
        assert!(ledger.sorted_totals().is_empty());
    }

    #[test]
    fn add_splits_amount_evenly() {
        let mut ledger = Ledger::new(default_roster());
        let ticket = ledger
            .add_ticket(draft(100.0, "2024-03-15", &["Kike", "Pedro"]))
            .expect("add");

        assert_close(ticket.tip_per_employee, 50.0);
        assert_close(ledger.total_for("Kike"), 50.0);
        assert_close(ledger.total_for("Pedro"), 50.0);
        assert_close(ledger.total_for("Cami"), 0.0);
        assert_eq!(ticket.created_by, UNKNOWN_USER);
    }

    #[test]
    fn uneven_split_keeps_product_equal_to_amount() {
        let mut ledger = Ledger::new(default_roster());
        let ticket = ledger
            .add_ticket(draft(100.0, "2024-03-15", &["Kike", "Pedro", "Cami"]))
            .expect("add");

        assert_close(ticket.tip_per_employee * ticket.employees.len() as f64, 100.0);
        assert_close(ledger.total_for("Cami"), ticket.tip_per_employee);
    }

    #[test]
    fn add_rejects_invalid_input_without_side_effects() {
        let mut ledger = Ledger::new(default_roster());

        for bad in [
            draft(0.0, "2024-03-15", &["Kike"]),
            draft(-5.0, "2024-03-15", &["Kike"]),
            draft(f64::NAN, "2024-03-15", &["Kike"]),
            draft(10.0, "2024-03-15", &[]),
            draft(10.0, "2024-03-15", &["  "]),
        ] {
            let err = ledger.add_ticket(bad).expect_err("invalid");
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
        assert!(ledger.tickets().is_empty());
        assert!(ledger.totals().values().all(|total| *total == 0.0));
    }

    #[test]
    fn duplicate_employees_count_once() {
        let prepared = prepare_ticket(
            draft(90.0, "2024-03-15", &["Kike", "Kike ", "Sofi"])
                .with_number("  ")
                .with_creator("Sofi"),
        )
        .expect("prepare");

        assert_eq!(prepared.employees, vec!["Kike", "Sofi"]);
        assert_close(prepared.tip_per_employee, 45.0);
        assert_eq!(prepared.number, None);
        assert_eq!(prepared.created_by, "Sofi");
    }

    #[test]
    fn add_then_remove_restores_totals() {
        let mut ledger = Ledger::new(default_roster());
        ledger
            .add_ticket(draft(37.5, "2024-03-14", &["Kike", "Juan"]))
            .expect("first");
        let before = ledger.totals().clone();

        let ticket = ledger
            .add_ticket(draft(100.0, "2024-03-15", &["Kike", "Pedro", "Juan"]))
            .expect("second");
        let removed = ledger.remove_ticket(ticket.id).expect("removed");

        assert_eq!(removed.id, ticket.id);
        for (name, total) in &before {
            assert_close(ledger.total_for(name), *total);
        }
        assert_eq!(ledger.tickets().len(), 1);
    }

    #[test]
    fn add_then_remove_leaves_empty_ledger() {
        let mut ledger = Ledger::new(default_roster());
        let ticket = ledger
            .add_ticket(draft(100.0, "2024-03-15", &["Kike", "Pedro"]))
            .expect("add");

        ledger.remove_ticket(ticket.id).expect("removed");

        assert_eq!(ledger.total_for("Kike"), 0.0);
        assert_eq!(ledger.total_for("Pedro"), 0.0);
        assert!(ledger.tickets().is_empty());
    }

    #[test]
    fn remove_floors_rounding_drift() {
        let mut ledger = Ledger::new(default_roster());
        let ids: Vec<i64> = [0.1, 0.2, 0.3]
            .into_iter()
            .map(|amount| {
                ledger
                    .add_ticket(draft(amount * 3.0, "2024-03-15", &["Kike", "Pedro", "Cami"]))
                    .expect("add")
                    .id
            })
            .collect();

        for id in ids {
            ledger.remove_ticket(id).expect("removed");
        }

        assert!(ledger.totals().values().all(|total| *total == 0.0));
    }

    #[test]
    fn remove_missing_id_changes_nothing() {
        let mut ledger = Ledger::new(default_roster());
        ledger
            .add_ticket(draft(20.0, "2024-03-15", &["Lulu"]))
            .expect("add");
        let tickets = ledger.tickets().to_vec();
        let totals = ledger.totals().clone();

        assert!(ledger.remove_ticket(12345).is_none());
        assert_eq!(ledger.tickets(), tickets.as_slice());
        assert_eq!(ledger.totals(), &totals);
    }

    #[test]
    fn recompute_matches_fold_after_mixed_operations() {
        let mut ledger = Ledger::new(default_roster());
        let mut ids = Vec::new();
        for (index, amount) in [12.0, 45.5, 7.25, 100.0, 3.3, 64.0].into_iter().enumerate() {
            let crew: &[&str] = match index % 3 {
                0 => &["Kike", "Pedro"],
                1 => &["Cami", "Kike", "Rodrigo"],
                _ => &["Martha"],
            };
            ids.push(
                ledger
                    .add_ticket(draft(amount, "2024-03-15", crew))
                    .expect("add")
                    .id,
            );
        }
        ledger.remove_ticket(ids[1]).expect("remove");
        ledger.remove_ticket(ids[4]).expect("remove");
        let incremental = ledger.totals().clone();

        ledger.recompute();

        let expected = fold_totals(ledger.roster(), ledger.tickets());
        for (name, total) in &expected {
            assert_close(ledger.total_for(name), *total);
            assert_close(incremental[name], *total);
        }
    }

    #[test]
    fn insert_keeps_server_ids_and_rejects_duplicates() {
        let mut ledger = Ledger::new(default_roster());
        let ticket = prepare_ticket(draft(10.0, "2024-03-15", &["Juan"]))
            .expect("prepare")
            .into_ticket(77);

        ledger.insert(ticket.clone()).expect("insert");
        assert!(ledger.insert(ticket).is_err());
        assert_close(ledger.total_for("Juan"), 10.0);
        assert_eq!(ledger.ticket(77).map(|t| t.id), Some(77));
    }

    #[test]
    fn unknown_employee_gets_an_entry() {
        let mut ledger = Ledger::new(default_roster());
        ledger
            .add_ticket(draft(10.0, "2024-03-15", &["Invitado"]))
            .expect("add");
        assert_close(ledger.total_for("Invitado"), 10.0);
    }

    #[test]
    fn clear_all_zeroes_every_total() {
        let mut ledger = Ledger::new(default_roster());
        ledger
            .add_ticket(draft(10.0, "2024-03-15", &["Invitado", "Kike"]))
            .expect("add");

        ledger.clear_all();

        assert!(ledger.tickets().is_empty());
        assert!(ledger.totals().values().all(|total| *total == 0.0));
        assert!(ledger.totals().contains_key("Kike"));
    }

    #[test]
    fn sorted_totals_rank_descending() {
        let mut ledger = Ledger::new(default_roster());
        ledger
            .add_ticket(draft(30.0, "2024-03-15", &["Sofi"]))
            .expect("add");
        ledger
            .add_ticket(draft(40.0, "2024-03-15", &["Juan", "Kike"]))
            .expect("add");

        let ranked = ledger.sorted_totals();
        let names: Vec<_> = ranked.iter().map(|row| row.employee.as_str()).collect();
        assert_eq!(names, vec!["Sofi", "Juan", "Kike"]);
    }
}
