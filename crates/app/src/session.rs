//! Client-side view of the shared ledger.
//!
//! Every mutation goes through the gateway first. The local ledger only
//! changes once the gateway has accepted the write, so a failed request
//! leaves the session exactly as it was.

use std::collections::HashSet;

use serde::Serialize;

use propinas_core::{Employee, NewTicket, Report, Ticket};

use crate::config::{SessionConfig, SyncPolicy};
use crate::error::{AppError, Result};
use crate::gateway::Gateway;
use crate::ledger::{Ledger, prepare_ticket};
use crate::reports::{ReportPeriod, build_report};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Remote tickets that were not known locally.
    pub added: usize,
    /// Local tickets dropped because the remote no longer has them.
    pub removed: usize,
    /// Local-only tickets retained under [`SyncPolicy::PreserveLocal`].
    pub kept_local: usize,
}

impl SyncOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Merges `remote` into `ledger` by ticket id and recomputes totals.
pub fn reconcile(ledger: &mut Ledger, remote: Vec<Ticket>, policy: SyncPolicy) -> SyncOutcome {
    let remote_ids: HashSet<i64> = remote.iter().map(|ticket| ticket.id).collect();
    let local_ids: HashSet<i64> = ledger.tickets().iter().map(|ticket| ticket.id).collect();
    let added = remote_ids.difference(&local_ids).count();
    let local_only: Vec<Ticket> = ledger
        .tickets()
        .iter()
        .filter(|ticket| !remote_ids.contains(&ticket.id))
        .cloned()
        .collect();

    let mut outcome = SyncOutcome {
        added,
        ..SyncOutcome::default()
    };
    let mut merged = remote;
    match policy {
        SyncPolicy::ReplaceLocal => outcome.removed = local_only.len(),
        SyncPolicy::PreserveLocal => {
            outcome.kept_local = local_only.len();
            merged.extend(local_only);
        }
    }
    ledger.replace_tickets(merged);
    outcome
}

pub struct Session<G: Gateway> {
    gateway: G,
    ledger: Ledger,
    config: SessionConfig,
    employees: Vec<Employee>,
}

impl<G: Gateway> Session<G> {
    /// Fetches the current document and builds the ledger from it.
    pub fn load(mut gateway: G, config: SessionConfig) -> Result<Self> {
        let document = gateway.fetch().inspect_err(|err| {
            tracing::warn!(error = %err, "failed to load tickets");
        })?;
        let ledger = Ledger::from_tickets(config.roster.iter().cloned(), document.tickets);
        tracing::debug!(tickets = ledger.tickets().len(), "session loaded");
        Ok(Self {
            gateway,
            ledger,
            config,
            employees: document.employees,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Roster as persisted alongside the tickets.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn add_ticket(&mut self, mut draft: NewTicket) -> Result<Ticket> {
        if draft.created_by.trim().is_empty() {
            draft.created_by = self.config.user.clone();
        }
        let prepared = prepare_ticket(draft)?;
        let stored = self.gateway.create_ticket(&prepared).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to save ticket");
        })?;
        self.ledger.insert(stored.clone())?;
        tracing::info!(id = stored.id, amount = stored.amount, "ticket added");
        Ok(stored)
    }

    /// Returns whether the ticket was known locally. Unknown ids are still
    /// deleted remotely and are not an error.
    pub fn remove_ticket(&mut self, id: i64) -> Result<bool> {
        self.gateway.delete_ticket(id).inspect_err(|err| {
            tracing::warn!(id, error = %err, "failed to delete ticket");
        })?;
        let removed = self.ledger.remove_ticket(id).is_some();
        tracing::info!(id, removed, "ticket deleted");
        Ok(removed)
    }

    /// Deletes every ticket. Without `confirmed` nothing happens.
    ///
    /// Tickets are removed one at a time; a failure part way leaves the
    /// already-deleted ones gone both remotely and locally.
    pub fn clear_all(&mut self, confirmed: bool) -> Result<usize> {
        if !confirmed {
            return Err(AppError::InvalidInput(
                "clearing all tickets requires confirmation".to_string(),
            ));
        }
        let ids: Vec<i64> = self.ledger.tickets().iter().map(|ticket| ticket.id).collect();
        let mut cleared = 0;
        for id in ids {
            self.gateway.delete_ticket(id).inspect_err(|err| {
                tracing::warn!(id, error = %err, "failed to clear ticket");
            })?;
            self.ledger.remove_ticket(id);
            cleared += 1;
        }
        self.ledger.clear_all();
        tracing::info!(cleared, "all tickets cleared");
        Ok(cleared)
    }

    pub fn replace_employees(&mut self, employees: Vec<Employee>) -> Result<&[Employee]> {
        let stored = self
            .gateway
            .replace_employees(&employees)
            .inspect_err(|err| {
                tracing::warn!(error = %err, "failed to replace employees");
            })?;
        self.employees = stored;
        Ok(&self.employees)
    }

    pub fn sync(&mut self) -> Result<SyncOutcome> {
        let document = self.gateway.fetch().inspect_err(|err| {
            tracing::warn!(error = %err, "sync failed");
        })?;
        self.employees = document.employees;
        let outcome = reconcile(&mut self.ledger, document.tickets, self.config.sync_policy);
        if !outcome.is_unchanged() {
            tracing::info!(
                added = outcome.added,
                removed = outcome.removed,
                kept_local = outcome.kept_local,
                "tickets synced"
            );
        }
        Ok(outcome)
    }

    pub fn report(&self, period: ReportPeriod) -> Result<Report> {
        build_report(self.ledger.tickets(), period)
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }
}
