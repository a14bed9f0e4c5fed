#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use propinas_core::{NewTicket, split_tip};
use propinas_store::Store;
use tempfile::TempDir;

pub struct TestStore {
    pub _dir: TempDir,
    pub store: Store,
    pub path: PathBuf,
}

pub fn setup_store() -> TestStore {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("data.json");
    let store = Store::open(&path).expect("open store");
    store.initialize().expect("initialize store");
    TestStore {
        _dir: dir,
        store,
        path,
    }
}

pub fn make_ticket(amount: f64, date: &str, employees: &[&str]) -> NewTicket {
    NewTicket {
        number: None,
        amount,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date"),
        employees: employees.iter().map(|name| name.to_string()).collect(),
        tip_per_employee: split_tip(amount, employees.len()),
        created_by: "Cami".to_string(),
    }
}
