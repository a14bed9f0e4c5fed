//! Paginated plain-text rendering of reports.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Result;
use propinas_core::{Report, ReportKind, Ticket, format_amount, format_date};

pub const LINES_PER_PAGE: usize = 48;
pub const PAGE_BREAK: char = '\u{c}';

const TICKET_HEADERS: [&str; 5] = ["Ticket", "Fecha", "Monto", "Empleados", "Propina por Empleado"];
const TOTAL_HEADERS: [&str; 2] = ["Empleado", "Total Propinas"];
// Start the employee summary on a fresh page unless this much room is left.
const SUMMARY_MIN_LINES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub filename: String,
    pub pages: Vec<String>,
}

impl ReportDocument {
    pub fn to_text(&self) -> String {
        self.pages.join(&format!("\n{PAGE_BREAK}"))
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, self.to_text())?;
        Ok(path)
    }
}

/// Title with each whitespace run replaced by `_`, plus an extension.
/// Path separators are replaced too so the name stays a single file.
pub fn export_filename(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 4);
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        name.push(if ch == '/' || ch == '\\' { '_' } else { ch });
    }
    name.push_str(".txt");
    name
}

pub fn render_report(report: &Report, generated_at: NaiveDateTime) -> ReportDocument {
    let mut pager = Pager::default();
    pager.line(report.title.clone());
    pager.line(format!(
        "Generado el: {}",
        generated_at.format("%d/%m/%Y, %H:%M:%S")
    ));
    pager.blank();

    for group in &report.groups {
        let heading = match report.kind {
            ReportKind::Daily => group.label.clone(),
            ReportKind::Weekly | ReportKind::Monthly => {
                format!("{} - {}", group.label, format_amount(group.total))
            }
        };
        pager.ensure(4);
        pager.line(heading);
        pager.table(&ticket_table(&group.tickets));
        pager.blank();
    }

    pager.ensure(SUMMARY_MIN_LINES);
    pager.line("Resumen por Empleado");
    let rows = report
        .totals
        .employees
        .iter()
        .map(|row| vec![row.employee.clone(), format_amount(row.amount)])
        .collect();
    pager.table(&Table {
        headers: &TOTAL_HEADERS,
        rows,
    });
    pager.blank();
    pager.line(format!(
        "Total General: {}",
        format_amount(report.totals.grand_total)
    ));

    ReportDocument {
        title: report.title.clone(),
        filename: export_filename(&report.title),
        pages: pager.finish(),
    }
}

fn ticket_table(tickets: &[Ticket]) -> Table {
    let rows = tickets
        .iter()
        .map(|ticket| {
            vec![
                ticket
                    .number
                    .as_ref()
                    .map(|number| format!("#{number}"))
                    .unwrap_or_else(|| "-".to_string()),
                format_date(ticket.date),
                format_amount(ticket.amount),
                ticket.employees.join(", "),
                format_amount(ticket.tip_per_employee),
            ]
        })
        .collect();
    Table {
        headers: &TICKET_HEADERS,
        rows,
    }
}

struct Table {
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Table {
    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn header_lines(&self, widths: &[usize]) -> [String; 2] {
        let header = format_row(self.headers.iter().copied(), widths);
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-");
        [header, rule]
    }
}

fn format_row<'a, I>(cells: I, widths: &[usize]) -> String
where
    I: Iterator<Item = &'a str>,
{
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[derive(Default)]
struct Pager {
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl Pager {
    fn remaining(&self) -> usize {
        LINES_PER_PAGE.saturating_sub(self.current.len())
    }

    fn line(&mut self, text: impl Into<String>) {
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current.push(text.into());
    }

    fn blank(&mut self) {
        if !self.current.is_empty() && self.remaining() > 0 {
            self.current.push(String::new());
        }
    }

    fn ensure(&mut self, lines: usize) {
        if self.remaining() < lines {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
    }

    /// Header repeats at the top of every page the table spills onto.
    fn table(&mut self, table: &Table) {
        let widths = table.widths();
        let header = table.header_lines(&widths);
        self.ensure(header.len() + 1);
        self.current.extend(header.iter().cloned());
        for row in &table.rows {
            if self.remaining() == 0 {
                self.break_page();
                self.current.extend(header.iter().cloned());
            }
            self.current
                .push(format_row(row.iter().map(String::as_str), &widths));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.break_page();
        self.pages
            .into_iter()
            .map(|lines| lines.join("\n").trim_end().to_string())
            .collect()
    }
}
