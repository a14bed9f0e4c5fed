use std::net::IpAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "propinas", author, version, about = "Shared tip ledger for a small team")]
pub struct Cli {
    /// Data file to use instead of the configured one.
    #[arg(long, global = true, env = "PROPINAS_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Base URL of a running server, e.g. http://192.168.1.20:3000.
    #[arg(long, global = true, env = "PROPINAS_REMOTE")]
    pub remote: Option<String>,

    /// Name recorded as the creator of new tickets.
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Port to serve on for this run, overriding the configured one.
    #[arg(long, global = true, env = "PORT")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the JSON API over HTTP (default).
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
    },
    /// List tickets grouped by date, most recent first.
    List,
    /// Record a ticket split between the given employees.
    Add {
        amount: f64,
        #[arg(short, long, value_delimiter = ',', required = true)]
        employees: Vec<String>,
        /// Ticket date as YYYY-MM-DD; defaults to today.
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        number: Option<String>,
    },
    /// Delete a ticket by id.
    Remove { id: i64 },
    /// Accumulated tips per employee.
    Totals,
    /// Delete every ticket.
    Clear {
        /// Required; nothing is deleted without it.
        #[arg(long)]
        yes: bool,
    },
    /// Print or save a daily, weekly or monthly report.
    Report {
        kind: String,
        /// YYYY-MM-DD, YYYY-Www or YYYY-MM depending on the kind.
        period: Option<String>,
        /// Write the paginated document into this directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the persisted roster, or replace it with --set.
    Employees {
        #[arg(long, value_delimiter = ',')]
        set: Option<Vec<String>>,
    },
    /// Poll for changes and print totals whenever they move.
    Watch {
        /// Seconds between polls; defaults to the configured interval.
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve {
            host: IpAddr::from([0, 0, 0, 0]),
        }
    }
}
