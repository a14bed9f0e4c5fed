use serde::{Deserialize, Serialize};

use propinas_core::UNKNOWN_USER;

pub const DEFAULT_ROSTER: [&str; 9] = [
    "Kike", "Pedro", "Cami", "Toño", "Juan", "Sofi", "Rodrigo", "Martha", "Lulu",
];

pub fn default_roster() -> Vec<String> {
    DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect()
}

/// What a sync does with tickets that exist locally but not on the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Adopt the server list as-is.
    #[default]
    ReplaceLocal,
    /// Keep local-only tickets alongside the server list.
    PreserveLocal,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    pub roster: Vec<String>,
    pub user: String,
    pub sync_policy: SyncPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            user: UNKNOWN_USER.to_string(),
            sync_policy: SyncPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReportParams {
    pub kind: String,
    pub period: Option<String>,
}
