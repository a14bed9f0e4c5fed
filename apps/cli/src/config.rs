use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use propinas_app::{SyncPolicy, default_roster};
use propinas_core::UNKNOWN_USER;

use crate::dirs;

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    /// Defaults to `data.json` in the XDG data dir.
    pub data_file: Option<String>,
    pub roster: Vec<String>,
    pub user: String,
    /// When set, client commands talk to this server instead of the file.
    pub remote_url: Option<String>,
    pub poll_interval_secs: u64,
    pub sync_policy: SyncPolicy,
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_file: None,
            roster: default_roster(),
            user: UNKNOWN_USER.to_string(),
            remote_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            sync_policy: SyncPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub paths: ConfigPaths,
    pub created: bool,
}

pub fn load_or_create() -> Result<ConfigLoad, String> {
    load_or_create_in(&dirs::config_dir()?)
}

pub fn load_or_create_in(dir: &Path) -> Result<ConfigLoad, String> {
    fs::create_dir_all(dir)
        .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    let paths = ConfigPaths {
        file: dir.join(CONFIG_FILE_NAME),
    };

    if paths.file.exists() {
        let contents = fs::read_to_string(&paths.file)
            .map_err(|err| format!("read config {}: {}", paths.file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", paths.file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            paths,
            created: false,
        });
    }

    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&paths.file, contents)
        .map_err(|err| format!("write config {}: {}", paths.file.display(), err))?;

    Ok(ConfigLoad {
        config,
        paths,
        created: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");

        let first = load_or_create_in(dir.path()).expect("create");
        assert!(first.created);
        assert_eq!(first.config.port, 3000);
        assert_eq!(first.config.roster.len(), 9);

        let second = load_or_create_in(dir.path()).expect("load");
        assert!(!second.created);
        assert_eq!(second.config.poll_interval_secs, 30);
        assert_eq!(second.config.user, "Unknown");
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "port = 8080\nuser = \"Cami\"\nsync_policy = \"preserve_local\"\n",
        )
        .expect("write");

        let loaded = load_or_create_in(dir.path()).expect("load");

        assert_eq!(loaded.config.port, 8080);
        assert_eq!(loaded.config.user, "Cami");
        assert_eq!(loaded.config.sync_policy, SyncPolicy::PreserveLocal);
        assert_eq!(loaded.config.log_level, "info");
        assert!(loaded.config.remote_url.is_none());
    }
}
