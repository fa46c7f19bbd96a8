//! Startup wiring: local database, settings, and the restored registry.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use opcli_session::config::DEFAULT_CMD_PATH;
use opcli_session::{AccountRegistry, SessionConfig};
use rusqlite::Connection;

/// Application name used for the default base directory.
const APP_NAME: &str = "opcli-signin";

const DB_FILE: &str = "opcli.db";

pub struct AppState {
    pub db: Connection,
    pub registry: AccountRegistry,
}

impl AppState {
    /// Open the database under `base_dir` and restore the registry from the
    /// persisted identifiers. `cmd_override` wins over the stored setting.
    pub fn open(base_dir: &Path, cmd_override: Option<PathBuf>) -> Result<Self> {
        std::fs::create_dir_all(base_dir)
            .with_context(|| format!("failed to create {}", base_dir.display()))?;

        let db = opcli_db::open(&base_dir.join(DB_FILE)).context("failed to open database")?;

        let cmd_path = match cmd_override {
            Some(path) => path,
            None => opcli_db::settings::cmd_path(&db)?
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CMD_PATH)),
        };

        let account_ids = opcli_db::accounts::list_account_ids(&db)?;
        log::debug!("restoring {} registered account(s)", account_ids.len());

        let registry = AccountRegistry::new(SessionConfig::new(cmd_path, base_dir), account_ids);
        Ok(Self { db, registry })
    }
}

/// `~/.config/opcli-signin` or the platform equivalent.
pub fn default_base_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
    Ok(config_dir.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_restores_registered_ids() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let state = AppState::open(tmp.path(), None).unwrap();
            assert!(state.registry.is_empty());
            opcli_db::accounts::add_account_id(&state.db, "UUID-1").unwrap();
            opcli_db::settings::set_cmd_path(&state.db, Path::new("/opt/op")).unwrap();
        }

        let state = AppState::open(tmp.path(), None).unwrap();
        assert_eq!(state.registry.account_ids(), ["UUID-1"]);
        assert_eq!(state.registry.config().cmd_path, PathBuf::from("/opt/op"));
        assert_eq!(state.registry.config().base_dir, tmp.path());
    }

    #[test]
    fn test_cmd_override_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::open(tmp.path(), Some(PathBuf::from("/usr/bin/op"))).unwrap();
        assert_eq!(state.registry.config().cmd_path, PathBuf::from("/usr/bin/op"));
    }

    #[test]
    fn test_default_cmd_path() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::open(tmp.path(), None).unwrap();
        assert_eq!(state.registry.config().cmd_path, PathBuf::from("op"));
    }
}
