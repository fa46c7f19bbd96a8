use std::future::Future;
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::directory::{AccountDirectory, AccountInfo};
use crate::error::SessionError;
use crate::session::SessionDriver;

/// The accounts this application has signed in to.
///
/// Holds one [`SessionDriver`] per account alongside the ordered identifier
/// list that gets persisted; the two only change together. Mutation takes
/// `&mut self`, so callers sharing a registry must serialize access (the
/// credential manager's directory is not safe for concurrent sign-ins
/// either).
pub struct AccountRegistry {
    config: Arc<SessionConfig>,
    account_ids: Vec<String>,
    drivers: Vec<SessionDriver>,
}

impl AccountRegistry {
    /// Restore a registry from persisted identifiers.
    ///
    /// Each identifier gets an unauthenticated driver; session tokens are not
    /// persisted, so every restored account has to sign in again.
    pub fn new(config: SessionConfig, account_ids: Vec<String>) -> Self {
        let config = Arc::new(config);
        let drivers = account_ids
            .iter()
            .map(|id| SessionDriver::new(Arc::clone(&config), id.clone()))
            .collect();
        Self {
            config,
            account_ids,
            drivers,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn account_ids(&self) -> &[String] {
        &self.account_ids
    }

    /// First driver registered under `id`.
    pub fn find(&self, id: &str) -> Option<&SessionDriver> {
        self.drivers.iter().find(|d| d.id() == id)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Accounts recorded in the credential manager's directory.
    ///
    /// A directory that is missing or unreadable just means no account has
    /// been set up yet, so this returns an empty list instead of an error.
    pub fn list_known_accounts(&self) -> Vec<AccountInfo> {
        match AccountDirectory::load(&self.config.op_config_path()) {
            Ok(directory) => directory.account_infos(),
            Err(e) => {
                log::debug!("no account directory available: {e}");
                Vec::new()
            }
        }
    }

    /// Canonical user identifier for `account_key`.
    ///
    /// Unlike [`list_known_accounts`](Self::list_known_accounts), a directory
    /// that cannot be read is an error here.
    pub fn resolve_identifier(&self, account_key: &str) -> Result<String, SessionError> {
        let directory = AccountDirectory::load(&self.config.op_config_path())?;
        directory
            .find_by_key(account_key)
            .map(|account| account.user_uuid.clone())
            .ok_or_else(|| SessionError::NotFound(account_key.to_string()))
    }

    /// Sign in to a new account and register it.
    ///
    /// On any failure, whether sign-in itself or resolving the identifier
    /// afterwards, the registry is left as it was.
    pub async fn add_account<F, Fut>(
        &mut self,
        info: &AccountInfo,
        password: &str,
        two_factor: F,
    ) -> Result<&SessionDriver, SessionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = String>,
    {
        let mut driver = SessionDriver::new(Arc::clone(&self.config), "");
        let session = driver.authenticate(info, password, two_factor).await?;
        driver.set_session(session);

        let id = self.resolve_identifier(&info.account_key)?;
        driver.set_id(id.clone());
        log::info!("signed in {} as {id}", info.email);

        self.account_ids.push(id);
        self.drivers.push(driver);
        Ok(&self.drivers[self.drivers.len() - 1])
    }

    /// Remove every entry registered under `id`.
    ///
    /// Returns how many drivers were removed; an unknown `id` is a no-op.
    pub fn remove_account(&mut self, id: &str) -> usize {
        let before = self.drivers.len();
        self.account_ids.retain(|existing| existing != id);
        self.drivers.retain(|driver| driver.id() != id);
        let removed = before - self.drivers.len();
        if removed > 0 {
            log::info!("removed account {id}");
        }
        removed
    }
}
