//! Read-only view of the credential manager's own account directory.
//!
//! The CLI keeps a JSON record of every account it has signed in to. We
//! never write it; it is only consulted to enumerate known accounts and to
//! resolve the canonical user identifier behind an account key.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading the account directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read account directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse account directory: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An account as exposed to callers: identifier, sign-in address, email and
/// account key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub url: String,
    pub email: String,
    pub account_key: String,
}

/// On-disk layout of the directory file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountDirectory {
    #[serde(default)]
    pub latest_signin: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub accounts: Vec<DirectoryAccount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryAccount {
    #[serde(default)]
    pub shorthand: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "accountKey")]
    pub account_key: String,
    #[serde(default, rename = "userUUID")]
    pub user_uuid: String,
}

impl AccountDirectory {
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DirectoryError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Every recorded account, in file order.
    pub fn account_infos(&self) -> Vec<AccountInfo> {
        self.accounts.iter().map(DirectoryAccount::to_info).collect()
    }

    /// First account whose key matches `account_key`.
    pub fn find_by_key(&self, account_key: &str) -> Option<&DirectoryAccount> {
        self.accounts.iter().find(|a| a.account_key == account_key)
    }
}

impl DirectoryAccount {
    pub fn to_info(&self) -> AccountInfo {
        AccountInfo {
            id: self.user_uuid.clone(),
            url: self.url.clone(),
            email: self.email.clone(),
            account_key: self.account_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "latest_signin": "my",
        "device": "dev0123",
        "accounts": [
            {
                "shorthand": "my",
                "url": "my.example.com",
                "email": "alice@example.com",
                "accountKey": "A3-AAAAAA",
                "userUUID": "UUID-ALICE",
                "dsecret": "ignored"
            },
            {
                "shorthand": "work",
                "url": "work.example.com",
                "email": "alice@work.example.com",
                "accountKey": "A3-BBBBBB",
                "userUUID": "UUID-WORK"
            }
        ]
    }"#;

    #[test]
    fn test_parse_directory() {
        let dir = AccountDirectory::parse(SAMPLE).unwrap();
        assert_eq!(dir.latest_signin, "my");
        assert_eq!(dir.device, "dev0123");
        assert_eq!(dir.accounts.len(), 2);
        assert_eq!(dir.accounts[1].shorthand, "work");
    }

    #[test]
    fn test_account_infos_map_user_uuid_to_id() {
        let dir = AccountDirectory::parse(SAMPLE).unwrap();
        let infos = dir.account_infos();
        assert_eq!(
            infos[0],
            AccountInfo {
                id: "UUID-ALICE".to_string(),
                url: "my.example.com".to_string(),
                email: "alice@example.com".to_string(),
                account_key: "A3-AAAAAA".to_string(),
            }
        );
        assert_eq!(infos[1].id, "UUID-WORK");
    }

    #[test]
    fn test_find_by_key() {
        let dir = AccountDirectory::parse(SAMPLE).unwrap();
        assert_eq!(dir.find_by_key("A3-BBBBBB").unwrap().user_uuid, "UUID-WORK");
        assert!(dir.find_by_key("A3-ZZZZZZ").is_none());
    }

    #[test]
    fn test_missing_accounts_field() {
        let dir = AccountDirectory::parse(r#"{"device": "d"}"#).unwrap();
        assert!(dir.accounts.is_empty());
        assert!(dir.account_infos().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = AccountDirectory::load(&tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, DirectoryError::Io(_)));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = AccountDirectory::parse("not json").unwrap_err();
        assert!(matches!(err, DirectoryError::Parse(_)));
    }
}
