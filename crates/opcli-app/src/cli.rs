//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "opcli-signin", version, about = "Sign in to credential-manager accounts without typing at its prompts")]
pub struct Cli {
    /// Directory holding the local database and the credential manager's config
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Credential-manager binary to run for this invocation
    #[arg(long = "op", global = true, value_name = "PATH")]
    pub op: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List accounts known to the credential manager
    Accounts,
    /// List account identifiers registered here
    Registered,
    /// Sign in to an account and register it
    Add {
        #[arg(long)]
        url: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        account_key: String,
    },
    /// Forget a registered account
    Remove { id: String },
    /// Remember which credential-manager binary to run
    SetOp { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "opcli-signin",
            "add",
            "--url",
            "my.example.com",
            "--email",
            "alice@example.com",
            "--account-key",
            "A3-AAAAAA",
        ])
        .unwrap();

        assert!(cli.base_dir.is_none());
        match cli.command {
            Command::Add { url, email, account_key } => {
                assert_eq!(url, "my.example.com");
                assert_eq!(email, "alice@example.com");
                assert_eq!(account_key, "A3-AAAAAA");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "opcli-signin",
            "remove",
            "UUID-1",
            "--base-dir",
            "/tmp/opcli",
            "--op",
            "/usr/local/bin/op",
        ])
        .unwrap();

        assert_eq!(cli.base_dir, Some(PathBuf::from("/tmp/opcli")));
        assert_eq!(cli.op, Some(PathBuf::from("/usr/local/bin/op")));
        assert!(matches!(cli.command, Command::Remove { ref id } if id == "UUID-1"));
    }

    #[test]
    fn test_add_requires_account_key() {
        let err = Cli::try_parse_from([
            "opcli-signin",
            "add",
            "--url",
            "my.example.com",
            "--email",
            "alice@example.com",
        ]);
        assert!(err.is_err());
    }
}
