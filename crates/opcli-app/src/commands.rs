//! Subcommand handlers.

use std::path::Path;

use anyhow::{Context, Result};
use opcli_session::AccountInfo;

use crate::prompt;
use crate::state::AppState;

/// Accounts the credential manager knows about, marking the ones registered
/// here.
pub fn list_accounts(state: &AppState) -> Result<()> {
    let accounts = state.registry.list_known_accounts();
    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }
    for account in &accounts {
        let marker = if state.registry.find(&account.id).is_some() {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}  {}  {}  {}",
            account.id, account.email, account.url, account.account_key
        );
    }
    Ok(())
}

pub fn list_registered(state: &AppState) -> Result<()> {
    let accounts = opcli_db::accounts::list_accounts(&state.db)?;
    if accounts.is_empty() {
        println!("No accounts registered.");
        return Ok(());
    }
    for account in &accounts {
        println!("{}  (registered {})", account.id, account.created_at);
    }
    Ok(())
}

pub async fn add_account(
    state: &mut AppState,
    url: String,
    email: String,
    account_key: String,
) -> Result<()> {
    let info = AccountInfo {
        id: String::new(),
        url,
        email,
        account_key,
    };
    let password = prompt::read_password(&info.email)?;
    let two_factor = prompt::terminal_two_factor();

    let driver = match state
        .registry
        .add_account(&info, &password, two_factor.callback())
        .await
    {
        Ok(driver) => driver,
        Err(e) => {
            if e.is_unauthorized() {
                eprintln!("Sign-in rejected. Check the password and two-factor code.");
            }
            return Err(e).with_context(|| format!("failed to sign in {}", info.email));
        }
    };

    let id = driver.id().to_string();
    let expiry = driver.session_expiry();

    opcli_db::accounts::add_account_id(&state.db, &id)?;

    println!("Signed in {} as {id}", info.email);
    if let Some(expiry) = expiry {
        println!("Session valid until {}", expiry.to_rfc3339());
    }
    Ok(())
}

pub fn remove_account(state: &mut AppState, id: &str) -> Result<()> {
    let removed = state.registry.remove_account(id);
    let deleted = opcli_db::accounts::delete_account_id(&state.db, id)?;
    if removed == 0 && !deleted {
        println!("No account registered as {id}.");
    } else {
        println!("Removed {id}.");
    }
    Ok(())
}

pub fn set_op(state: &AppState, path: &Path) -> Result<()> {
    opcli_db::settings::set_cmd_path(&state.db, path)?;
    println!("Using {} from now on.", path.display());
    Ok(())
}
