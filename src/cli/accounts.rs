//! Account management commands
//!
//! add / rename / remove load the state file, apply one store operation,
//! and save the result; list / code are pure reads.

use colored::Colorize;
use keyfob_core::error::{KeyfobError, StoreError};
use keyfob_core::otp;
use keyfob_core::persist;
use keyfob_core::store::CredentialStore;
use keyfob_core::types::Secret;
use tracing::info;

/// Run the add command
pub fn run_add(name: &str, secret: &str) -> Result<(), KeyfobError> {
    let path = persist::default_store_path()?;
    let mut state = super::load_state_or_empty(&path)?;

    let mut store = CredentialStore::from_accounts(std::mem::take(&mut state.accounts));
    let account = store.add(name, Secret::new(secret))?;
    state.accounts = store.into_accounts();
    persist::save(&path, &state)?;

    let code = otp::totp(&account.secret, None)?;
    info!(account = %account.name, "Account added");
    println!(
        "Added '{}'. Current code: {}",
        account.name,
        code.grouped().bold()
    );
    Ok(())
}

/// Run the rename command
pub fn run_rename(name: &str, new_name: &str, secret: &str) -> Result<(), KeyfobError> {
    let path = persist::default_store_path()?;
    let mut state = super::load_state_or_empty(&path)?;

    let mut store = CredentialStore::from_accounts(std::mem::take(&mut state.accounts));
    let account = store.rename(name, new_name, Secret::new(secret))?;
    state.accounts = store.into_accounts();
    persist::save(&path, &state)?;

    info!(from = %name, to = %account.name, "Account renamed");
    println!("Renamed '{}' to '{}'.", name, account.name);
    Ok(())
}

/// Run the remove command
///
/// Removing an unknown name reports it but is not an error.
pub fn run_remove(name: &str) -> Result<(), KeyfobError> {
    let path = persist::default_store_path()?;
    let mut state = super::load_state_or_empty(&path)?;

    let mut store = CredentialStore::from_accounts(std::mem::take(&mut state.accounts));
    let removed = store.remove(name);
    state.accounts = store.into_accounts();

    if removed {
        persist::save(&path, &state)?;
        info!(account = %name, "Account removed");
        println!("Removed '{}'.", name);
    } else {
        println!("No account named '{}'.", name);
    }
    Ok(())
}

/// Run the list command
///
/// An account whose stored secret no longer decodes is flagged inline
/// rather than failing the whole listing.
pub fn run_list() -> Result<(), KeyfobError> {
    let path = persist::default_store_path()?;
    let state = super::load_state_or_empty(&path)?;
    let store = CredentialStore::from_accounts(state.accounts);

    if store.is_empty() {
        println!("No accounts yet. Add one with 'keyfob add <name> <secret>'.");
        return Ok(());
    }

    for account in store.list() {
        match otp::totp(&account.secret, None) {
            Ok(code) => println!("{}  {}", code.grouped().bold(), account.name),
            Err(_) => println!("{}  {}", "invalid".red(), account.name),
        }
    }
    Ok(())
}

/// Run the code command
///
/// Outputs only the code to stdout for machine-parsable usage.
/// Errors are sent to stderr. No additional formatting or text.
pub fn run_code(name: &str) -> Result<(), KeyfobError> {
    let path = persist::default_store_path()?;
    let state = super::load_state_or_empty(&path)?;
    let store = CredentialStore::from_accounts(state.accounts);

    let account = store.get(name).ok_or_else(|| StoreError::NotFound {
        name: name.to_string(),
    })?;
    let code = otp::totp(&account.secret, None)?;

    println!("{}", code);
    Ok(())
}
