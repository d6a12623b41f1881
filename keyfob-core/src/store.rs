//! Credential store
//!
//! Maps account names to their TOTP secrets and enforces the store
//! invariants: names are unique (case-sensitive), never empty, and a
//! secret must generate a code before it is allowed in.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::otp;
use crate::types::{Account, Secret};

/// In-memory account collection
///
/// Backed by a `BTreeMap` so iteration and the persisted form are both
/// ordered by name. Mutations validate before touching the map; a failed
/// `add` or `rename` leaves the store exactly as it was.
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: BTreeMap<String, Secret>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded account mapping
    ///
    /// Entries are taken as-is: the loading side of persistence trusts the
    /// file, and a secret that no longer decodes surfaces per account at
    /// code-generation time instead of failing the whole load.
    pub fn from_accounts(accounts: BTreeMap<String, Secret>) -> Self {
        Self { accounts }
    }

    /// Consume the store, yielding the account mapping for persistence
    pub fn into_accounts(self) -> BTreeMap<String, Secret> {
        self.accounts
    }

    /// Snapshot the account mapping for persistence
    pub fn to_accounts(&self) -> BTreeMap<String, Secret> {
        self.accounts.clone()
    }

    /// Add a new account
    ///
    /// The secret must produce a TOTP code and the name must be non-empty
    /// and unused. On success the stored account is returned.
    pub fn add(&mut self, name: &str, secret: Secret) -> Result<Account, StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        otp::totp(&secret, None)?;

        if self.accounts.contains_key(name) {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            });
        }

        self.accounts.insert(name.to_string(), secret.clone());
        Ok(Account {
            name: name.to_string(),
            secret,
        })
    }

    /// Replace an account's name and secret in one step
    ///
    /// Acts as an atomic edit: either both fields change or neither does.
    /// Renaming an account to its current name is allowed and just swaps
    /// the secret.
    pub fn rename(&mut self, name: &str, new_name: &str, secret: Secret) -> Result<Account, StoreError> {
        if !self.accounts.contains_key(name) {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }

        if new_name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        if new_name != name && self.accounts.contains_key(new_name) {
            return Err(StoreError::DuplicateName {
                name: new_name.to_string(),
            });
        }

        otp::totp(&secret, None)?;

        self.accounts.remove(name);
        self.accounts.insert(new_name.to_string(), secret.clone());
        Ok(Account {
            name: new_name.to_string(),
            secret,
        })
    }

    /// Remove an account, reporting whether it existed
    ///
    /// Removing an unknown name is not an error.
    pub fn remove(&mut self, name: &str) -> bool {
        self.accounts.remove(name).is_some()
    }

    /// Look up one account by name
    pub fn get(&self, name: &str) -> Option<Account> {
        self.accounts.get(name).map(|secret| Account {
            name: name.to_string(),
            secret: secret.clone(),
        })
    }

    /// All accounts in ascending name order
    pub fn list(&self) -> Vec<Account> {
        self.accounts
            .iter()
            .map(|(name, secret)| Account {
                name: name.clone(),
                secret: secret.clone(),
            })
            .collect()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Thread-safe store wrapper
///
/// Shared between the CLI front end and the refresh scheduler. The lock
/// is held only for the duration of a single store operation.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Arc<Mutex<CredentialStore>>);

impl SharedStore {
    /// Wrap a store for shared access
    pub fn new(store: CredentialStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    /// Add a new account
    pub fn add(&self, name: &str, secret: Secret) -> Result<Account, StoreError> {
        self.0.lock().unwrap().add(name, secret)
    }

    /// Replace an account's name and secret in one step
    pub fn rename(&self, name: &str, new_name: &str, secret: Secret) -> Result<Account, StoreError> {
        self.0.lock().unwrap().rename(name, new_name, secret)
    }

    /// Remove an account, reporting whether it existed
    pub fn remove(&self, name: &str) -> bool {
        self.0.lock().unwrap().remove(name)
    }

    /// All accounts in ascending name order
    pub fn list(&self) -> Vec<Account> {
        self.0.lock().unwrap().list()
    }

    /// Snapshot the account mapping for persistence
    pub fn to_accounts(&self) -> BTreeMap<String, Secret> {
        self.0.lock().unwrap().to_accounts()
    }
}
