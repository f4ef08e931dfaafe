//! In-memory vault registry and withdrawal ledger.
//!
//! Each vault and its withdrawal history live behind a single async mutex,
//! so every command touching one vault is serialized while commands on
//! different vaults proceed in parallel. A secondary identity -> vault-address
//! index is maintained alongside membership mutations so role lookups never
//! scan the full vault collection.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use shared::{Vault, VaultError, VaultResult, WithdrawalRequest};

/// One vault plus its append-only withdrawal history.
#[derive(Debug)]
pub struct VaultEntry {
    pub vault: Vault,
    pub withdrawals: Vec<WithdrawalRequest>,
}

#[derive(Clone, Default)]
pub struct Store {
    vaults: Arc<DashMap<String, Arc<Mutex<VaultEntry>>>>,
    roles: Arc<DashMap<String, HashSet<String>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created vault. Fails if a vault with the same
    /// derived address (same owner + name) already exists.
    pub fn insert_vault(&self, vault: Vault) -> VaultResult<()> {
        use dashmap::mapref::entry::Entry;

        let address = vault.address.clone();
        match self.vaults.entry(address.clone()) {
            Entry::Occupied(_) => Err(VaultError::VaultAlreadyExists(address)),
            Entry::Vacant(slot) => {
                self.index_identity(&vault.owner, &address);
                slot.insert(Arc::new(Mutex::new(VaultEntry {
                    vault,
                    withdrawals: Vec::new(),
                })));
                Ok(())
            }
        }
    }

    /// Fetch the lock guarding a vault. Callers hold it for the duration of
    /// exactly one command.
    pub fn entry(&self, address: &str) -> VaultResult<Arc<Mutex<VaultEntry>>> {
        self.vaults
            .get(address)
            .map(|e| e.value().clone())
            .ok_or_else(|| VaultError::VaultNotFound(address.to_string()))
    }

    pub async fn get_vault(&self, address: &str) -> VaultResult<Vault> {
        let entry = self.entry(address)?;
        let guard = entry.lock().await;
        Ok(guard.vault.clone())
    }

    pub async fn list_withdrawals(&self, address: &str) -> VaultResult<Vec<WithdrawalRequest>> {
        let entry = self.entry(address)?;
        let guard = entry.lock().await;
        Ok(guard.withdrawals.clone())
    }

    pub async fn get_withdrawal(
        &self,
        address: &str,
        sequence: u64,
    ) -> VaultResult<WithdrawalRequest> {
        let entry = self.entry(address)?;
        let guard = entry.lock().await;
        guard
            .withdrawals
            .iter()
            .find(|w| w.sequence == sequence)
            .cloned()
            .ok_or(VaultError::WithdrawalNotFound {
                vault: address.to_string(),
                sequence,
            })
    }

    /// Record that `identity` holds a role on the vault at `address`.
    pub fn index_identity(&self, identity: &str, address: &str) {
        self.roles
            .entry(identity.to_string())
            .or_default()
            .insert(address.to_string());
    }

    /// Drop the index entry once `identity` no longer holds any role on the
    /// vault. Callers pass the vault post-mutation so overlapping roles
    /// (staff who are also approvers) stay indexed.
    pub fn unindex_identity(&self, identity: &str, vault: &Vault) {
        if vault.has_role(identity) {
            return;
        }
        let now_empty = match self.roles.get_mut(identity) {
            Some(mut set) => {
                set.remove(&vault.address);
                set.is_empty()
            }
            None => false,
        };
        // The shard lock from get_mut must be released before removal.
        if now_empty {
            self.roles.remove_if(identity, |_, set| set.is_empty());
        }
    }

    /// Addresses of every vault where `identity` is owner, staff or approver.
    pub fn vaults_for_identity(&self, identity: &str) -> Vec<String> {
        self.roles
            .get(identity)
            .map(|set| {
                let mut addrs: Vec<String> = set.iter().cloned().collect();
                addrs.sort();
                addrs
            })
            .unwrap_or_default()
    }

    pub fn vault_count(&self) -> usize {
        self.vaults.len()
    }
}
