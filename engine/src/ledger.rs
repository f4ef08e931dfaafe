//! Value Transfer collaborator.
//!
//! The engine never moves funds itself; `execute_withdrawal` calls out
//! through this trait and the collaborator can fail independently of the
//! vault's own logic. A failed transfer leaves the withdrawal `Approved`
//! so the caller can retry.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Insufficient funds: available={available}, required={required}")]
    InsufficientFunds { available: u64, required: u64 },
    #[error("Transport error: {0}")]
    Transport(String),
}

/// External component that reports balances and settles transfers in the
/// vault's settlement asset.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    async fn get_balance(&self, account: &str, asset: &str) -> Result<u64, TransferError>;

    /// Move exactly `amount` of `asset` from `account` to `destination`,
    /// creating the destination holding if it does not exist yet.
    async fn transfer(
        &self,
        account: &str,
        destination: &str,
        asset: &str,
        amount: u64,
    ) -> Result<(), TransferError>;
}

/// Ledger keeping balances in process memory, keyed by (account, asset).
/// Default collaborator for tests and local harnesses.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    balances: Arc<DashMap<(String, String), u64>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fund an account. Test/demo seam; a real collaborator is fed by
    /// deposits outside this engine's scope.
    pub fn credit(&self, account: &str, asset: &str, amount: u64) {
        *self
            .balances
            .entry((account.to_string(), asset.to_string()))
            .or_insert(0) += amount;
    }

    pub fn balance(&self, account: &str, asset: &str) -> u64 {
        self.balances
            .get(&(account.to_string(), asset.to_string()))
            .map(|b| *b)
            .unwrap_or(0)
    }
}

#[async_trait]
impl ValueTransfer for InMemoryLedger {
    async fn get_balance(&self, account: &str, asset: &str) -> Result<u64, TransferError> {
        Ok(self.balance(account, asset))
    }

    async fn transfer(
        &self,
        account: &str,
        destination: &str,
        asset: &str,
        amount: u64,
    ) -> Result<(), TransferError> {
        let source_key = (account.to_string(), asset.to_string());
        {
            let mut source = self
                .balances
                .get_mut(&source_key)
                .ok_or_else(|| TransferError::AccountNotFound(account.to_string()))?;
            if *source < amount {
                return Err(TransferError::InsufficientFunds {
                    available: *source,
                    required: amount,
                });
            }
            *source -= amount;
        }
        // Destination holding is created on first use.
        self.credit(destination, asset, amount);
        Ok(())
    }
}
