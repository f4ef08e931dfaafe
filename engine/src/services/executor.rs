use chrono::Utc;
use shared::{VaultError, VaultResult, WithdrawalRequest, WithdrawalStatus};

use crate::services::AppState;

/// Settlement of approved withdrawals through the Value Transfer
/// collaborator. This is the only path in the engine that performs I/O.
pub struct WithdrawalExecutor;

impl WithdrawalExecutor {
    /// Execute an approved withdrawal. Permissionless: any identity may
    /// call this, it only triggers settlement of a request the quorum has
    /// already authorized.
    ///
    /// The vault lock is held across the transfer, so the status flip is
    /// atomic with the fund movement: a failed transfer leaves the request
    /// `Approved` (retry is safe), a successful one always lands on
    /// `Executed`.
    pub async fn execute_withdrawal(
        state: &AppState,
        address: &str,
        sequence: u64,
        executor: &str,
    ) -> VaultResult<WithdrawalRequest> {
        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let crate::store::VaultEntry { vault, withdrawals } = &mut *guard;

        let request = withdrawals
            .iter_mut()
            .find(|w| w.sequence == sequence)
            .ok_or(VaultError::WithdrawalNotFound {
                vault: address.to_string(),
                sequence,
            })?;

        if vault.frozen {
            return Err(VaultError::VaultFrozen);
        }
        if request.status != WithdrawalStatus::Approved {
            return Err(VaultError::InvalidStatus);
        }

        let now = Utc::now();
        if !request.delay_elapsed(now) {
            return Err(VaultError::DelayNotPassed);
        }

        let balance = state
            .ledger
            .get_balance(&vault.address, &vault.settlement_asset)
            .await
            .map_err(|e| VaultError::TransferFailed(e.to_string()))?;
        if balance < request.amount {
            return Err(VaultError::InsufficientBalance);
        }

        state
            .ledger
            .transfer(
                &vault.address,
                &request.destination,
                &vault.settlement_asset,
                request.amount,
            )
            .await
            .map_err(|e| VaultError::TransferFailed(e.to_string()))?;

        request.status = WithdrawalStatus::Executed;
        request.executed_at = Some(now);
        vault.updated_at = now;

        tracing::info!(
            "Withdrawal executed on vault {}: sequence={}, amount={} to {} (executor {})",
            address,
            sequence,
            request.amount,
            request.destination,
            executor
        );

        Ok(request.clone())
    }
}
