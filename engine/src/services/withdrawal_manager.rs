use chrono::{Duration, Utc};
use shared::{
    checked_add, validate_amount, validate_identity, validate_reason, RequestWithdrawalParams,
    VaultError, VaultResult, WithdrawalRequest, WithdrawalStatus,
};

use crate::services::AppState;

/// Withdrawal request lifecycle up to (but not including) execution:
/// creation, approval aggregation, rejection.
pub struct WithdrawalManager;

impl WithdrawalManager {
    /// Create a pending withdrawal request. Allocates the vault's next
    /// sequence number and arms the time delay when the amount reaches the
    /// large-withdrawal threshold.
    pub async fn request_withdrawal(
        state: &AppState,
        params: RequestWithdrawalParams,
    ) -> VaultResult<WithdrawalRequest> {
        validate_identity(&params.destination)?;

        let entry = state.store.entry(&params.vault)?;
        let mut guard = entry.lock().await;

        if !guard.vault.is_staff(&params.requester) {
            return Err(VaultError::Unauthorized);
        }
        if guard.vault.frozen {
            return Err(VaultError::VaultFrozen);
        }
        validate_amount(params.amount)?;
        if params.amount > guard.vault.tx_limit {
            return Err(VaultError::ExceedsLimit);
        }
        validate_reason(&params.reason)?;

        let now = Utc::now();
        let sequence = guard.vault.withdrawal_count;

        // Amounts at or above the threshold wait out the configured delay
        // before execution; everything else is executable immediately once
        // approved. Representability is checked at vault creation, so the
        // fallible path here only guards stored state from another source.
        let delay_until = if guard.vault.is_large_withdrawal(params.amount) {
            let delay = i64::try_from(guard.vault.delay_seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .ok_or(VaultError::Overflow)?;
            Some(now + delay)
        } else {
            None
        };

        let request = WithdrawalRequest {
            vault: params.vault.clone(),
            sequence,
            requester: params.requester,
            destination: params.destination,
            amount: params.amount,
            reason: params.reason,
            approvals: Vec::new(),
            status: WithdrawalStatus::Pending,
            created_at: now,
            delay_until,
            executed_at: None,
        };

        guard.vault.withdrawal_count = checked_add(sequence, 1)?;
        guard.vault.updated_at = now;
        guard.withdrawals.push(request.clone());

        tracing::info!(
            "Withdrawal requested on vault {}: sequence={}, amount={}, delayed={}",
            params.vault,
            sequence,
            request.amount,
            request.delay_until.is_some()
        );

        Ok(request)
    }

    /// Record one approver's sign-off. Quorum is evaluated against the
    /// vault's current threshold after every approval, not only the Nth one,
    /// so a late threshold decrease resolves on the next approval.
    pub async fn approve_withdrawal(
        state: &AppState,
        address: &str,
        sequence: u64,
        approver: &str,
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

        if request.status != WithdrawalStatus::Pending {
            return Err(VaultError::InvalidStatus);
        }
        if !vault.is_approver(approver) {
            return Err(VaultError::Unauthorized);
        }
        if request.requester == approver {
            return Err(VaultError::SelfApprovalNotAllowed);
        }
        if request.has_approved(approver) {
            return Err(VaultError::AlreadyApproved);
        }

        request.approvals.push(approver.to_string());

        if vault.quorum_reached(request.approvals.len()) {
            request.status = WithdrawalStatus::Approved;
            tracing::info!(
                "Withdrawal approved on vault {}: sequence={} ({} approvals, threshold {})",
                address,
                sequence,
                request.approvals.len(),
                vault.approval_threshold
            );
        } else {
            tracing::debug!(
                "Approval recorded on vault {}: sequence={} ({}/{})",
                address,
                sequence,
                request.approvals.len(),
                vault.approval_threshold
            );
        }

        Ok(request.clone())
    }

    /// Reject a pending request. Terminal: nothing can be approved or
    /// executed afterwards. Who may reject is a configured policy point.
    pub async fn reject_withdrawal(
        state: &AppState,
        address: &str,
        sequence: u64,
        caller: &str,
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

        if request.status != WithdrawalStatus::Pending {
            return Err(VaultError::InvalidStatus);
        }
        if !state.config.reject_policy.permits(vault, caller) {
            return Err(VaultError::Unauthorized);
        }

        request.status = WithdrawalStatus::Rejected;

        tracing::info!(
            "Withdrawal rejected on vault {}: sequence={} by {}",
            address,
            sequence,
            caller
        );

        Ok(request.clone())
    }

    pub async fn list_withdrawals(
        state: &AppState,
        address: &str,
    ) -> VaultResult<Vec<WithdrawalRequest>> {
        state.store.list_withdrawals(address).await
    }

    pub async fn get_withdrawal(
        state: &AppState,
        address: &str,
        sequence: u64,
    ) -> VaultResult<WithdrawalRequest> {
        state.store.get_withdrawal(address, sequence).await
    }
}
