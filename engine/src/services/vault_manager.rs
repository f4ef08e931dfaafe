use chrono::{Duration, Utc};
use shared::{
    checked_mul, derive_vault_address, validate_identity, validate_name, CreateVaultParams, Vault,
    VaultError, VaultResult, MAX_APPROVERS, MAX_STAFF,
};

use crate::services::AppState;

const SECONDS_PER_HOUR: u64 = 3600;

/// Vault registry and membership mutation. All mutations here are gated on
/// the vault owner; the withdrawal flow never touches membership.
pub struct VaultManager;

impl VaultManager {
    /// Create a vault with empty approver and staff sets. The address is
    /// derived from owner + name, so re-creating the same pair fails with
    /// `VaultAlreadyExists` rather than overwriting.
    pub async fn create_vault(state: &AppState, params: CreateVaultParams) -> VaultResult<Vault> {
        validate_identity(&params.owner)?;
        validate_identity(&params.settlement_asset)?;
        validate_name(&params.name)?;

        if params.approval_threshold == 0 {
            return Err(VaultError::InvalidThreshold);
        }
        if params.daily_limit == 0 || params.tx_limit == 0 || params.large_withdrawal_threshold == 0
        {
            return Err(VaultError::InvalidLimit);
        }

        let delay_seconds = checked_mul(params.delay_hours, SECONDS_PER_HOUR)?;
        // The delay must stay representable as a chrono Duration, otherwise
        // every large withdrawal against this vault would fail downstream.
        let representable = i64::try_from(delay_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .is_some();
        if !representable {
            return Err(VaultError::InvalidLimit);
        }

        let address = derive_vault_address(&params.owner, &params.name);
        let now = Utc::now();

        let vault = Vault {
            address: address.clone(),
            owner: params.owner,
            name: params.name,
            approvers: Vec::new(),
            staff: Vec::new(),
            approval_threshold: params.approval_threshold,
            daily_limit: params.daily_limit,
            tx_limit: params.tx_limit,
            large_withdrawal_threshold: params.large_withdrawal_threshold,
            delay_seconds,
            frozen: false,
            withdrawal_count: 0,
            settlement_asset: params.settlement_asset,
            created_at: now,
            updated_at: now,
        };

        state.store.insert_vault(vault.clone())?;

        tracing::info!("Vault created: {} by {}", vault.name, vault.owner);

        Ok(vault)
    }

    pub async fn add_approver(
        state: &AppState,
        address: &str,
        caller: &str,
        approver: &str,
    ) -> VaultResult<Vault> {
        validate_identity(approver)?;

        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let vault = &mut guard.vault;

        if !vault.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        if vault.is_approver(approver) {
            return Err(VaultError::DuplicateApprover);
        }
        if vault.approvers.len() >= MAX_APPROVERS {
            return Err(VaultError::MaxApproversReached);
        }

        vault.approvers.push(approver.to_string());
        vault.updated_at = Utc::now();
        state.store.index_identity(approver, address);

        tracing::info!(
            "Approver added to vault {}: {} ({}/{})",
            address,
            approver,
            vault.approvers.len(),
            MAX_APPROVERS
        );

        Ok(vault.clone())
    }

    /// Remove an approver. Rejected when removal would leave fewer approvers
    /// than the current threshold: the quorum must always stay achievable.
    pub async fn remove_approver(
        state: &AppState,
        address: &str,
        caller: &str,
        approver: &str,
    ) -> VaultResult<Vault> {
        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let vault = &mut guard.vault;

        if !vault.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        if !vault.is_approver(approver) {
            return Err(VaultError::ApproverNotFound);
        }
        if vault.approvers.len() <= vault.approval_threshold as usize {
            return Err(VaultError::InvalidThreshold);
        }

        vault.approvers.retain(|a| a != approver);
        vault.updated_at = Utc::now();
        state.store.unindex_identity(approver, vault);

        tracing::info!("Approver removed from vault {}: {}", address, approver);

        Ok(vault.clone())
    }

    pub async fn add_staff(
        state: &AppState,
        address: &str,
        caller: &str,
        staff: &str,
    ) -> VaultResult<Vault> {
        validate_identity(staff)?;

        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let vault = &mut guard.vault;

        if !vault.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        if vault.is_staff(staff) {
            return Err(VaultError::DuplicateStaff);
        }
        if vault.staff.len() >= MAX_STAFF {
            return Err(VaultError::MaxStaffReached);
        }

        vault.staff.push(staff.to_string());
        vault.updated_at = Utc::now();
        state.store.index_identity(staff, address);

        tracing::info!(
            "Staff added to vault {}: {} ({}/{})",
            address,
            staff,
            vault.staff.len(),
            MAX_STAFF
        );

        Ok(vault.clone())
    }

    /// Remove a staff member. No quorum constraint applies: any number of
    /// staff, including zero, is valid.
    pub async fn remove_staff(
        state: &AppState,
        address: &str,
        caller: &str,
        staff: &str,
    ) -> VaultResult<Vault> {
        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let vault = &mut guard.vault;

        if !vault.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        if !vault.is_staff(staff) {
            return Err(VaultError::StaffNotFound);
        }

        vault.staff.retain(|s| s != staff);
        vault.updated_at = Utc::now();
        state.store.unindex_identity(staff, vault);

        tracing::info!("Staff removed from vault {}: {}", address, staff);

        Ok(vault.clone())
    }

    /// Freeze or unfreeze the vault. A frozen vault refuses new withdrawal
    /// requests and execution; membership stays mutable.
    pub async fn set_frozen(
        state: &AppState,
        address: &str,
        caller: &str,
        frozen: bool,
    ) -> VaultResult<Vault> {
        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let vault = &mut guard.vault;

        if !vault.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }

        vault.frozen = frozen;
        vault.updated_at = Utc::now();

        tracing::info!(
            "Vault {} {}",
            address,
            if frozen { "frozen" } else { "unfrozen" }
        );

        Ok(vault.clone())
    }

    /// Change the approval threshold. Quorum evaluation always reads the
    /// current threshold, so a decrease here resolves a pending request on
    /// its next approval.
    pub async fn set_approval_threshold(
        state: &AppState,
        address: &str,
        caller: &str,
        threshold: u8,
    ) -> VaultResult<Vault> {
        let entry = state.store.entry(address)?;
        let mut guard = entry.lock().await;
        let vault = &mut guard.vault;

        if !vault.is_owner(caller) {
            return Err(VaultError::Unauthorized);
        }
        if threshold == 0 || threshold as usize > vault.approvers.len() {
            return Err(VaultError::InvalidThreshold);
        }

        vault.approval_threshold = threshold;
        vault.updated_at = Utc::now();

        tracing::info!("Vault {} threshold set to {}", address, threshold);

        Ok(vault.clone())
    }

    pub async fn get_vault(state: &AppState, address: &str) -> VaultResult<Vault> {
        state.store.get_vault(address).await
    }

    /// Addresses of every vault where `identity` holds a role, served from
    /// the secondary index rather than a scan.
    pub fn vaults_for_identity(state: &AppState, identity: &str) -> Vec<String> {
        state.store.vaults_for_identity(identity)
    }
}
