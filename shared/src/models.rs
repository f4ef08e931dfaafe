use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard caps on membership set sizes.
pub const MAX_APPROVERS: usize = 10;
pub const MAX_STAFF: usize = 20;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_REASON_LEN: usize = 200;

/// A governed treasury: configuration plus membership.
///
/// The address is derived deterministically from `owner` + `name`, so the
/// same pair always resolves to the same vault and re-creation is rejected
/// instead of silently overwriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub address: String,
    pub owner: String,
    pub name: String,
    pub approvers: Vec<String>,
    pub staff: Vec<String>,
    pub approval_threshold: u8,
    pub daily_limit: u64,
    pub tx_limit: u64,
    pub large_withdrawal_threshold: u64,
    pub delay_seconds: u64,
    pub frozen: bool,
    pub withdrawal_count: u64,
    pub settlement_asset: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vault {
    #[inline]
    pub fn is_owner(&self, identity: &str) -> bool {
        self.owner == identity
    }
    #[inline]
    pub fn is_staff(&self, identity: &str) -> bool {
        self.staff.iter().any(|s| s == identity)
    }
    #[inline]
    pub fn is_approver(&self, identity: &str) -> bool {
        self.approvers.iter().any(|a| a == identity)
    }
    /// True once `approvals` distinct signatures meet the current threshold.
    #[inline]
    pub fn quorum_reached(&self, approvals: usize) -> bool {
        approvals >= self.approval_threshold as usize
    }
    /// True if `identity` holds any role on this vault (owner, staff or
    /// approver). Used to maintain the identity -> vault index.
    pub fn has_role(&self, identity: &str) -> bool {
        self.is_owner(identity) || self.is_staff(identity) || self.is_approver(identity)
    }
    /// Amounts at or above this trigger the mandatory time delay.
    #[inline]
    pub fn is_large_withdrawal(&self, amount: u64) -> bool {
        amount >= self.large_withdrawal_threshold
    }
}

/// One withdrawal attempt against a vault. Append-only audit record: once
/// created it is never deleted, only moved through the status machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Address of the vault this request draws from (lookup key, not ownership).
    pub vault: String,
    /// Value of `vault.withdrawal_count` captured at creation. Never reused.
    pub sequence: u64,
    pub requester: String,
    pub destination: String,
    pub amount: u64,
    pub reason: String,
    pub approvals: Vec<String>,
    pub status: WithdrawalStatus,
    pub created_at: DateTime<Utc>,
    pub delay_until: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl WithdrawalRequest {
    #[inline]
    pub fn has_approved(&self, identity: &str) -> bool {
        self.approvals.iter().any(|a| a == identity)
    }
    /// Executed and Rejected accept no further transitions.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            WithdrawalStatus::Executed | WithdrawalStatus::Rejected
        )
    }
    /// Lazy delay gate: a pure function of `(delay_until, now)`, evaluated
    /// at execute time rather than by any scheduler.
    pub fn delay_elapsed(&self, now: DateTime<Utc>) -> bool {
        match self.delay_until {
            Some(until) => now >= until,
            None => true,
        }
    }
}

/// Withdrawal lifecycle. `Pending -> Approved -> Executed` on the happy
/// path, `Pending -> Rejected` as the terminal failure branch.
///
/// Deliberately has no `Default` and no catch-all: an unrecognized status
/// in stored data is a parse error, never silently `Pending`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Executed,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Executed => "executed",
            WithdrawalStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for WithdrawalStatus {
    type Err = crate::VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WithdrawalStatus::Pending),
            "approved" => Ok(WithdrawalStatus::Approved),
            "executed" => Ok(WithdrawalStatus::Executed),
            "rejected" => Ok(WithdrawalStatus::Rejected),
            other => Err(crate::VaultError::InvalidStatusValue(other.to_string())),
        }
    }
}

/// Who may reject a pending request.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RejectPolicy {
    OwnerOnly,
    OwnerOrApprover,
}

impl RejectPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectPolicy::OwnerOnly => "owner",
            RejectPolicy::OwnerOrApprover => "owner-or-approver",
        }
    }

    pub fn permits(&self, vault: &Vault, identity: &str) -> bool {
        match self {
            RejectPolicy::OwnerOnly => vault.is_owner(identity),
            RejectPolicy::OwnerOrApprover => {
                vault.is_owner(identity) || vault.is_approver(identity)
            }
        }
    }
}

impl std::str::FromStr for RejectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(RejectPolicy::OwnerOnly),
            "owner-or-approver" => Ok(RejectPolicy::OwnerOrApprover),
            other => Err(format!("unknown reject policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVaultParams {
    pub owner: String,
    pub name: String,
    pub approval_threshold: u8,
    pub daily_limit: u64,
    pub tx_limit: u64,
    pub large_withdrawal_threshold: u64,
    pub delay_hours: u64,
    pub settlement_asset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithdrawalParams {
    pub vault: String,
    pub requester: String,
    pub amount: u64,
    pub destination: String,
    pub reason: String,
}
