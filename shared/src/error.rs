use thiserror::Error;

/// Closed error taxonomy for every command the engine exposes.
///
/// Each variant is a rejected command returned synchronously to the caller
/// with no partial mutation; none of these abort the process and none are
/// retried by the engine itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Invalid name: name must be between 1 and 50 characters")]
    InvalidName,

    #[error("Invalid threshold: threshold must be > 0 and <= number of approvers")]
    InvalidThreshold,

    #[error("Invalid limit: limit must be greater than 0")]
    InvalidLimit,

    #[error("Unauthorized: you are not authorized to perform this action")]
    Unauthorized,

    #[error("Max approvers reached: cannot add more than 10 approvers")]
    MaxApproversReached,

    #[error("Duplicate approver: approver is already in the list")]
    DuplicateApprover,

    #[error("Approver not found")]
    ApproverNotFound,

    #[error("Max staff reached: cannot add more than 20 staff members")]
    MaxStaffReached,

    #[error("Duplicate staff: staff member is already in the list")]
    DuplicateStaff,

    #[error("Staff not found")]
    StaffNotFound,

    #[error("Vault is frozen: cannot perform this action while vault is frozen")]
    VaultFrozen,

    #[error("Exceeds limit: amount exceeds configured transaction limit")]
    ExceedsLimit,

    #[error("Invalid status: operation not allowed for current withdrawal status")]
    InvalidStatus,

    #[error("Already approved: this approver has already approved this request")]
    AlreadyApproved,

    #[error("Self-approval not allowed: cannot approve your own withdrawal request")]
    SelfApprovalNotAllowed,

    #[error("Insufficient approvals: not enough approvals to execute withdrawal")]
    InsufficientApprovals,

    #[error("Delay not passed: time delay period has not elapsed yet")]
    DelayNotPassed,

    #[error("Insufficient balance: vault does not have enough funds")]
    InsufficientBalance,

    #[error("Vault already exists: {0}")]
    VaultAlreadyExists(String),

    #[error("Vault not found: {0}")]
    VaultNotFound(String),

    #[error("Withdrawal not found: vault={vault}, sequence={sequence}")]
    WithdrawalNotFound { vault: String, sequence: u64 },

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Unrecognized withdrawal status: {0}")]
    InvalidStatusValue(String),

    /// The Value Transfer collaborator failed after validation passed. The
    /// request stays `Approved` so the caller can retry execution.
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

pub type VaultResult<T> = Result<T, VaultError>;
