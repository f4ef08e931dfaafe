use sha2::{Digest, Sha256};

use crate::{VaultError, VaultResult, MAX_NAME_LEN, MAX_REASON_LEN};

/// Domain separator for address derivation.
const VAULT_SEED: &[u8] = b"vault";

pub fn validate_identity(identity: &str) -> VaultResult<()> {
    if identity.len() < 32 || identity.len() > 44 {
        return Err(VaultError::InvalidIdentity(
            "identity length must be between 32-44 characters".to_string(),
        ));
    }

    bs58::decode(identity)
        .into_vec()
        .map_err(|e| VaultError::InvalidIdentity(format!("invalid base58: {}", e)))?;
    Ok(())
}

pub fn validate_name(name: &str) -> VaultResult<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(VaultError::InvalidName);
    }
    Ok(())
}

pub fn validate_reason(reason: &str) -> VaultResult<()> {
    if reason.is_empty() || reason.len() > MAX_REASON_LEN {
        return Err(VaultError::InvalidLimit);
    }
    Ok(())
}

pub fn validate_amount(amount: u64) -> VaultResult<u64> {
    if amount == 0 {
        return Err(VaultError::InvalidLimit);
    }
    Ok(amount)
}

pub fn checked_add(a: u64, b: u64) -> VaultResult<u64> {
    a.checked_add(b).ok_or(VaultError::Overflow)
}

pub fn checked_sub(a: u64, b: u64) -> VaultResult<u64> {
    a.checked_sub(b).ok_or(VaultError::Overflow)
}

pub fn checked_mul(a: u64, b: u64) -> VaultResult<u64> {
    a.checked_mul(b).ok_or(VaultError::Overflow)
}

/// Derive a vault's address from its owner and name.
///
/// The derivation is a hash over a fixed seed plus both inputs, so a given
/// `(owner, name)` pair always yields the same address and two distinct
/// pairs collide with negligible probability.
pub fn derive_vault_address(owner: &str, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(VAULT_SEED);
    hasher.update(owner.as_bytes());
    hasher.update(name.as_bytes());
    bs58::encode(hasher.finalize()).into_string()
}
