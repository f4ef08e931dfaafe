//! # Configuration Module
//!
//! This module handles loading and validation of environment variables
//! for the treasury authorization engine.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default | Required |
//! |----------|-------------|---------|----------|
//! | `REJECT_POLICY` | Who may reject a pending withdrawal: `owner` or `owner-or-approver` | `owner-or-approver` | No |

use std::str::FromStr;

use shared::RejectPolicy;

/// Engine policy configuration.
///
/// Use `Config::load()` to read a `.env` file and the process environment,
/// or `Config::from_env()` for the environment alone.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity class permitted to reject a pending withdrawal request.
    pub reject_policy: RejectPolicy,
}

impl Config {
    /// Load configuration from a `.env` file (if present) plus environment
    /// variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let reject_policy = match std::env::var("REJECT_POLICY") {
            Ok(raw) => RejectPolicy::from_str(&raw).map_err(ConfigError::InvalidRejectPolicy)?,
            Err(_) => RejectPolicy::OwnerOrApprover,
        };

        Ok(Config { reject_policy })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reject_policy: RejectPolicy::OwnerOrApprover,
        }
    }
}

/// Configuration errors that can occur during loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `REJECT_POLICY` was set to something other than a known policy name
    #[error("Invalid reject policy: {0}")]
    InvalidRejectPolicy(String),
}
