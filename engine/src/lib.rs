//! # Treasury Authorization Engine
//!
//! Multi-party authorization core for an organization treasury. An owner
//! configures a vault with an M-of-N approver quorum, a separate staff set
//! that may request withdrawals, and monetary guard-rails (per-transaction
//! limit, large-withdrawal threshold, mandatory time delay). The engine
//! decides, for every withdrawal attempt, whether it may be created, whether
//! it has collected enough approvals, whether its time lock has elapsed, and
//! whether it may move funds.
//!
//! ## Architecture
//!
//! 1. **Configuration**: environment-driven policy knobs (`config`)
//! 2. **Store**: in-memory vault registry and withdrawal ledger with one
//!    lock per vault (`store`)
//! 3. **Services**: the command surface — vault/membership management,
//!    withdrawal lifecycle, execution (`services`)
//! 4. **Ledger**: the external Value Transfer collaborator behind a trait;
//!    only `execute_withdrawal` ever calls it (`ledger`)
//!
//! Every command is a single synchronous unit of work against one vault;
//! commands on the same vault are serialized, commands on different vaults
//! run in parallel. There is no background processing: time-delay expiry is
//! checked lazily when execution is attempted.

pub mod config;
pub mod ledger;
pub mod services;
pub mod store;


pub use config::Config;
pub use ledger::{InMemoryLedger, TransferError, ValueTransfer};
pub use services::{AppState, VaultManager, WithdrawalExecutor, WithdrawalManager};
pub use store::Store;
