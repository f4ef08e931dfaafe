pub mod executor;
pub mod vault_manager;
pub mod withdrawal_manager;

use std::sync::Arc;

pub use executor::*;
pub use vault_manager::*;
pub use withdrawal_manager::*;

use crate::{config::Config, ledger::ValueTransfer, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub ledger: Arc<dyn ValueTransfer>,
}
