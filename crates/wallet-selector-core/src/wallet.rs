use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    AccountState, ContractState, ModuleDescriptor, PartialTransaction, SignInParams,
    TransactionOutcome,
};
use crate::error::WalletResult;
use crate::ports::{Broadcaster, HostPort};
use crate::state_machine::AdapterState;

/// The contract every adapter exposes, whatever the provider underneath.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn id(&self) -> &str;

    /// Returns the current accounts without touching the provider when already signed in.
    async fn sign_in(&self, params: SignInParams) -> WalletResult<Vec<AccountState>>;

    async fn sign_out(&self) -> WalletResult<()>;

    /// Freshly derived on every call; empty when nobody is signed in.
    async fn get_accounts(&self) -> Vec<AccountState>;

    async fn sign_and_send_transaction(
        &self,
        tx: PartialTransaction,
    ) -> WalletResult<TransactionOutcome>;

    /// Outcomes come back in input order. Transactions broadcast before a failure
    /// stay broadcast; see [`crate::WalletError::broadcast_before_failure`].
    async fn sign_and_send_transactions(
        &self,
        txs: Vec<PartialTransaction>,
    ) -> WalletResult<Vec<TransactionOutcome>>;

    /// Contract the current session is grounded on: the last one signed in to, or the
    /// configured one before that.
    fn session_contract(&self) -> Option<ContractState> {
        None
    }

    async fn state(&self) -> AdapterState {
        if self.get_accounts().await.is_empty() {
            AdapterState::SignedOut
        } else {
            AdapterState::SignedIn
        }
    }
}

/// Collaborators handed to an adapter at init. The network comes from the module's
/// own configuration.
#[derive(Clone)]
pub struct WalletEnvironment {
    /// Contract already selected by the host, if any.
    pub contract: Option<ContractState>,
    pub host: Arc<dyn HostPort>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

impl std::fmt::Debug for WalletEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletEnvironment")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

/// What the selection layer sees: a static descriptor plus an init entry point.
#[async_trait]
pub trait WalletModule: Send + Sync {
    fn descriptor(&self) -> &ModuleDescriptor;

    fn id(&self) -> &str {
        &self.descriptor().id
    }

    async fn init(&self, env: WalletEnvironment) -> WalletResult<Arc<dyn Wallet>>;
}
