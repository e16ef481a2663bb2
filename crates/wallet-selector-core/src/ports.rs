use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::{NetworkConfig, SignedTransaction, Transaction, TransactionOutcome};
use crate::events::{ProviderEvent, StateUpdate, WalletEvent};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected by provider: {0}")]
    Rejected(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Channel end handed to providers so their callbacks become typed messages.
pub type EventSink = mpsc::UnboundedSender<ProviderEvent>;
pub type EventStream = mpsc::UnboundedReceiver<ProviderEvent>;

pub fn event_channel() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}

/// Submits fully signed transactions to the network.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn send_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransactionOutcome, PortError>;
}

/// External signer. The core never touches key material itself.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_transaction(
        &self,
        tx: &Transaction,
        network: &NetworkConfig,
    ) -> Result<SignedTransaction, PortError>;
}

/// Host-owned UI state and event listeners. Fire-and-forget.
pub trait HostPort: Send + Sync {
    fn update(&self, update: StateUpdate);

    fn emit(&self, _event: WalletEvent) {}
}
