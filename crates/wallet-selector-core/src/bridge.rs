//! Turns provider events into calls on the adapter's own public operations.

use std::sync::{Arc, Weak};

use crate::domain::SignInParams;
use crate::error::WalletResult;
use crate::events::{ProviderEvent, StateUpdate, WalletEvent};
use crate::ports::{EventStream, HostPort};
use crate::wallet::Wallet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    Resynced,
    /// Resync failed; already logged, never re-raised.
    ResyncFailed(String),
    NetworkMatched,
    NetworkMismatch { expected: String, actual: String },
    WalletDropped,
}

pub struct EventBridge {
    wallet: Weak<dyn Wallet>,
    host: Arc<dyn HostPort>,
    network_id: String,
    sign_in: Option<SignInParams>,
}

impl std::fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("network_id", &self.network_id)
            .field("sign_in", &self.sign_in)
            .finish_non_exhaustive()
    }
}

impl EventBridge {
    /// Holds the wallet weakly so a running bridge never keeps a dropped adapter alive.
    pub fn new(
        wallet: &Arc<dyn Wallet>,
        host: Arc<dyn HostPort>,
        network_id: impl Into<String>,
        sign_in: Option<SignInParams>,
    ) -> Self {
        Self {
            wallet: Arc::downgrade(wallet),
            host,
            network_id: network_id.into(),
            sign_in,
        }
    }

    pub async fn handle(&self, event: ProviderEvent) -> BridgeOutcome {
        match event {
            ProviderEvent::AccountChanged { account_id } => {
                let Some(wallet) = self.wallet.upgrade() else {
                    return BridgeOutcome::WalletDropped;
                };
                tracing::info!(wallet = wallet.id(), ?account_id, "provider account changed");
                match self.resync(wallet.as_ref()).await {
                    Ok(()) => BridgeOutcome::Resynced,
                    Err(e) => {
                        tracing::warn!(wallet = wallet.id(), error = %e, "failed to change account");
                        BridgeOutcome::ResyncFailed(e.to_string())
                    }
                }
            }
            ProviderEvent::NetworkChanged { network_id } => {
                if network_id == self.network_id {
                    return BridgeOutcome::NetworkMatched;
                }
                tracing::warn!(
                    expected = %self.network_id,
                    actual = %network_id,
                    "provider switched to a different network"
                );
                self.host.update(StateUpdate::NetworkMismatch);
                self.host.emit(WalletEvent::NetworkChanged {
                    network_id: network_id.clone(),
                });
                BridgeOutcome::NetworkMismatch {
                    expected: self.network_id.clone(),
                    actual: network_id,
                }
            }
        }
    }

    /// Signs back in to the contract the session is on right now, falling back to the
    /// one configured at construction.
    async fn resync(&self, wallet: &dyn Wallet) -> WalletResult<()> {
        let params = wallet
            .session_contract()
            .map(|c| SignInParams::from(&c))
            .or_else(|| self.sign_in.clone());
        wallet.sign_out().await?;
        match params {
            Some(params) => {
                wallet.sign_in(params).await?;
            }
            None => tracing::debug!(wallet = wallet.id(), "no contract configured, staying signed out"),
        }
        Ok(())
    }

    /// Drains events until the provider drops its sinks or the wallet goes away.
    pub async fn run(self, mut events: EventStream) {
        while let Some(event) = events.recv().await {
            if self.handle(event).await == BridgeOutcome::WalletDropped {
                break;
            }
        }
        tracing::debug!(network_id = %self.network_id, "event bridge stopped");
    }
}
