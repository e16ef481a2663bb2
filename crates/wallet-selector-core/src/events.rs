//! Messages flowing between providers, adapters and the host.

use serde::{Deserialize, Serialize};

use crate::domain::AccountState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderEventKind {
    AccountChanged,
    NetworkChanged,
}

/// Emitted by a provider callback, consumed by the event bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderEvent {
    AccountChanged { account_id: Option<String> },
    NetworkChanged { network_id: String },
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            Self::AccountChanged { .. } => ProviderEventKind::AccountChanged,
            Self::NetworkChanged { .. } => ProviderEventKind::NetworkChanged,
        }
    }
}

/// Notifications for whoever listens on the host side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    SignIn { accounts: Vec<AccountState> },
    SignOut { accounts: Vec<AccountState> },
    AccountsChanged { accounts: Vec<AccountState> },
    NetworkChanged { network_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateUpdate {
    WalletNotInstalled { wallet_id: String },
    NetworkMismatch,
    WalletSelected { wallet_id: Option<String> },
}

/// UI-facing flags owned by the host. Adapters only ever send [`StateUpdate`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFlags {
    pub show_modal: bool,
    pub show_wallet_options: bool,
    pub show_wallet_not_installed: Option<String>,
    pub show_switch_network: bool,
    pub selected_wallet_id: Option<String>,
}

impl SessionFlags {
    pub fn apply(&mut self, update: &StateUpdate) {
        match update {
            StateUpdate::WalletNotInstalled { wallet_id } => {
                self.show_wallet_options = false;
                self.show_wallet_not_installed = Some(wallet_id.clone());
            }
            StateUpdate::NetworkMismatch => {
                self.show_modal = true;
                self.show_wallet_options = false;
                self.show_switch_network = true;
            }
            StateUpdate::WalletSelected { wallet_id } => {
                if wallet_id.is_some() {
                    self.show_modal = false;
                }
                self.selected_wallet_id = wallet_id.clone();
            }
        }
    }
}
