use std::sync::Mutex;

use wallet_selector_core::{
    AccountState, ContractState, HostPort, SessionContext, StateUpdate, WalletEvent,
};

/// Contract the session is grounded on. Set at sign-in, seeded from the host or config.
#[derive(Debug, Default)]
pub(crate) struct ActiveContract {
    inner: Mutex<Option<ContractState>>,
}

impl ActiveContract {
    pub(crate) fn new(contract: Option<ContractState>) -> Self {
        Self {
            inner: Mutex::new(contract),
        }
    }

    pub(crate) fn get(&self) -> Option<ContractState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn set(&self, contract: ContractState) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Some(contract);
    }

    /// One snapshot per call so a batch never mixes signer identities.
    pub(crate) fn snapshot(&self, accounts: Vec<AccountState>) -> SessionContext {
        SessionContext {
            account: accounts.into_iter().next(),
            contract: self.get(),
        }
    }
}

pub(crate) fn notify_signed_in(host: &dyn HostPort, wallet_id: &str, accounts: &[AccountState]) {
    host.update(StateUpdate::WalletSelected {
        wallet_id: Some(wallet_id.to_owned()),
    });
    host.emit(WalletEvent::SignIn {
        accounts: accounts.to_vec(),
    });
    host.emit(WalletEvent::AccountsChanged {
        accounts: accounts.to_vec(),
    });
}

pub(crate) fn notify_signed_out(host: &dyn HostPort, accounts: &[AccountState]) {
    host.update(StateUpdate::WalletSelected { wallet_id: None });
    host.emit(WalletEvent::AccountsChanged {
        accounts: accounts.to_vec(),
    });
    host.emit(WalletEvent::SignOut {
        accounts: accounts.to_vec(),
    });
}
