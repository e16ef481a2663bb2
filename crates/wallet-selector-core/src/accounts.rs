use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{AccountState, ContractState};

/// Signed-in account exactly as a provider exposes it.
///
/// Some providers hand out a `{ accountId, publicKey }` record right after login and
/// a `{ address }` record once the extension reloads. The second shape cannot be
/// used for signing and is treated as "not signed in".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSignedInAccount {
    #[serde(rename_all = "camelCase")]
    Current {
        account_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        public_key: Option<String>,
    },
    PreviouslySignedIn { address: String },
}

impl RawSignedInAccount {
    /// The one place raw provider JSON is matched against the known shapes.
    /// Anything unrecognised counts as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::debug!(error = %e, "unrecognised signed-in account shape");
                None
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::PreviouslySignedIn { .. })
    }
}

pub fn signed_in_account(raw: Option<&RawSignedInAccount>) -> Option<AccountState> {
    match raw? {
        RawSignedInAccount::Current { account_id, .. } if !account_id.is_empty() => {
            Some(AccountState::new(account_id.clone()))
        }
        RawSignedInAccount::Current { .. } | RawSignedInAccount::PreviouslySignedIn { .. } => None,
    }
}

/// Zero or one canonical accounts for a single-account provider.
pub fn normalize_accounts(raw: Option<&RawSignedInAccount>) -> Vec<AccountState> {
    signed_in_account(raw).into_iter().collect()
}

/// Account list for providers that only expose a bare account id.
pub fn accounts_from_id(account_id: Option<String>) -> Vec<AccountState> {
    account_id
        .filter(|id| !id.is_empty())
        .map(AccountState::new)
        .into_iter()
        .collect()
}

/// Whether setup should re-login to replace a stale record.
pub fn needs_relogin(raw: Option<&RawSignedInAccount>, contract: Option<&ContractState>) -> bool {
    contract.is_some() && raw.map_or(false, RawSignedInAccount::is_stale)
}
