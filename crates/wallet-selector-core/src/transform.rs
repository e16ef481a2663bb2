use crate::domain::{
    Action, ActionKind, FunctionCallParams, PartialTransaction, SessionContext, Transaction,
};
use crate::error::{WalletError, WalletResult};

/// Which action kinds a provider can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPolicy {
    Any,
    Only(ActionKind),
}

impl ActionPolicy {
    pub fn allows(self, kind: ActionKind) -> bool {
        match self {
            Self::Any => true,
            Self::Only(allowed) => allowed == kind,
        }
    }
}

/// Fills in `signer_id`/`receiver_id` from the session and enforces the action policy.
///
/// The whole batch is validated before anything is returned, so a single disallowed
/// action rejects every transaction and no provider call can happen.
pub fn transform_transactions(
    wallet_id: &str,
    partials: Vec<PartialTransaction>,
    session: &SessionContext,
    policy: ActionPolicy,
) -> WalletResult<Vec<Transaction>> {
    let (account, contract) = match (&session.account, &session.contract) {
        (Some(account), Some(contract)) => (account, contract),
        _ => return Err(WalletError::UngroundedSession),
    };

    for partial in &partials {
        ensure_supported(wallet_id, &partial.actions, policy)?;
    }

    Ok(partials
        .into_iter()
        .map(|partial| Transaction {
            signer_id: non_empty(partial.signer_id).unwrap_or_else(|| account.account_id.clone()),
            receiver_id: non_empty(partial.receiver_id)
                .unwrap_or_else(|| contract.contract_id.clone()),
            actions: partial.actions,
        })
        .collect())
}

pub fn ensure_supported(wallet_id: &str, actions: &[Action], policy: ActionPolicy) -> WalletResult<()> {
    match actions.iter().map(Action::kind).find(|kind| !policy.allows(*kind)) {
        Some(kind) => Err(WalletError::UnsupportedAction {
            wallet_id: wallet_id.to_owned(),
            kind,
        }),
        None => Ok(()),
    }
}

/// Parameters of function-call actions, for providers that accept nothing else.
pub fn function_call_params(wallet_id: &str, actions: &[Action]) -> WalletResult<Vec<FunctionCallParams>> {
    actions
        .iter()
        .map(|action| match action {
            Action::FunctionCall(params) => Ok(params.clone()),
            other => Err(WalletError::UnsupportedAction {
                wallet_id: wallet_id.to_owned(),
                kind: other.kind(),
            }),
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
