use thiserror::Error;

use crate::domain::ActionKind;
use crate::ports::PortError;
use crate::state_machine::TransitionError;

pub type WalletResult<T> = Result<T, WalletError>;

/// Uniform error taxonomy. Provider-specific failures never escape in any other shape.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet not installed: {0}")]
    NotInstalled(String),
    #[error("wallet not signed in")]
    NotSignedIn,
    #[error("no signed-in account or contract to default the transaction from")]
    UngroundedSession,
    #[error("{kind} actions are not supported by {wallet_id}")]
    UnsupportedAction { wallet_id: String, kind: ActionKind },
    #[error("failed to sign in: {0}")]
    SignInFailed(String),
    #[error("failed to sign out: {0}")]
    SignOutFailed(String),
    #[error("failed to sign transaction: {0}")]
    SignFailed(String),
    #[error("failed to send transaction after {completed} were broadcast: {reason}")]
    SendFailed { completed: usize, reason: String },
    #[error("invalid provider response: {0}")]
    InvalidProviderResponse(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl WalletError {
    pub fn sign_in(err: PortError) -> Self {
        Self::SignInFailed(err.to_string())
    }

    pub fn sign_out(err: PortError) -> Self {
        Self::SignOutFailed(err.to_string())
    }

    pub fn sign(err: PortError) -> Self {
        Self::SignFailed(err.to_string())
    }

    pub fn send(completed: usize, err: PortError) -> Self {
        Self::SendFailed {
            completed,
            reason: err.to_string(),
        }
    }

    /// Transactions already accepted by the network before this error, if any.
    pub fn broadcast_before_failure(&self) -> usize {
        match self {
            Self::SendFailed { completed, .. } => *completed,
            _ => 0,
        }
    }
}
