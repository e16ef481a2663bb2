use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterState {
    Uninitialized,
    Probing,
    NotAvailable,
    SignedOut,
    SignedIn,
}

impl AdapterState {
    pub fn is_available(self) -> bool {
        matches!(self, Self::SignedOut | Self::SignedIn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    StartProbe,
    ProbeFailed,
    ProbeSucceeded { signed_in: bool },
    SignIn,
    SignOut,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("illegal adapter transition: {from:?} --{action:?}-->")]
pub struct TransitionError {
    pub from: AdapterState,
    pub action: LifecycleAction,
}

pub fn adapter_transition(
    from: AdapterState,
    action: LifecycleAction,
) -> Result<AdapterState, TransitionError> {
    use AdapterState as S;
    use LifecycleAction as A;

    let to = match (from, action) {
        (S::Uninitialized | S::NotAvailable, A::StartProbe) => S::Probing,
        (S::Probing, A::ProbeFailed) => S::NotAvailable,
        (S::Probing, A::ProbeSucceeded { signed_in: true }) => S::SignedIn,
        (S::Probing, A::ProbeSucceeded { signed_in: false }) => S::SignedOut,
        // Idempotent: signing in twice or out twice is not an error.
        (S::SignedOut | S::SignedIn, A::SignIn) => S::SignedIn,
        (S::SignedOut | S::SignedIn, A::SignOut) => S::SignedOut,
        _ => return Err(TransitionError { from, action }),
    };
    Ok(to)
}

/// Lifecycle bookkeeping shared by a module and the adapter it creates.
#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<AdapterState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: Mutex::new(AdapterState::Uninitialized),
        }
    }
}

impl Lifecycle {
    pub fn current(&self) -> AdapterState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn apply(&self, action: LifecycleAction) -> Result<AdapterState, TransitionError> {
        let mut g = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let next = adapter_transition(*g, action)?;
        tracing::trace!(from = ?*g, to = ?next, "adapter transition");
        *g = next;
        Ok(next)
    }
}
