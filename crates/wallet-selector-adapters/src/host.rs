use std::sync::{Arc, Mutex};

use wallet_selector_core::{HostPort, PortError, SessionFlags, StateUpdate, WalletEvent};

/// In-memory host state: applies flag updates and keeps every emitted event.
#[derive(Debug, Clone, Default)]
pub struct SharedHostState {
    inner: Arc<Mutex<HostState>>,
}

#[derive(Debug, Default)]
struct HostState {
    flags: SessionFlags,
    updates: Vec<StateUpdate>,
    events: Vec<WalletEvent>,
}

impl SharedHostState {
    pub fn flags(&self) -> Result<SessionFlags, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("host state lock poisoned: {e}")))?;
        Ok(g.flags.clone())
    }

    pub fn updates(&self) -> Result<Vec<StateUpdate>, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("host state lock poisoned: {e}")))?;
        Ok(g.updates.clone())
    }

    pub fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("host state lock poisoned: {e}")))?;
        Ok(std::mem::take(&mut g.events))
    }
}

impl HostPort for SharedHostState {
    fn update(&self, update: StateUpdate) {
        let mut g = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        g.flags.apply(&update);
        g.updates.push(update);
    }

    fn emit(&self, event: WalletEvent) {
        let mut g = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        g.events.push(event);
    }
}
