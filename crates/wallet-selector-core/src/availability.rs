use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(200),
            interval: Duration::from_millis(50),
        }
    }
}

impl ProbeOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Polls `predicate` until it holds or the window closes.
///
/// Timeout and absence are the same answer: `false`. The poll timer belongs to
/// the returned future, so dropping it (or letting it finish) releases the timer
/// and concurrent probes never share state.
pub async fn probe<F>(mut predicate: F, options: ProbeOptions) -> bool
where
    F: FnMut() -> bool,
{
    let poll = async {
        loop {
            if predicate() {
                return;
            }
            tokio::time::sleep(options.interval).await;
        }
    };

    match tokio::time::timeout(options.timeout, poll).await {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!(timeout_ms = options.timeout.as_millis() as u64, "probe window elapsed");
            false
        }
    }
}

/// Injectable stand-in for the well-known global a wallet extension writes itself into.
#[derive(Debug)]
pub struct ProviderSlot<P: ?Sized> {
    inner: Arc<RwLock<Option<Arc<P>>>>,
}

impl<P: ?Sized> Clone for ProviderSlot<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: ?Sized> Default for ProviderSlot<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: ?Sized> ProviderSlot<P> {
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_provider(provider: Arc<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(provider))),
        }
    }

    pub fn inject(&self, provider: Arc<P>) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *g = Some(provider);
    }

    pub fn clear(&self) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *g = None;
    }

    pub fn current(&self) -> Option<Arc<P>> {
        let g = self.inner.read().unwrap_or_else(|e| e.into_inner());
        g.clone()
    }

    pub fn is_present(&self) -> bool {
        self.current().is_some()
    }

    /// Probes until a provider satisfying `ready` sits in the slot.
    pub async fn wait_for<F>(&self, mut ready: F, options: ProbeOptions) -> Option<Arc<P>>
    where
        F: FnMut(&P) -> bool,
    {
        let found = probe(
            || self.current().map_or(false, |p| ready(&p)),
            options,
        )
        .await;
        if found {
            self.current()
        } else {
            None
        }
    }
}
