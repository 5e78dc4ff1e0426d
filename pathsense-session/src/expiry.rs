//! Cancellable result-expiry timer
//!
//! Each `arm` bumps an epoch, aborts the previous timer task and spawns a
//! new one. The callback receives a ticket; it must check `is_current()`
//! under the same lock that guards re-arming, since an aborted task may
//! already be past its sleep.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ExpiryTicket {
    epoch: u64,
    current: Arc<AtomicU64>,
}

impl ExpiryTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.epoch
    }
}

#[derive(Debug, Default)]
pub struct ResultExpiry {
    epoch: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ResultExpiry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer. Must be called within a tokio runtime.
    pub fn arm<F>(&self, window: Duration, on_expire: F) -> u64
    where
        F: FnOnce(ExpiryTicket) + Send + 'static,
    {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = ExpiryTicket {
            epoch,
            current: self.epoch.clone(),
        };

        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            on_expire(ticket);
        });

        if let Some(previous) = self.handle.lock().replace(handle) {
            previous.abort();
        }
        debug!("Result expiry armed (epoch {}, {:?})", epoch, window);
        epoch
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

impl Drop for ResultExpiry {
    fn drop(&mut self) {
        self.disarm();
    }
}
