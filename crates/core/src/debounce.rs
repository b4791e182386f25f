//! Trailing-edge debounce on tokio timers.
//!
//! [`Debouncer`] is the scheduling half and [`DebounceReceiver`] the firing half.
//! Every `schedule` aborts the previous timer and bumps a shared generation; the
//! receiver only yields values whose generation is still current, so a timer
//! that fired just before being superseded never surfaces an outdated value.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Quiet interval between the last keystroke and the search it triggers.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

struct Shared {
    generation: AtomicU64,
    armed: AtomicBool,
}

/// Scheduling half of a debounce channel.
pub struct Debouncer<V> {
    delay: Duration,
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<(u64, V)>,
    pending: Option<JoinHandle<()>>,
}

/// Firing half of a debounce channel.
pub struct DebounceReceiver<V> {
    shared: Arc<Shared>,
    rx: mpsc::UnboundedReceiver<(u64, V)>,
}

/// Create a debounce channel with the given quiet interval.
pub fn channel<V: Send + 'static>(delay: Duration) -> (Debouncer<V>, DebounceReceiver<V>) {
    let shared = Arc::new(Shared { generation: AtomicU64::new(0), armed: AtomicBool::new(false) });
    let (tx, rx) = mpsc::unbounded_channel();
    (
        Debouncer { delay, shared: Arc::clone(&shared), tx, pending: None },
        DebounceReceiver { shared, rx },
    )
}

impl<V: Send + 'static> Debouncer<V> {
    /// Replace any pending invocation with one that fires `value` after the quiet interval.
    ///
    /// The timer runs on the current tokio runtime. Outside one, the previous
    /// invocation is still superseded but `value` is dropped with a warning.
    pub fn schedule(&mut self, value: V) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let gen = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Ok(runtime) = Handle::try_current() else {
            self.shared.armed.store(false, Ordering::SeqCst);
            warn!("No tokio runtime, debounced value dropped");
            return;
        };
        self.shared.armed.store(true, Ordering::SeqCst);

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send((gen, value));
        }));
    }
}

impl<V> Debouncer<V> {
    /// Discard the pending invocation, if any. Nothing fires afterwards.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.armed.store(false, Ordering::SeqCst);
    }

    /// Whether a scheduled value has not been delivered or cancelled yet.
    pub fn is_pending(&self) -> bool {
        self.shared.armed.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<V> Drop for Debouncer<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<V> DebounceReceiver<V> {
    /// Wait for the next current invocation. Returns `None` once the
    /// [`Debouncer`] is dropped and no timers remain.
    pub async fn recv(&mut self) -> Option<V> {
        while let Some((gen, value)) = self.rx.recv().await {
            if let Some(value) = self.accept(gen, value) {
                return Some(value);
            }
        }
        None
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<V> {
        while let Ok((gen, value)) = self.rx.try_recv() {
            if let Some(value) = self.accept(gen, value) {
                return Some(value);
            }
        }
        None
    }

    fn accept(&self, gen: u64, value: V) -> Option<V> {
        if gen != self.shared.generation.load(Ordering::SeqCst) {
            return None;
        }
        self.shared.armed.store(false, Ordering::SeqCst);
        Some(value)
    }
}
