//! Autosave
//!
//! Trailing-edge debounce over edit signals: a save fires once no edit has
//! arrived for the configured window, so a burst of keystrokes costs one
//! write. A flush signal (sent on focus loss or before navigating away)
//! saves immediately and cancels the pending window.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config;
use crate::services::DocumentStore;

/// Signals fed to the autosave loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// An edit happened; (re)start the debounce window.
    Edited,
    /// Save now, cancelling any pending window.
    Flush,
}

/// Handle to a running autosave loop.
///
/// Dropping the handle (or calling `shutdown`) closes the channel; the loop
/// performs a final flush of any pending edits before exiting.
pub struct Autosave {
    tx: mpsc::UnboundedSender<Signal>,
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Spawn the loop with the default debounce window.
    pub fn spawn(store: Arc<Mutex<DocumentStore>>) -> Self {
        Self::spawn_with_debounce(store, Duration::from_millis(config::AUTOSAVE_DEBOUNCE_MS))
    }

    /// Spawn the loop with a custom debounce window, clamped to the
    /// configured bounds.
    pub fn spawn_with_debounce(store: Arc<Mutex<DocumentStore>>, debounce: Duration) -> Self {
        let debounce = debounce
            .max(Duration::from_millis(config::MIN_AUTOSAVE_DEBOUNCE_MS))
            .min(Duration::from_millis(config::MAX_AUTOSAVE_DEBOUNCE_MS));

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(store, rx, debounce));
        Self { tx, handle }
    }

    /// Notify the loop of an edit. Safe to call at any rate.
    pub fn notify_edited(&self) {
        // Send fails only after shutdown, when there is nothing to schedule.
        let _ = self.tx.send(Signal::Edited);
    }

    /// Request an immediate save.
    pub fn flush(&self) {
        let _ = self.tx.send(Signal::Flush);
    }

    /// Close the channel and wait for the final flush to complete.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::error!("Autosave task panicked: {}", e);
        }
    }
}

async fn run(
    store: Arc<Mutex<DocumentStore>>,
    mut rx: mpsc::UnboundedReceiver<Signal>,
    debounce: Duration,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let signal = match deadline {
            Some(at) => {
                tokio::select! {
                    signal = rx.recv() => signal,
                    _ = sleep_until(at) => {
                        deadline = None;
                        save(&store).await;
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        match signal {
            Some(Signal::Edited) => {
                deadline = Some(Instant::now() + debounce);
            }
            Some(Signal::Flush) => {
                deadline = None;
                save(&store).await;
            }
            None => {
                // Channel closed; flush anything still pending.
                if deadline.is_some() {
                    save(&store).await;
                }
                return;
            }
        }
    }
}

/// Saving is best-effort here: the dirty flag survives a failure, so the
/// next window (or a manual save) retries.
async fn save(store: &Arc<Mutex<DocumentStore>>) {
    let mut store = store.lock().await;
    if let Err(e) = store.save().await {
        tracing::error!("Autosave failed: {}", e);
    }
}
