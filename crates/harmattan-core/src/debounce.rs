//! Timer-based coalescing of bursty input.

use std::time::Duration;

use tokio::sync::mpsc;

/// Coalesces bursts of input into a single callback invocation.
///
/// Constructed once per owner; every [`notify`](Debouncer::notify) resets the
/// quiet-window timer, and the callback fires at most once per burst, with the
/// latest input, after the window elapses with no further notifications.
pub struct Debouncer {
    tx: mpsc::UnboundedSender<String>,
}

impl Debouncer {
    /// Spawn the debounce task. Must be called from within a tokio runtime.
    pub fn new<F>(window: Duration, on_fire: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut latest = first;
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            // Another keystroke within the window: restart it
                            Some(value) => latest = value,
                            // Owner dropped mid-burst; nothing left to fire for
                            None => return,
                        },
                        () = tokio::time::sleep(window) => {
                            on_fire(latest);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx }
    }

    /// Feed the latest input, resetting the quiet-window timer.
    pub fn notify(&self, input: impl Into<String>) {
        // Send only fails once the task is gone, i.e. during shutdown
        let _ = self.tx.send(input.into());
    }
}
