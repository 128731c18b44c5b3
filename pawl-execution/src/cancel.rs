//! Cooperative cancellation primitives
//!
//! A [`CancellationSource`] is held by whoever may abandon a job; cloneable
//! [`CancellationSignal`]s are handed to the runtime. Cancellation is
//! one-way and sticky.

use tokio::sync::watch;

/// Trigger side of a cancellation pair
#[derive(Debug)]
pub struct CancellationSource {
    sender: watch::Sender<bool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// A signal observing this source
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            receiver: self.sender.subscribe(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation pair
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that can never fire, for jobs with no cancellation path
    pub fn never() -> Self {
        let (sender, receiver) = watch::channel(false);
        drop(sender);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested; pends forever if the source
    /// is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow() {
                return;
            }
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_resolves_waiters() {
        let source = CancellationSource::new();
        let signal = source.signal();
        assert!(!signal.is_cancelled());

        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move {
                signal.cancelled().await;
            }
        });

        source.cancel();
        waiter.await.unwrap();
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let source = CancellationSource::new();
        source.cancel();
        source.cancel();
        assert!(source.is_cancelled());
        assert!(source.signal().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_signal_pends() {
        let signal = CancellationSignal::never();
        assert!(!signal.is_cancelled());

        let outcome = tokio::time::timeout(Duration::from_secs(60), signal.cancelled()).await;
        assert!(outcome.is_err(), "never-signal must not resolve");
    }

    #[tokio::test]
    async fn test_signal_sees_cancellation_before_subscribe() {
        let source = CancellationSource::new();
        source.cancel();

        let signal = source.signal();
        signal.cancelled().await; // must resolve immediately
    }
}
