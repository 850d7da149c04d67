//! Heartbeat scheduling
//!
//! At most one heartbeat producer runs at a time. Starting a new one cancels
//! the previous producer before spawning, and every producer is a child of
//! the connection scope so closing the connection stops it too.

use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Cancellable periodic heartbeat task
#[derive(Debug, Default)]
pub struct HeartbeatScheduler {
    current: Mutex<Option<CancellationToken>>,
}

impl HeartbeatScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the producer, calling `beat` immediately and then every `period`
    ///
    /// `period` must be non-zero.
    pub fn start<F, Fut>(&self, period: Duration, scope: &CancellationToken, beat: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = scope.child_token();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
        }

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    () = beat() => {}
                }
            }

            tracing::trace!("Heartbeat producer stopped");
        });
    }

    /// Stop the producer, wherever it is in its cycle
    pub fn stop(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}
