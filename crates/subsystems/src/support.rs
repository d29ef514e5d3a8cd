// SPDX-License-Identifier: MIT

//! Shared background-task scaffolding for the plug-ins in this crate.
//!
//! Every stub here follows the same shape (spec §6.1): `launch()` spawns
//! a task before returning, `land()` cancels it and waits for it to
//! actually stop. `BackgroundTask` is that spawn/cancel/await dance
//! factored out once so each plug-in file only states what, if anything,
//! its task does.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct BackgroundTask {
    slot: Mutex<Option<(JoinHandle<()>, CancellationToken)>>,
}

impl BackgroundTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `body`, cancelling and abandoning any task spawned by a
    /// previous call. `launch()` is only ever invoked once per run by the
    /// orchestrator, but a second spawn should still leave exactly one
    /// task behind rather than leak the first.
    pub fn spawn<F, Fut>(&self, body: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(body(token.clone()));
        let previous = self.slot.lock().replace((handle, token));
        if let Some((old_handle, old_token)) = previous {
            old_token.cancel();
            old_handle.abort();
        }
    }

    /// Cancel and await the task, if one is running. Idempotent.
    pub async fn stop(&self) {
        let entry = self.slot.lock().take();
        if let Some((handle, token)) = entry {
            token.cancel();
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot.lock().is_some()
    }
}

/// Placeholder background loop for stubs with no real per-subsystem work
/// to do (socket accept loops, mDNS announce timers, and the like are
/// Non-goals here): idles until landed.
pub async fn idle_until_cancelled(token: CancellationToken, interval: Duration) {
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_then_stop_leaves_no_task_running() {
        let task = BackgroundTask::new();
        task.spawn(|token| idle_until_cancelled(token, Duration::from_secs(30)));
        assert!(task.is_running());
        task.stop().await;
        assert!(!task.is_running());
    }

    #[tokio::test]
    async fn stop_without_spawn_is_a_no_op() {
        let task = BackgroundTask::new();
        task.stop().await;
        assert!(!task.is_running());
    }

    #[tokio::test]
    async fn respawning_cancels_the_previous_task() {
        let task = BackgroundTask::new();
        task.spawn(|token| idle_until_cancelled(token, Duration::from_secs(30)));
        task.spawn(|token| idle_until_cancelled(token, Duration::from_secs(30)));
        assert!(task.is_running());
        task.stop().await;
        assert!(!task.is_running());
    }
}
