//! Success-state auto-redirect countdown
//!
//! A cancellable one-shot timer scoped to the success view: if the user
//! takes no action within the configured delay, the callback fires and
//! the session returns to a fresh form. Any explicit user action (or
//! dropping the handle) cancels it first, so a timer never outlives the
//! view it belongs to.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle to a running redirect countdown
#[derive(Debug)]
pub struct RedirectCountdown {
    token: CancellationToken,
}

impl RedirectCountdown {
    /// Start a countdown that invokes `on_fire` after `secs` seconds
    /// unless cancelled first. `secs == 0` produces an inert handle that
    /// never fires.
    pub fn start<F>(secs: u64, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();

        if secs > 0 {
            let child = token.child_token();
            tokio::spawn(async move {
                tokio::select! {
                    _ = child.cancelled() => {}
                    _ = tokio::time::sleep(Duration::from_secs(secs)) => on_fire(),
                }
            });
        }

        Self { token }
    }

    /// Cancel the countdown; idempotent
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for RedirectCountdown {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
