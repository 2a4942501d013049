//! Platform-split timing primitives for the polling supervisor.
//!
//! Native builds use `tokio::time`, whose paused-clock test mode makes the
//! supervisor's timing properties deterministic to assert. WASM builds wait
//! on the browser's `setTimeout` via `gloo-timers` and measure elapsed time
//! with `performance.now()`.

pub use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub use tokio::time::{sleep, Instant};

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await
}

/// Monotonic instant backed by `performance.now()`. Relative to an arbitrary
/// origin (usually page load), which is all the supervisor needs for elapsed
/// measurements.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant {
    micros: u64,
}

#[cfg(target_arch = "wasm32")]
impl Instant {
    pub fn now() -> Self {
        let perf = web_sys::window()
            .and_then(|w| w.performance())
            .expect("performance API not available");
        Self {
            micros: (perf.now() * 1000.0) as u64,
        }
    }

    pub fn elapsed(&self) -> Duration {
        let now = Self::now();
        Duration::from_micros(now.micros.saturating_sub(self.micros))
    }
}
