//! Per-sink throughput throttle
//!
//! Evenly spaced permits: permit N is handed out no earlier than
//! N * (1s / rate) after the first. Waiters queue on the internal lock in
//! arrival order and each reserves the next free slot before sleeping, so
//! the wait never exceeds the backlog ahead of the caller.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    interval: Duration,
    next_free: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Limiter releasing `permits_per_second` permits per second
    pub fn per_second(permits_per_second: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / permits_per_second.max(1),
            next_free: Mutex::new(None),
        }
    }

    /// Wait for the next permit. The first permit is immediate.
    pub async fn acquire(&self) {
        let wake = {
            let mut next = self.next_free.lock().await;
            let now = Instant::now();
            let wake = match *next {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next = Some(wake + self.interval);
            wake
        };
        tokio::time::sleep_until(wake).await;
    }
}
