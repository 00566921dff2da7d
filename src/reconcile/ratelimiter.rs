//! A minimal token-bucket rate limiter.
//!
//! §9 is explicit that "any faithful token-bucket implementation is acceptable; the
//! exact algorithm is not observable", and no repo in the pack reaches for a crate
//! for this shape of problem, so this is hand-rolled on `tokio::time` rather than an
//! added dependency — grounded in the original `flowcontrol.NewTokenBucketRateLimiter`
//! call site (`router.go`: `rateLimiter.Accept()` once per loop iteration).

use std::time::Duration;
use tokio::time::Instant;

/// Refills at `rate` tokens/second up to `burst` capacity; `acquire` blocks until a
/// token is available. Built on `tokio::time::Instant` rather than `std::time`
/// so it advances correctly under a paused tokio test clock.
pub struct RateLimiter {
    rate: f64,
    burst: f64,
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(rate: f64, burst: u32) -> Self {
        let burst = burst.max(1) as f64;
        Self {
            rate,
            burst,
            tokens: burst,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.burst);
        self.last_refill = now;
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&mut self) {
        loop {
            self.refill();
            if self.tokens >= 1.0 {
                self.tokens -= 1.0;
                return;
            }
            let deficit = 1.0 - self.tokens;
            let wait = Duration::from_secs_f64((deficit / self.rate).max(0.0));
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_acquire_is_immediate_with_full_burst() {
        let mut limiter = RateLimiter::new(0.1, 1);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn second_acquire_waits_for_refill() {
        let mut limiter = RateLimiter::new(10.0, 1);
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[test]
    fn burst_of_zero_is_treated_as_one() {
        let limiter = RateLimiter::new(0.1, 0);
        assert_eq!(limiter.burst, 1.0);
    }
}
