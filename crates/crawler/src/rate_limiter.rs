//! Per-host leaky-bucket delay applied before each fetch (spec.md §4.9),
//! configurable per tenant via `(rate, burst)`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Bucket {
    tokens: f64,
    rate_per_sec: f64,
    burst: f64,
    last_refill: Instant,
}

impl Bucket {
    fn new(rate_per_sec: f64, burst: f64) -> Self {
        Self {
            tokens: burst,
            rate_per_sec,
            burst,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let elapsed = self.last_refill.elapsed().as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate_per_sec).min(self.burst);
        self.last_refill = Instant::now();
    }

    /// Returns how long the caller must wait before a token is available,
    /// and reserves it immediately (so concurrent callers don't both see
    /// the same spare token).
    fn reserve(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Duration::ZERO
        } else {
            let deficit = 1.0 - self.tokens;
            self.tokens = 0.0;
            Duration::from_secs_f64(deficit / self.rate_per_sec)
        }
    }
}

pub struct HostRateLimiter {
    rate_per_sec: f64,
    burst: f64,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl HostRateLimiter {
    pub fn new(rate_per_sec: f64, burst: f64) -> Self {
        Self {
            rate_per_sec,
            burst,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Blocks the calling thread until `host` has a free token.
    pub fn throttle(&self, host: &str) {
        let wait = {
            let mut buckets = self.buckets.lock().unwrap();
            let bucket = buckets
                .entry(host.to_string())
                .or_insert_with(|| Bucket::new(self.rate_per_sec, self.burst));
            bucket.reserve()
        };
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_allows_immediate_fetches_up_to_capacity() {
        let limiter = HostRateLimiter::new(1000.0, 3.0);
        let start = Instant::now();
        limiter.throttle("example.com");
        limiter.throttle("example.com");
        limiter.throttle("example.com");
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn separate_hosts_have_independent_buckets() {
        let limiter = HostRateLimiter::new(1000.0, 1.0);
        limiter.throttle("a.example.com");
        let start = Instant::now();
        limiter.throttle("b.example.com");
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
