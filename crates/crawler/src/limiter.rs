//! The adaptive worker pool (spec.md §4.9): a semaphore whose capacity is
//! mutated by the ramp/halve policy rather than fixed at construction —
//! "an adaptive semaphore is a counting semaphore whose capacity is
//! mutated atomically by the policy function" (spec.md §9).

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_MIN_CONCURRENCY: usize = 5;
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;
pub const DEFAULT_MAX_SESSIONS: usize = 50;
const SUCCESS_STREAK_THRESHOLD: u32 = 25;
const QUIET_PERIOD: Duration = Duration::from_secs(60);

pub struct AdaptiveLimiter {
    min_concurrency: usize,
    max_concurrency: usize,
    limit: AtomicUsize,
    in_flight: Mutex<usize>,
    available: Condvar,
    success_streak: AtomicU32,
    last_throttle: Mutex<Instant>,
}

/// Releases its slot when dropped, so a panicking or early-returning worker
/// never leaks a permit.
pub struct Permit<'a> {
    limiter: &'a AdaptiveLimiter,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.limiter.in_flight.lock().unwrap();
        *in_flight -= 1;
        self.limiter.available.notify_one();
    }
}

impl AdaptiveLimiter {
    pub fn new(min_concurrency: usize, max_concurrency: usize, max_sessions: usize) -> Self {
        let max_concurrency = max_concurrency.min(max_sessions).max(min_concurrency);
        Self {
            min_concurrency,
            max_concurrency,
            limit: AtomicUsize::new(min_concurrency),
            in_flight: Mutex::new(0),
            available: Condvar::new(),
            success_streak: AtomicU32::new(0),
            last_throttle: Mutex::new(Instant::now() - QUIET_PERIOD),
        }
    }

    pub fn current_limit(&self) -> usize {
        self.limit.load(Ordering::SeqCst)
    }

    /// Blocks until a slot under the current limit is free.
    pub fn acquire(&self) -> Permit<'_> {
        let mut in_flight = self.in_flight.lock().unwrap();
        loop {
            let limit = self.current_limit();
            if *in_flight < limit {
                *in_flight += 1;
                return Permit { limiter: self };
            }
            in_flight = self.available.wait(in_flight).unwrap();
        }
    }

    /// After `S_success = 25` consecutive successes *and* `T_quiet = 60s`
    /// since the last throttle, raise the limit by one (never above
    /// `max_concurrency`). Resets the streak once it fires so a second
    /// increase needs another 25 successes.
    pub fn on_success(&self) {
        let streak = self.success_streak.fetch_add(1, Ordering::SeqCst) + 1;
        if streak < SUCCESS_STREAK_THRESHOLD {
            return;
        }
        let quiet_long_enough = {
            let last = *self.last_throttle.lock().unwrap();
            last.elapsed() >= QUIET_PERIOD
        };
        if !quiet_long_enough {
            return;
        }
        self.success_streak.store(0, Ordering::SeqCst);
        let _ = self.limit.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
            if cur < self.max_concurrency {
                Some(cur + 1)
            } else {
                None
            }
        });
        self.available.notify_all();
    }

    /// Immediately halves the limit, bounded below by `min_concurrency`.
    pub fn on_throttled(&self) {
        self.success_streak.store(0, Ordering::SeqCst);
        *self.last_throttle.lock().unwrap() = Instant::now();
        let _ = self.limit.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
            Some((cur / 2).max(self.min_concurrency))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_up_after_25_successes_past_quiet_period() {
        let limiter = AdaptiveLimiter::new(5, 20, 50);
        *limiter.last_throttle.lock().unwrap() = Instant::now() - QUIET_PERIOD - Duration::from_secs(1);
        for _ in 0..24 {
            limiter.on_success();
        }
        assert_eq!(limiter.current_limit(), 5);
        limiter.on_success();
        assert_eq!(limiter.current_limit(), 6);
    }

    #[test]
    fn ramp_never_exceeds_max_concurrency() {
        let limiter = AdaptiveLimiter::new(5, 6, 50);
        *limiter.last_throttle.lock().unwrap() = Instant::now() - QUIET_PERIOD - Duration::from_secs(1);
        for _ in 0..250 {
            limiter.on_success();
        }
        assert_eq!(limiter.current_limit(), 6);
    }

    #[test]
    fn throttle_halves_and_floors_at_min_concurrency() {
        let limiter = AdaptiveLimiter::new(5, 20, 50);
        limiter.limit.store(16, Ordering::SeqCst);
        limiter.on_throttled();
        assert_eq!(limiter.current_limit(), 8);
        limiter.on_throttled();
        assert_eq!(limiter.current_limit(), 5);
        limiter.on_throttled();
        assert_eq!(limiter.current_limit(), 5);
    }

    #[test]
    fn acquire_blocks_until_a_permit_is_released() {
        use std::sync::Arc;
        let limiter = Arc::new(AdaptiveLimiter::new(1, 1, 1));
        let first = limiter.acquire();
        let limiter2 = Arc::clone(&limiter);
        let handle = std::thread::spawn(move || {
            let _second = limiter2.acquire();
        });
        std::thread::sleep(Duration::from_millis(20));
        drop(first);
        handle.join().unwrap();
    }
}
