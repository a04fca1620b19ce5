//! In-memory login throttling.
//!
//! Tracks per-key attempt timestamps inside a sliding window. State lives in
//! memory and resets on process restart. Safe to share via `Arc` across
//! async tasks.

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;

/// Sliding-window rate limiter keyed by an arbitrary string (here: email).
pub struct RateLimiter {
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
    max_attempts: usize,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window_secs: u64) -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
            max_attempts,
            window_secs,
        }
    }

    /// Check `key` against the limit. Returns `true` if the request is allowed,
    /// `false` if it is rate-limited. Records the attempt on `true`.
    pub fn check_and_record(&self, key: &str) -> bool {
        let mut attempts = self.attempts.lock();
        let now = Instant::now();
        let window = std::time::Duration::from_secs(self.window_secs);

        let entry = attempts.entry(key.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < window);

        if entry.len() >= self.max_attempts {
            return false;
        }
        entry.push(now);
        true
    }

    /// Remove entries that have expired (call periodically to free memory).
    pub fn cleanup(&self) {
        let mut attempts = self.attempts.lock();
        let now = Instant::now();
        let window = std::time::Duration::from_secs(self.window_secs);
        attempts.retain(|_, entries| {
            entries.retain(|t| now.duration_since(*t) < window);
            !entries.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limiter_allows_within_limit() {
        let l = RateLimiter::new(3, 60);
        assert!(l.check_and_record("a@b.com"));
        assert!(l.check_and_record("a@b.com"));
        assert!(l.check_and_record("a@b.com"));
    }

    #[test]
    fn rate_limiter_blocks_over_limit() {
        let l = RateLimiter::new(3, 60);
        l.check_and_record("a@b.com");
        l.check_and_record("a@b.com");
        l.check_and_record("a@b.com");
        assert!(!l.check_and_record("a@b.com"));
    }

    #[test]
    fn rate_limiter_keys_are_independent() {
        let l = RateLimiter::new(2, 60);
        l.check_and_record("user1@b.com");
        l.check_and_record("user1@b.com");
        assert!(!l.check_and_record("user1@b.com"));

        assert!(l.check_and_record("user2@b.com"));
    }

    #[test]
    fn rate_limiter_cleanup_keeps_live_entries() {
        let l = RateLimiter::new(2, 60);
        l.check_and_record("a@b.com");
        l.cleanup();
        // Entry is still within the window, so the next attempt counts as the second
        assert!(l.check_and_record("a@b.com"));
        assert!(!l.check_and_record("a@b.com"));
    }
}
