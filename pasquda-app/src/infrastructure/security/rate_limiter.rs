use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_REQUESTS_PER_WINDOW: u32 = 5;
const WINDOW: Duration = Duration::from_secs(60 * 60);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
struct WindowRecord {
    count: u32,
    window_start: Instant,
}

/// Fixed-window limiter: 5 requests per rolling hour per client key.
/// Keys are header-derived IPs; clients without forwarding headers all
/// share the `"unknown"` bucket.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<String, WindowRecord>>,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Returns true if the request is allowed. Counting a denied request
    /// does not extend the window.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        self.maybe_cleanup(now);

        let mut record = self.requests.entry(key.to_string()).or_insert(WindowRecord {
            count: 0,
            window_start: now,
        });

        if now.duration_since(record.window_start) > WINDOW {
            record.count = 1;
            record.window_start = now;
            return true;
        }

        if record.count >= MAX_REQUESTS_PER_WINDOW {
            return false;
        }

        record.count += 1;
        true
    }

    /// Drops entries whose window has lapsed so long-lived processes do not
    /// accumulate one record per IP forever.
    fn maybe_cleanup(&self, now: Instant) {
        let mut last_cleanup = match self.last_cleanup.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if now.duration_since(*last_cleanup) > CLEANUP_INTERVAL {
            self.requests
                .retain(|_, record| now.duration_since(record.window_start) <= WINDOW);
            *last_cleanup = now;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Client key for rate limiting: first `x-forwarded-for` hop, then
/// `x-real-ip`, then a shared fallback bucket.
pub fn client_key(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or(real_ip)
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_five_then_denies_sixth() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at("1.2.3.4", now));
        }
        assert!(!limiter.check_at("1.2.3.4", now));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at("1.2.3.4", start));
        }
        assert!(!limiter.check_at("1.2.3.4", start));

        let after_window = start + Duration::from_secs(61 * 60);
        assert!(limiter.check_at("1.2.3.4", after_window));
        // Reset counted that call as the first of the new window.
        for _ in 0..4 {
            assert!(limiter.check_at("1.2.3.4", after_window));
        }
        assert!(!limiter.check_at("1.2.3.4", after_window));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at("1.2.3.4", now));
        }
        assert!(limiter.check_at("5.6.7.8", now));
    }

    #[test]
    fn cleanup_drops_lapsed_windows() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        limiter.check_at("1.2.3.4", start);
        assert_eq!(limiter.requests.len(), 1);

        let later = start + Duration::from_secs(2 * 60 * 60);
        limiter.check_at("5.6.7.8", later);
        assert!(!limiter.requests.contains_key("1.2.3.4"));
    }

    #[test]
    fn client_key_derivation() {
        assert_eq!(
            client_key(Some("203.0.113.9, 10.0.0.1"), None),
            "203.0.113.9"
        );
        assert_eq!(client_key(None, Some("203.0.113.9")), "203.0.113.9");
        assert_eq!(client_key(None, None), "unknown");
        assert_eq!(client_key(Some(""), None), "unknown");
    }
}
