//! Fixed-window rate limiting
//!
//! Counters are process-local and keyed by an opaque string (the HTTP
//! layer uses the client address). Each key gets a window that starts at
//! its first request and resets once the window elapses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Rate limiter configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Create a new rate limit config
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Create config for requests per minute
    #[must_use]
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Time until the window resets
    pub reset_after: Duration,
}

/// Per-key window state
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// In-memory fixed-window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The configured per-window maximum (for response headers)
    pub fn limit(&self) -> u32 {
        self.config.max_requests
    }

    /// Count a request against the key's window and report whether it is
    /// allowed.
    pub async fn acquire(&self, key: &str) -> RateLimitResult {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        // Window elapsed: start a fresh one
        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.count = 0;
        }

        let reset_after = self
            .config
            .window
            .saturating_sub(now.duration_since(window.started));

        if window.count < self.config.max_requests {
            window.count += 1;
            RateLimitResult {
                allowed: true,
                remaining: self.config.max_requests - window.count,
                reset_after,
            }
        } else {
            RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after,
            }
        }
    }

    /// Current usage for a key
    pub async fn usage(&self, key: &str) -> (u32, u32) {
        let now = Instant::now();
        let windows = self.windows.read().await;
        let current = windows
            .get(key)
            .filter(|w| now.duration_since(w.started) < self.config.window)
            .map(|w| w.count)
            .unwrap_or(0);

        (current, self.config.max_requests)
    }

    /// Forget a key's window
    pub async fn reset(&self, key: &str) {
        let mut windows = self.windows.write().await;
        windows.remove(key);
    }

    /// Drop windows that have already elapsed; returns how many were
    /// evicted.
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let initial = windows.len();

        windows.retain(|_, w| now.duration_since(w.started) < self.config.window);

        initial - windows.len()
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            windows: Arc::clone(&self.windows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_max() {
        let limiter = RateLimiter::new(RateLimitConfig::new(3, Duration::from_secs(60)));

        for i in 0..3 {
            let result = limiter.acquire("1.2.3.4").await;
            assert!(result.allowed, "request {} should be allowed", i);
        }

        let result = limiter.acquire("1.2.3.4").await;
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert!(result.reset_after > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(60)));

        assert!(limiter.acquire("1.2.3.4").await.allowed);
        assert!(!limiter.acquire("1.2.3.4").await.allowed);
        assert!(limiter.acquire("5.6.7.8").await.allowed);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_millis(40)));

        assert!(limiter.acquire("1.2.3.4").await.allowed);
        assert!(!limiter.acquire("1.2.3.4").await.allowed);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(limiter.acquire("1.2.3.4").await.allowed);
    }

    #[tokio::test]
    async fn test_remaining_counts_down() {
        let limiter = RateLimiter::new(RateLimitConfig::new(3, Duration::from_secs(60)));

        assert_eq!(limiter.acquire("k").await.remaining, 2);
        assert_eq!(limiter.acquire("k").await.remaining, 1);
        assert_eq!(limiter.acquire("k").await.remaining, 0);
        assert_eq!(limiter.usage("k").await, (3, 3));
    }

    #[tokio::test]
    async fn test_cleanup_evicts_expired() {
        let limiter = RateLimiter::new(RateLimitConfig::new(5, Duration::from_millis(20)));

        limiter.acquire("a").await;
        limiter.acquire("b").await;
        assert_eq!(limiter.cleanup().await, 0);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(limiter.cleanup().await, 2);
    }

    #[tokio::test]
    async fn test_reset_forgets_key() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(60)));

        assert!(limiter.acquire("k").await.allowed);
        assert!(!limiter.acquire("k").await.allowed);

        limiter.reset("k").await;
        assert!(limiter.acquire("k").await.allowed);
    }
}
