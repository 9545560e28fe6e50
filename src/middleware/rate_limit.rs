//! Login rate limiting
//!
//! Windowed rate limiter keyed by client address, applied to the login
//! endpoint to slow down credential guessing.

use crate::utils::errors::{Result, SixkulError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_duration: Duration::from_secs(60),
            burst_allowance: 2,
        }
    }
}

/// Rate limit entry for tracking requests per client
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);

        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = Instant::now();
        }
    }

    /// Check if request is allowed
    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        let current_requests = self.requests.len() as u32;

        if current_requests < config.max_requests {
            return true;
        }

        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Rate limiter shared across login requests
#[derive(Clone)]
pub struct LoginRateLimiter {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

impl LoginRateLimiter {
    /// Create a new LoginRateLimiter instance
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether a client may attempt another login
    pub fn check(&self, client_key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("rate limit lock");
        let entry = entries
            .entry(client_key.to_string())
            .or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record_request();
            debug!(client = client_key, "Rate limit check passed");
            Ok(())
        } else {
            warn!(client = client_key, "Login rate limit exceeded");
            Err(SixkulError::RateLimitExceeded)
        }
    }

    /// Drop tracking for a client, e.g. after a successful login
    pub fn clear(&self, client_key: &str) -> bool {
        let mut entries = self.entries.lock().expect("rate limit lock");
        entries.remove(client_key).is_some()
    }

    /// Cleanup old entries (should be called periodically)
    pub fn cleanup_old_entries(&self) {
        let mut entries = self.entries.lock().expect("rate limit lock");
        let cutoff = Instant::now() - self.config.window_duration * 2;

        entries.retain(|_, entry| entry.requests.iter().any(|&time| time > cutoff));

        info!(remaining_entries = entries.len(), "Cleaned up old rate limit entries");
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_basic() {
        let config = RateLimitConfig {
            max_requests: 3,
            window_duration: Duration::from_secs(60),
            burst_allowance: 1,
        };

        let limiter = LoginRateLimiter::new(config);

        // First 3 requests should pass
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());

        // 4th request should use burst allowance
        assert!(limiter.check("10.0.0.1").is_ok());

        // 5th request should fail
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn test_clients_are_tracked_separately() {
        let config = RateLimitConfig {
            max_requests: 1,
            window_duration: Duration::from_secs(60),
            burst_allowance: 0,
        };

        let limiter = LoginRateLimiter::new(config);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_clear_resets_client() {
        let config = RateLimitConfig {
            max_requests: 1,
            window_duration: Duration::from_secs(60),
            burst_allowance: 0,
        };

        let limiter = LoginRateLimiter::new(config);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
        assert!(limiter.clear("10.0.0.1"));
        assert!(limiter.check("10.0.0.1").is_ok());
    }

    #[test]
    fn test_cleanup_keeps_recent_entries() {
        let limiter = LoginRateLimiter::default();

        limiter.check("10.0.0.1").unwrap();
        limiter.cleanup_old_entries();

        // Recent entry is still tracked.
        assert!(limiter.clear("10.0.0.1"));
    }
}
