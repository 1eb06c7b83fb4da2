//! Per-host token bucket with exponential-backoff failure tracking.
//!
//! Grounded on the shape of the teacher's `throttle` crate — lazily-created,
//! lock-guarded per-key state, `Duration`-based accounting — but implements
//! the token-bucket-plus-backoff algorithm this system needs rather than the
//! teacher's redis-cell/GCRA scheme, which solves a different (distributed,
//! multi-process) rate-limiting problem.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    pub max_tokens: f64,
    pub refill_rate: f64,
    pub failure_threshold: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_tokens: 10.0,
            refill_rate: 1.0,
            failure_threshold: 3,
            initial_backoff: Duration::from_secs(5),
            max_backoff: Duration::from_secs(300),
            backoff_multiplier: 2.0,
        }
    }
}

struct HostState {
    tokens: f64,
    last_refill: Instant,
    failure_count: u32,
    backoff_until: Option<Instant>,
}

impl HostState {
    fn new(config: &ThrottleConfig) -> Self {
        Self {
            tokens: config.max_tokens,
            last_refill: Instant::now(),
            failure_count: 0,
            backoff_until: None,
        }
    }

    fn refill(&mut self, config: &ThrottleConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.refill_rate).min(config.max_tokens);
        self.last_refill = now;
    }

    fn in_backoff(&self, now: Instant) -> bool {
        matches!(self.backoff_until, Some(until) if now < until)
    }
}

/// A per-host token bucket + exponential backoff tracker.
///
/// Host keys are lower-cased on every call; state is created lazily on
/// first reference and never garbage-collected for the lifetime of the
/// `HostThrottle` (acceptable for the bounded host population a single run
/// encounters).
pub struct HostThrottle {
    config: ThrottleConfig,
    hosts: Mutex<HashMap<String, HostState>>,
}

impl Default for HostThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

impl HostThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    fn key(host: &str) -> String {
        host.trim().to_lowercase()
    }

    /// `false` if the host is in backoff; otherwise refills and reports
    /// whether at least one token is available.
    pub fn can_proceed(&self, host: &str) -> bool {
        let key = Self::key(host);
        let mut hosts = self.hosts.lock();
        let now = Instant::now();
        let state = hosts.entry(key).or_insert_with(|| HostState::new(&self.config));

        if state.in_backoff(now) {
            return false;
        }
        state.refill(&self.config, now);
        state.tokens >= 1.0
    }

    /// Refills, then consumes one token if available. Does **not** check
    /// backoff — callers must gate with `can_proceed` first.
    pub fn consume(&self, host: &str) -> bool {
        let key = Self::key(host);
        let mut hosts = self.hosts.lock();
        let now = Instant::now();
        let state = hosts.entry(key).or_insert_with(|| HostState::new(&self.config));

        state.refill(&self.config, now);
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Ends a failure streak: resets the failure counter and lifts backoff.
    pub fn record_success(&self, host: &str) {
        let key = Self::key(host);
        let mut hosts = self.hosts.lock();
        let state = hosts
            .entry(key)
            .or_insert_with(|| HostState::new(&self.config));
        state.failure_count = 0;
        state.backoff_until = None;
    }

    /// Records a failure. Once `failure_count` reaches `failure_threshold`,
    /// enters (or extends) backoff for
    /// `min(max_backoff, initial_backoff * backoff_multiplier^(failure_count - failure_threshold))`.
    pub fn record_failure(&self, host: &str) {
        let key = Self::key(host);
        let mut hosts = self.hosts.lock();
        let now = Instant::now();
        let state = hosts
            .entry(key)
            .or_insert_with(|| HostState::new(&self.config));

        state.failure_count += 1;
        if state.failure_count >= self.config.failure_threshold {
            let overage = (state.failure_count - self.config.failure_threshold) as i32;
            let backoff_secs = self.config.initial_backoff.as_secs_f64()
                * self.config.backoff_multiplier.powi(overage);
            let backoff = Duration::from_secs_f64(backoff_secs).min(self.config.max_backoff);
            state.backoff_until = Some(now + backoff);
            tracing::debug!(host = %key, failure_count = state.failure_count, ?backoff, "host entering backoff");
        }
    }

    /// Milliseconds to wait before the host would accept a probe: the
    /// remaining backoff if in backoff, else 0 if a token is available,
    /// else the time until one refills.
    pub fn get_wait_time_ms(&self, host: &str) -> u64 {
        let key = Self::key(host);
        let mut hosts = self.hosts.lock();
        let now = Instant::now();
        let state = hosts
            .entry(key)
            .or_insert_with(|| HostState::new(&self.config));

        if let Some(until) = state.backoff_until {
            if now < until {
                return until.saturating_duration_since(now).as_millis() as u64;
            }
        }

        state.refill(&self.config, now);
        if state.tokens >= 1.0 {
            0
        } else {
            let seconds_needed = (1.0 - state.tokens) / self.config.refill_rate;
            (seconds_needed * 1000.0).ceil() as u64
        }
    }

    pub fn reset(&self, host: &str) {
        let key = Self::key(host);
        self.hosts.lock().remove(&key);
    }

    pub fn clear(&self) {
        self.hosts.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> ThrottleConfig {
        ThrottleConfig {
            max_tokens: 3.0,
            refill_rate: 1000.0, // fast refill so tests don't sleep for seconds
            failure_threshold: 2,
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(80),
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn starts_with_full_bucket() {
        let t = HostThrottle::new(fast_config());
        assert!(t.can_proceed("mx.example.com"));
        assert!(t.consume("mx.example.com"));
    }

    #[test]
    fn host_keys_are_case_insensitive() {
        let t = HostThrottle::new(fast_config());
        assert!(t.consume("MX.Example.COM"));
        // Draws from the same bucket as the lower-cased key.
        assert!(t.consume("mx.example.com"));
        assert!(t.consume("mx.EXAMPLE.com"));
    }

    #[test]
    fn exhausting_tokens_blocks_consume() {
        let t = HostThrottle::new(ThrottleConfig {
            max_tokens: 1.0,
            refill_rate: 0.0001,
            ..fast_config()
        });
        assert!(t.consume("h"));
        assert!(!t.consume("h"));
    }

    #[test]
    fn success_resets_failure_streak_and_backoff() {
        let t = HostThrottle::new(fast_config());
        t.record_failure("h");
        t.record_failure("h");
        assert!(!t.can_proceed("h"), "should be in backoff after threshold failures");
        t.record_success("h");
        assert!(t.can_proceed("h"));
    }

    #[test]
    fn backoff_grows_monotonically_with_more_failures() {
        let t = HostThrottle::new(fast_config());
        t.record_failure("h"); // 1 failure: below threshold
        let wait_below_threshold = t.get_wait_time_ms("h");
        assert_eq!(wait_below_threshold, 0);

        t.record_failure("h"); // 2 failures: hits threshold, backoff = 20ms
        let wait_at_threshold = t.get_wait_time_ms("h");
        assert!(wait_at_threshold > 0);

        t.record_failure("h"); // 3 failures: backoff = 40ms
        let wait_one_more = t.get_wait_time_ms("h");
        assert!(
            wait_one_more >= wait_at_threshold,
            "backoff should not shrink: {wait_at_threshold} -> {wait_one_more}"
        );
    }

    #[test]
    fn backoff_is_capped_at_max_backoff() {
        let t = HostThrottle::new(fast_config());
        for _ in 0..20 {
            t.record_failure("h");
        }
        let wait = t.get_wait_time_ms("h");
        assert!(wait <= 80, "wait {wait} exceeded max_backoff");
    }

    #[test]
    fn reset_clears_single_host_state() {
        let t = HostThrottle::new(fast_config());
        t.record_failure("h");
        t.record_failure("h");
        t.reset("h");
        assert!(t.can_proceed("h"));
    }

    #[test]
    fn clear_resets_all_hosts() {
        let t = HostThrottle::new(fast_config());
        t.record_failure("a");
        t.record_failure("a");
        t.record_failure("b");
        t.record_failure("b");
        t.clear();
        assert!(t.can_proceed("a"));
        assert!(t.can_proceed("b"));
    }

    #[test]
    fn consume_does_not_check_backoff() {
        let t = HostThrottle::new(ThrottleConfig {
            max_tokens: 5.0,
            ..fast_config()
        });
        t.record_failure("h");
        t.record_failure("h");
        assert!(!t.can_proceed("h"));
        // consume() ignores backoff and still draws from the bucket.
        assert!(t.consume("h"));
    }
}
