//! Time management utilities
//!
//! The renderer never reads the wall clock directly. It goes through a
//! [`Clock`] so rate-limited diagnostics can be driven deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send {
    /// Time elapsed since the clock's epoch
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`], with its epoch at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a new system clock starting now
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced clock.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the renderer.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, delta: Duration) {
        let nanos = u64::try_from(delta.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Duration) {
        let nanos = u64::try_from(now.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(nanos, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Rate limiter: lets an event through at most once per interval.
///
/// A throttle from [`Throttle::new`] fires on its first call. One from
/// [`Throttle::starting_at`] counts as having fired at the start time.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Duration>,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing between events
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Create a throttle whose first event waits a full interval after `start`
    pub fn starting_at(interval: Duration, start: Duration) -> Self {
        Self {
            interval,
            last_fired: Some(start),
        }
    }

    /// Minimum spacing between events
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time of the last event that was let through
    pub fn last_fired(&self) -> Option<Duration> {
        self.last_fired
    }

    /// Returns true (and records `now`) if an event may fire at `now`
    pub fn try_fire(&mut self, now: Duration) -> bool {
        let ready = self
            .last_fired
            .map_or(true, |last| now.saturating_sub(last) >= self.interval);
        if ready {
            self.last_fired = Some(now);
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(16));
        other.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn test_throttle_first_event_fires() {
        let mut throttle = Throttle::new(Duration::from_millis(200));
        assert!(throttle.try_fire(Duration::ZERO));
        assert!(!throttle.try_fire(Duration::from_millis(199)));
        assert!(throttle.try_fire(Duration::from_millis(200)));
        assert_eq!(throttle.last_fired(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn test_throttle_over_one_second_of_ticks() {
        let mut throttle = Throttle::new(Duration::from_millis(200));
        let fired = (0..63u64)
            .filter(|tick| throttle.try_fire(Duration::from_millis(tick * 16)))
            .count();
        assert_eq!(fired, 5);
    }

    #[test]
    fn test_throttle_starting_at_waits_full_interval() {
        let mut throttle = Throttle::starting_at(Duration::from_millis(200), Duration::from_millis(50));
        assert!(!throttle.try_fire(Duration::from_millis(50)));
        assert!(!throttle.try_fire(Duration::from_millis(249)));
        assert!(throttle.try_fire(Duration::from_millis(250)));
    }
}
