//! Per-renderer lifecycle flags

use std::time::Duration;

use crate::foundation::time::Throttle;

/// State that decides how each tick renders.
///
/// `tracking_initialized` only ever goes from false to true. `tracking_resumed`
/// latches on the first tracking frame of a session segment and is cleared
/// when the host resumes the app.
#[derive(Debug, Clone)]
pub struct RendererLifecycle {
    suspended: bool,
    tracking_initialized: bool,
    tracking_resumed: bool,
    frame: u64,
    suspended_warning: Throttle,
    suspended_warnings: u64,
}

impl RendererLifecycle {
    /// Fresh lifecycle created at `now`.
    ///
    /// Suspended warnings are spaced at least `warning_interval` apart, and
    /// the first one waits a full interval after `now`.
    pub fn new(warning_interval: Duration, suspended: bool, now: Duration) -> Self {
        Self {
            suspended,
            tracking_initialized: false,
            tracking_resumed: false,
            frame: 0,
            suspended_warning: Throttle::starting_at(warning_interval, now),
            suspended_warnings: 0,
        }
    }

    /// True while the host keeps the renderer suspended
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Suspend or unsuspend rendering
    pub fn set_suspended(&mut self, suspended: bool) {
        if self.suspended != suspended {
            log::debug!("Renderer {}", if suspended { "suspended" } else { "unsuspended" });
        }
        self.suspended = suspended;
    }

    /// True once the scene was told tracking initialized
    pub fn is_tracking_initialized(&self) -> bool {
        self.tracking_initialized
    }

    /// Latch `tracking_initialized`. Returns true only on the first call.
    pub fn latch_tracking_initialized(&mut self) -> bool {
        let first = !self.tracking_initialized;
        self.tracking_initialized = true;
        first
    }

    /// True once tracking was seen in this session segment
    pub fn has_tracking_resumed(&self) -> bool {
        self.tracking_resumed
    }

    /// Latch `tracking_resumed`
    pub fn mark_tracking_resumed(&mut self) {
        if !self.tracking_resumed {
            log::debug!("Tracking resumed at frame {}", self.frame);
        }
        self.tracking_resumed = true;
    }

    /// Start a new session segment
    pub fn reset_tracking_resumed(&mut self) {
        self.tracking_resumed = false;
    }

    /// Ticks completed so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Count a finished tick
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    /// Returns true if a suspended warning may be emitted at `now`, and counts it
    pub fn should_warn_suspended(&mut self, now: Duration) -> bool {
        let fire = self.suspended_warning.try_fire(now);
        if fire {
            self.suspended_warnings += 1;
        }
        fire
    }

    /// Suspended warnings emitted so far
    pub fn suspended_warnings(&self) -> u64 {
        self.suspended_warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_initialized_latches_once() {
        let mut lifecycle = RendererLifecycle::new(Duration::from_millis(200), false, Duration::ZERO);
        assert!(lifecycle.latch_tracking_initialized());
        assert!(!lifecycle.latch_tracking_initialized());
        assert!(lifecycle.is_tracking_initialized());
    }

    #[test]
    fn test_tracking_resumed_resets() {
        let mut lifecycle = RendererLifecycle::new(Duration::from_millis(200), false, Duration::ZERO);
        lifecycle.mark_tracking_resumed();
        assert!(lifecycle.has_tracking_resumed());
        lifecycle.reset_tracking_resumed();
        assert!(!lifecycle.has_tracking_resumed());
    }

    #[test]
    fn test_suspended_warnings_counted() {
        let mut lifecycle = RendererLifecycle::new(Duration::from_millis(200), true, Duration::ZERO);
        assert!(!lifecycle.should_warn_suspended(Duration::ZERO));
        assert!(!lifecycle.should_warn_suspended(Duration::from_millis(100)));
        assert!(lifecycle.should_warn_suspended(Duration::from_millis(250)));
        assert!(!lifecycle.should_warn_suspended(Duration::from_millis(300)));
        assert!(lifecycle.should_warn_suspended(Duration::from_millis(450)));
        assert_eq!(lifecycle.suspended_warnings(), 2);
    }

    #[test]
    fn test_starts_in_requested_suspended_state() {
        assert!(RendererLifecycle::new(Duration::from_millis(200), true, Duration::ZERO).is_suspended());
        assert!(!RendererLifecycle::new(Duration::from_millis(200), false, Duration::ZERO).is_suspended());
    }
}
