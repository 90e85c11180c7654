//! Input handling
//!
//! Screen touches reach the scene through an [`InputController`] owned by the
//! frame renderer. The AR renderer forwards raw touch events to it and tells
//! it about pause/resume.

use crate::foundation::sync::{lock, shared, Shared};

/// Touch phase, matching the platform's motion event codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// Finger went down
    Down,
    /// Finger lifted
    Up,
    /// Finger moved while down
    Move,
    /// Gesture aborted by the system
    Cancel,
}

impl TouchAction {
    /// Decode a platform motion event action code
    pub fn from_raw(action: i32) -> Option<Self> {
        match action {
            0 => Some(Self::Down),
            1 => Some(Self::Up),
            2 => Some(Self::Move),
            3 => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Receives input events for the presented scene
pub trait InputController: Send {
    /// A touch event on the output surface, in surface pixels
    fn on_screen_touch(&mut self, action: TouchAction, x: f32, y: f32);

    /// The host application was paused
    fn on_pause(&mut self);

    /// The host application was resumed
    fn on_resume(&mut self);
}

/// Snapshot of a [`ScreenTouchController`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchState {
    /// A finger is currently down
    pub touching: bool,
    /// Position of the most recent accepted event
    pub position: Option<(f32, f32)>,
    /// Accepted events since creation
    pub events: u64,
    /// True between pause and resume
    pub paused: bool,
}

/// Controller treating the whole screen as a single pointer.
///
/// Clones share state, so a handle kept outside the renderer observes the
/// events forwarded to the one inside it.
#[derive(Debug, Clone)]
pub struct ScreenTouchController {
    state: Shared<TouchState>,
}

impl Default for ScreenTouchController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenTouchController {
    /// Create a controller with no touch in progress
    pub fn new() -> Self {
        Self {
            state: shared(TouchState::default()),
        }
    }

    /// Current touch state
    pub fn state(&self) -> TouchState {
        lock(&self.state).clone()
    }
}

impl InputController for ScreenTouchController {
    fn on_screen_touch(&mut self, action: TouchAction, x: f32, y: f32) {
        let mut state = lock(&self.state);
        if state.paused {
            log::trace!("Dropping {:?} touch while paused", action);
            return;
        }

        state.touching = matches!(action, TouchAction::Down | TouchAction::Move);
        state.position = Some((x, y));
        state.events += 1;
    }

    fn on_pause(&mut self) {
        let mut state = lock(&self.state);
        state.paused = true;
        state.touching = false;
    }

    fn on_resume(&mut self) {
        lock(&self.state).paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_action_codes() {
        assert_eq!(TouchAction::from_raw(0), Some(TouchAction::Down));
        assert_eq!(TouchAction::from_raw(3), Some(TouchAction::Cancel));
        assert_eq!(TouchAction::from_raw(7), None);
    }

    #[test]
    fn test_touch_sequence() {
        let mut controller = ScreenTouchController::new();
        let observer = controller.clone();

        controller.on_screen_touch(TouchAction::Down, 10.0, 20.0);
        assert!(observer.state().touching);

        controller.on_screen_touch(TouchAction::Up, 12.0, 22.0);
        let state = observer.state();
        assert!(!state.touching);
        assert_eq!(state.position, Some((12.0, 22.0)));
        assert_eq!(state.events, 2);
    }

    #[test]
    fn test_pause_cancels_and_drops_touches() {
        let mut controller = ScreenTouchController::new();
        controller.on_screen_touch(TouchAction::Down, 1.0, 1.0);
        controller.on_pause();
        controller.on_screen_touch(TouchAction::Move, 2.0, 2.0);

        let state = controller.state();
        assert!(!state.touching);
        assert_eq!(state.events, 1);

        controller.on_resume();
        controller.on_screen_touch(TouchAction::Move, 3.0, 3.0);
        assert_eq!(controller.state().events, 2);
    }
}
