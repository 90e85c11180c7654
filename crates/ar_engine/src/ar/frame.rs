//! Per-tick AR frame snapshots

use crate::foundation::math::{FieldOfView, Mat4, Vec3};
use crate::render::texture::QuadTexcoords;

/// Camera tracking quality reported by the AR session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// Session started, no pose yet
    Initializing,
    /// Full-quality pose
    Normal,
    /// Pose available but degraded (fast motion, low features)
    Limited,
    /// No pose
    #[default]
    NotAvailable,
}

/// Scene lighting estimated from the camera image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLightEstimate {
    /// Intensity in lumens
    pub intensity: f32,
    /// Color temperature in Kelvin
    pub color_temperature: f32,
}

impl Default for AmbientLightEstimate {
    fn default() -> Self {
        Self {
            intensity: 1000.0,
            color_temperature: 6500.0,
        }
    }
}

impl AmbientLightEstimate {
    /// Create an estimate
    pub const fn new(intensity: f32, color_temperature: f32) -> Self {
        Self {
            intensity,
            color_temperature,
        }
    }
}

/// Everything the renderer reads from the AR session for one tick.
///
/// Produced by [`crate::ar::ArSession::update_frame`] and consumed by the
/// renderer within the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera orientation
    pub rotation: Mat4,
    /// Camera field of view
    pub fov: FieldOfView,
    /// Tracking quality
    pub tracking_state: TrackingState,
    /// The display rotated since the previous frame
    pub display_rotation_changed: bool,
    /// Lighting estimate
    pub ambient_light: AmbientLightEstimate,
    /// Corner UVs mapping the camera image onto the display
    pub background_texcoords: QuadTexcoords,
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Mat4::identity(),
            fov: FieldOfView::new(30.0, 30.0, 30.0, 30.0),
            tracking_state: TrackingState::default(),
            display_rotation_changed: false,
            ambient_light: AmbientLightEstimate::default(),
            background_texcoords: QuadTexcoords::unit(),
        }
    }
}

impl FrameSnapshot {
    /// Snapshot with no pose and no tracking
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tracking state
    pub fn with_tracking_state(mut self, state: TrackingState) -> Self {
        self.tracking_state = state;
        self
    }

    /// Set the camera position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the camera orientation
    pub fn with_rotation(mut self, rotation: Mat4) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the field of view
    pub fn with_fov(mut self, fov: FieldOfView) -> Self {
        self.fov = fov;
        self
    }

    /// Flag a display rotation
    pub fn with_display_rotation_changed(mut self, changed: bool) -> Self {
        self.display_rotation_changed = changed;
        self
    }

    /// Set the lighting estimate
    pub fn with_ambient_light(mut self, intensity: f32, color_temperature: f32) -> Self {
        self.ambient_light = AmbientLightEstimate::new(intensity, color_temperature);
        self
    }

    /// Set the background texture coordinates
    pub fn with_background_texcoords(mut self, texcoords: QuadTexcoords) -> Self {
        self.background_texcoords = texcoords;
        self
    }

    /// Projection matrix for this frame's camera
    pub fn projection(&self, near: f32, far: f32) -> Mat4 {
        self.fov.to_perspective_projection(near, far)
    }

    /// True when the camera has left the origin
    pub fn has_position(&self) -> bool {
        self.position != Vec3::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_snapshot_has_no_pose() {
        let snapshot = FrameSnapshot::new();
        assert_eq!(snapshot.tracking_state, TrackingState::NotAvailable);
        assert!(!snapshot.has_position());
        assert_eq!(snapshot.rotation, Mat4::identity());
    }

    #[test]
    fn test_projection_uses_snapshot_fov() {
        let fov = FieldOfView::new(40.0, 40.0, 30.0, 30.0);
        let snapshot = FrameSnapshot::new().with_fov(fov);
        let projection = snapshot.projection(0.01, 50.0);
        assert_relative_eq!(projection, fov.to_perspective_projection(0.01, 50.0));
    }

    #[test]
    fn test_position_detection() {
        let snapshot = FrameSnapshot::new().with_position(Vec3::new(0.0, 0.0, -0.1));
        assert!(snapshot.has_position());
    }
}
