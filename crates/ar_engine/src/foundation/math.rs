//! Math utilities and types
//!
//! Provides the nalgebra aliases used across the renderer plus the
//! field-of-view description the AR camera and the frame renderer share.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Asymmetric field of view, expressed as four half-angles in degrees
/// measured from the view axis.
///
/// AR cameras report off-center frusta (the principal point is rarely
/// centered), so each side is stored independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    /// Angle between the view axis and the left frustum plane
    pub left: f32,
    /// Angle between the view axis and the right frustum plane
    pub right: f32,
    /// Angle between the view axis and the bottom frustum plane
    pub bottom: f32,
    /// Angle between the view axis and the top frustum plane
    pub top: f32,
}

impl FieldOfView {
    /// Create a field of view from its four half-angles (degrees)
    pub const fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self { left, right, bottom, top }
    }

    /// Symmetric monocular field of view for a viewport.
    ///
    /// The horizontal angle is fixed; the vertical angle is derived from the
    /// viewport aspect so pixels stay square. A degenerate viewport (zero
    /// width or height) falls back to a square aspect.
    ///
    /// # Arguments
    /// * `fov_x_degrees` - Full horizontal field of view in degrees
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    pub fn mono(fov_x_degrees: f32, width: u32, height: u32) -> Self {
        let half_x = utils::deg_to_rad(fov_x_degrees * 0.5);
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            height as f32 / width as f32
        };
        let half_y = utils::rad_to_deg((half_x.tan() * aspect).atan());
        let half_x = fov_x_degrees * 0.5;

        Self::new(half_x, half_x, half_y, half_y)
    }

    /// Full horizontal angle in degrees
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Full vertical angle in degrees
    pub fn vertical(&self) -> f32 {
        self.bottom + self.top
    }

    /// Build an OpenGL-style off-center perspective projection.
    ///
    /// # Arguments
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn to_perspective_projection(&self, near: f32, far: f32) -> Mat4 {
        let left = -utils::deg_to_rad(self.left).tan() * near;
        let right = utils::deg_to_rad(self.right).tan() * near;
        let bottom = -utils::deg_to_rad(self.bottom).tan() * near;
        let top = utils::deg_to_rad(self.top).tan() * near;

        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        Mat4::new(
            2.0 * near / width, 0.0, (right + left) / width, 0.0,
            0.0, 2.0 * near / height, (top + bottom) / height, 0.0,
            0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth,
            0.0, 0.0, -1.0, 0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mono_fov_square_viewport_is_symmetric() {
        let fov = FieldOfView::mono(90.0, 512, 512);
        assert_relative_eq!(fov.left, 45.0);
        assert_relative_eq!(fov.right, 45.0);
        assert_relative_eq!(fov.top, 45.0, epsilon = 1e-4);
        assert_relative_eq!(fov.bottom, 45.0, epsilon = 1e-4);
    }

    #[test]
    fn test_mono_fov_portrait_is_taller() {
        let fov = FieldOfView::mono(60.0, 1080, 1920);
        assert_relative_eq!(fov.horizontal(), 60.0);
        assert!(fov.vertical() > fov.horizontal());
    }

    #[test]
    fn test_mono_fov_degenerate_viewport() {
        let fov = FieldOfView::mono(60.0, 0, 0);
        assert_relative_eq!(fov.vertical(), 60.0, epsilon = 1e-4);
    }

    #[test]
    fn test_symmetric_projection_matches_nalgebra() {
        let fov = FieldOfView::mono(90.0, 100, 100);
        let projection = fov.to_perspective_projection(0.1, 100.0);
        let expected = nalgebra::Perspective3::new(1.0, utils::deg_to_rad(90.0), 0.1, 100.0);

        assert_relative_eq!(projection, expected.to_homogeneous(), epsilon = 1e-4);
    }

    #[test]
    fn test_off_center_projection_shifts_principal_point() {
        let fov = FieldOfView::new(30.0, 40.0, 35.0, 35.0);
        let projection = fov.to_perspective_projection(0.01, 50.0);
        assert!(projection[(0, 2)] > 0.0);
        assert_relative_eq!(projection[(1, 2)], 0.0, epsilon = 1e-6);
        assert_relative_eq!(projection[(3, 2)], -1.0);
    }
}
