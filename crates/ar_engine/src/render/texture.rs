//! Texture and render target handles

use crate::foundation::math::Vec2;

/// Opaque handle to a GPU texture owned by the driver or the AR session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Opaque handle to an off-screen render target owned by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetHandle(pub u64);

/// Texture coordinates for the four corners of a quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTexcoords {
    /// Bottom-left corner
    pub bottom_left: Vec2,
    /// Bottom-right corner
    pub bottom_right: Vec2,
    /// Top-left corner
    pub top_left: Vec2,
    /// Top-right corner
    pub top_right: Vec2,
}

impl Default for QuadTexcoords {
    /// The full texture, unrotated
    fn default() -> Self {
        Self::unit()
    }
}

impl QuadTexcoords {
    /// Create texcoords from explicit corners
    pub fn new(bottom_left: Vec2, bottom_right: Vec2, top_left: Vec2, top_right: Vec2) -> Self {
        Self {
            bottom_left,
            bottom_right,
            top_left,
            top_right,
        }
    }

    /// Map the quad onto the full `[0, 1]` texture range
    pub fn unit() -> Self {
        Self::from_bounds(0.0, 0.0, 1.0, 1.0)
    }

    /// Axis-aligned texcoords covering `[u0, u1] x [v0, v1]`
    pub fn from_bounds(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self::new(
            Vec2::new(u0, v0),
            Vec2::new(u1, v0),
            Vec2::new(u0, v1),
            Vec2::new(u1, v1),
        )
    }
}
