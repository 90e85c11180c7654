//! Output viewport rectangle

/// Pixel rectangle the renderer draws into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: i32,
    /// Bottom edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin covering a full surface
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Center point in pixels
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_includes_origin_offset() {
        let viewport = Viewport::new(10, 20, 100, 50);
        assert_eq!(viewport.center(), (60.0, 45.0));
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::default().is_empty());
        assert!(!Viewport::from_size(1, 1).is_empty());
    }
}
