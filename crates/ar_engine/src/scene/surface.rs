//! Screen-space surfaces

use crate::foundation::sync::Shared;
use crate::render::texture::QuadTexcoords;
use crate::scene::material::Material;

/// A textured quad.
///
/// Screen-space surfaces are positioned in output pixels by their center,
/// ignoring the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    name: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    screen_space: bool,
    texcoords: QuadTexcoords,
    material: Material,
}

/// Surface shared between the renderer and the scene graph
pub type SharedSurface = Shared<Surface>;

impl Surface {
    /// Create a screen-space quad centered at `(x, y)`
    pub fn screen_space(name: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            screen_space: true,
            texcoords: QuadTexcoords::unit(),
            material: Material::default(),
        }
    }

    /// Attach a material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Surface name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Move and resize the quad
    pub fn set_frame(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    /// Center of the quad
    pub fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Size of the quad
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// True if the quad is positioned in output pixels
    pub fn is_screen_space(&self) -> bool {
        self.screen_space
    }

    /// Corner texture coordinates
    pub fn texcoords(&self) -> &QuadTexcoords {
        &self.texcoords
    }

    /// Replace the corner texture coordinates
    pub fn set_texcoords(&mut self, texcoords: QuadTexcoords) {
        self.texcoords = texcoords;
    }

    /// Surface material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Replace the surface material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    #[test]
    fn test_set_frame() {
        let mut surface = Surface::screen_space("Camera", 50.0, 25.0, 100.0, 50.0);
        surface.set_frame(320.0, 240.0, 640.0, 480.0);
        assert_eq!(surface.center(), (320.0, 240.0));
        assert_eq!(surface.size(), (640.0, 480.0));
        assert!(surface.is_screen_space());
    }

    #[test]
    fn test_texcoords_replace() {
        let mut surface = Surface::screen_space("Camera", 0.0, 0.0, 1.0, 1.0);
        assert_eq!(*surface.texcoords(), QuadTexcoords::unit());

        let flipped = QuadTexcoords::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        );
        surface.set_texcoords(flipped);
        assert_eq!(*surface.texcoords(), flipped);
    }
}
