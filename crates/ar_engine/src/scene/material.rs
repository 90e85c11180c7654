//! Surface materials
//!
//! Only what the AR background needs: a lighting model, an optional diffuse
//! texture and the depth-write switch.

use crate::render::texture::TextureHandle;

/// How a material responds to scene lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingModel {
    /// Unlit; the diffuse color or texture is shown as is
    Constant,
    /// Lambertian diffuse
    Lambert,
    /// Blinn-Phong diffuse and specular
    #[default]
    Blinn,
}

/// Material applied to a surface
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Lighting model
    pub lighting_model: LightingModel,
    /// Texture sampled for the diffuse channel
    pub diffuse_texture: Option<TextureHandle>,
    /// Whether fragments write to the depth buffer
    pub writes_to_depth_buffer: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            lighting_model: LightingModel::default(),
            diffuse_texture: None,
            writes_to_depth_buffer: true,
        }
    }
}

impl Material {
    /// Create a lit, depth-writing material with no texture
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lighting model
    pub fn with_lighting_model(mut self, model: LightingModel) -> Self {
        self.lighting_model = model;
        self
    }

    /// Set the diffuse texture
    pub fn with_diffuse_texture(mut self, texture: TextureHandle) -> Self {
        self.diffuse_texture = Some(texture);
        self
    }

    /// Enable or disable depth writes
    pub fn with_depth_writes(mut self, enabled: bool) -> Self {
        self.writes_to_depth_buffer = enabled;
        self
    }

    /// Unlit textured material that never occludes anything.
    ///
    /// Used for the camera passthrough so virtual content always draws on top.
    pub fn camera_background(texture: TextureHandle) -> Self {
        Self::new()
            .with_lighting_model(LightingModel::Constant)
            .with_diffuse_texture(texture)
            .with_depth_writes(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_background_material() {
        let material = Material::camera_background(TextureHandle(9));
        assert_eq!(material.lighting_model, LightingModel::Constant);
        assert_eq!(material.diffuse_texture, Some(TextureHandle(9)));
        assert!(!material.writes_to_depth_buffer);
    }
}
