//! Post-process program descriptions and their uniform blocks
//!
//! Shader-affecting settings are baked into the program description, which is
//! why changing them forces a recompile.

use bytemuck::{Pod, Zeroable};

/// Description of a full-screen program for [`crate::render::Driver::compile_post_process`]
#[derive(Debug, Clone, PartialEq)]
pub enum PostProcessProgram {
    /// Conditions the input before blurring
    PreBlur {
        /// Multiplier applied to input RGB
        reinforced_intensity: f32,
        /// Un-premultiply alpha before scaling so translucent texels aren't darkened
        consider_transparent_pixels: bool,
    },
    /// One separable Gaussian pass, direction picked per blit
    GaussianBlur {
        /// Tap weights, ordered by offset
        weights: Vec<f32>,
        /// Tap offsets in texels along the blur direction
        offsets: Vec<f32>,
    },
}

impl PostProcessProgram {
    /// Short name for logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::PreBlur { .. } => "gaussian_pre_blur",
            Self::GaussianBlur { .. } => "gaussian_blur",
        }
    }
}

/// Per-pass uniforms for the Gaussian blur program
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BlurPassUniforms {
    /// Unit texel step: (1, 0) horizontal, (0, 1) vertical
    pub direction: [f32; 2],
    /// Padding to a 16-byte block
    pub _padding: [f32; 2],
}

impl BlurPassUniforms {
    /// Uniforms for a horizontal or vertical pass
    pub fn new(horizontal: bool) -> Self {
        let direction = if horizontal { [1.0, 0.0] } else { [0.0, 1.0] };
        Self {
            direction,
            _padding: [0.0; 2],
        }
    }

    /// True for a horizontal pass
    pub fn is_horizontal(&self) -> bool {
        self.direction[0] > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_uniform_layout() {
        assert_eq!(std::mem::size_of::<BlurPassUniforms>(), 16);
        let uniforms = BlurPassUniforms::new(false);
        let bytes = bytemuck::bytes_of(&uniforms);
        let decoded: BlurPassUniforms = bytemuck::pod_read_unaligned(bytes);
        assert!(!decoded.is_horizontal());
    }
}
