//! Base render pass trait for post-processing.

use std::collections::HashMap;

use crate::render::driver::Driver;
use crate::render::texture::RenderTargetHandle;
use crate::render::{RenderError, Viewport};
use crate::scene::Scene;

/// Key for a pass that writes a single output target
pub const RENDER_TARGET_SINGLE_OUTPUT: &str = "RT_Output";

/// Named render targets a pass reads from and writes to
#[derive(Debug, Clone, Default)]
pub struct RenderPassIo {
    /// Targets the pass samples, by key
    pub inputs: HashMap<String, RenderTargetHandle>,
    /// Targets the pass writes, by key
    pub outputs: HashMap<String, RenderTargetHandle>,
}

impl RenderPassIo {
    /// Create empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an input target
    pub fn with_input(mut self, key: impl Into<String>, target: RenderTargetHandle) -> Self {
        self.inputs.insert(key.into(), target);
        self
    }

    /// Bind an output target
    pub fn with_output(mut self, key: impl Into<String>, target: RenderTargetHandle) -> Self {
        self.outputs.insert(key.into(), target);
        self
    }

    /// Look up a bound input
    pub fn input(&self, key: &str) -> Result<RenderTargetHandle, RenderError> {
        self.inputs
            .get(key)
            .copied()
            .ok_or_else(|| RenderError::MissingRenderTarget(key.to_string()))
    }

    /// Look up a bound output
    pub fn output(&self, key: &str) -> Result<RenderTargetHandle, RenderError> {
        self.outputs
            .get(key)
            .copied()
            .ok_or_else(|| RenderError::MissingRenderTarget(key.to_string()))
    }
}

/// Per-frame information available to passes
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    /// Frame counter of the tick being rendered
    pub frame: u64,
    /// Viewport of the output surface
    pub viewport: Viewport,
}

/// A render pass in the post-processing pipeline.
pub trait RenderPass {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Render this pass.
    ///
    /// # Arguments
    /// * `scene` - Scene being presented, if any
    /// * `outgoing_scene` - Scene being transitioned away from, if any
    /// * `io` - Named input and output targets
    /// * `context` - Frame information
    /// * `driver` - Driver executing the GPU work
    fn render(
        &mut self,
        scene: Option<&Scene>,
        outgoing_scene: Option<&Scene>,
        io: &mut RenderPassIo,
        context: &RenderContext,
        driver: &mut dyn Driver,
    ) -> Result<(), RenderError>;
}
