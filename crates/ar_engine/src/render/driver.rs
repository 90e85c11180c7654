//! GPU driver abstraction
//!
//! The driver is the only place that touches the graphics API. Everything
//! above it (the AR renderer, post-process passes) prepares state and hands
//! it down through this trait.

use crate::foundation::math::Vec4;
use crate::render::post_process::PostProcessProgram;
use crate::render::texture::RenderTargetHandle;
use crate::render::{RenderError, Viewport};

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// Draw both faces
    None,
    /// Cull back faces
    Back,
    /// Cull front faces
    Front,
}

/// Handle to a compiled post-process program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Graphics backend driver
pub trait Driver: Send {
    /// Enable depth testing for subsequent draws
    fn enable_depth_test(&mut self);

    /// Set the face culling mode
    fn set_cull_mode(&mut self, mode: CullMode);

    /// Set the active viewport
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clear color, depth and stencil buffers
    fn clear(&mut self, color: Vec4);

    /// The host application was paused
    fn on_pause(&mut self);

    /// The host application was resumed
    fn on_resume(&mut self);

    /// Compile a full-screen post-process program
    fn compile_post_process(&mut self, program: &PostProcessProgram) -> Result<ProgramHandle, RenderError>;

    /// Free a program returned by [`Driver::compile_post_process`]
    fn release_post_process(&mut self, program: ProgramHandle);

    /// Run `program` over `source`, writing into `target`.
    ///
    /// `uniforms` is the raw per-pass uniform block for the program.
    fn blit(
        &mut self,
        program: ProgramHandle,
        source: RenderTargetHandle,
        target: RenderTargetHandle,
        uniforms: &[u8],
    ) -> Result<(), RenderError>;
}
