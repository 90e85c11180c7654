//! # Rendering System
//!
//! Backend-agnostic rendering layer for the AR renderer.
//!
//! ## Architecture
//!
//! - **Driver**: the only code that talks to a graphics API
//! - **Frame Renderer**: draws the scene for prepared camera matrices
//! - **Post Process**: full-screen passes such as the Gaussian blur for bloom
//! - **Headless**: recording implementations for tests and GPU-less runs

pub mod driver;
pub mod frame_renderer;
pub mod headless;
pub mod post_process;
pub mod texture;
pub mod viewport;

pub use driver::{CullMode, Driver, ProgramHandle};
pub use frame_renderer::{EyeType, FrameRenderer};
pub use texture::{QuadTexcoords, RenderTargetHandle, TextureHandle};
pub use viewport::Viewport;

/// Rendering system errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A post-process program failed to compile
    ///
    /// Usually a driver or shader-cache problem; the pass retries on its
    /// next render.
    #[error("Program compilation failed: {0}")]
    ProgramCompilationFailed(String),

    /// A pass was asked to read or write a target that wasn't bound
    #[error("Render target not bound: {0}")]
    MissingRenderTarget(String),
}
