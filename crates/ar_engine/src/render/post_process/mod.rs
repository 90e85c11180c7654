//! Post-processing passes
//!
//! Full-screen passes that run after the scene is drawn. Each pass consumes
//! named render targets and writes named outputs (see [`RenderPassIo`]).

pub mod gaussian_blur;
pub mod kernel;
pub mod pass;
pub mod program;

pub use gaussian_blur::{GaussianBlurPass, GAUSSIAN_INPUT, GAUSSIAN_PING_PONG};
pub use kernel::BlurKernel;
pub use pass::{RenderContext, RenderPass, RenderPassIo, RENDER_TARGET_SINGLE_OUTPUT};
pub use program::{BlurPassUniforms, PostProcessProgram};
