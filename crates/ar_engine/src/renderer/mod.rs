//! # AR Renderer
//!
//! The per-view AR render loop, its lifecycle state and the task queue that
//! lets host threads drive it.

pub mod ar_scene_renderer;
pub mod dispatch;
pub mod lifecycle;


pub use ar_scene_renderer::{ArSceneRenderer, RenderMode, CAMERA_BACKGROUND_NAME, POINT_OF_VIEW_NAME};
pub use dispatch::{DispatchError, RenderTask, RendererProxy};
pub use lifecycle::RendererLifecycle;
