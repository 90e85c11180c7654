//! # AR Engine
//!
//! AR-aware scene rendering for phone AR.
//!
//! ## Features
//!
//! - **Tracking-gated rendering**: every display tick renders as suspended,
//!   waiting-for-tracking or tracking-active
//! - **Camera passthrough**: the session's camera feed composited behind the scene
//! - **Render-thread dispatch**: host calls queued onto the render thread
//! - **Gaussian blur pass**: ping-pong separable blur for bloom-style effects
//! - **Headless backend**: command-recording driver and frame renderer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ar_engine::prelude::*;
//!
//! let log = CommandLog::new();
//! let (session, _script) = ScriptedArSession::new();
//! let mut renderer = ArSceneRenderer::new(
//!     Box::new(session),
//!     Box::new(HeadlessFrameRenderer::new(log.clone())),
//!     Box::new(HeadlessDriver::new(log)),
//!     Box::new(SystemClock::new()),
//!     ArRendererConfig::default(),
//! );
//!
//! renderer.on_surface_changed(1080, 1920);
//! renderer.set_suspended(false);
//! renderer.set_scene_controller(SceneController::new(Scene::new_ar().into_shared()));
//! let mode = renderer.on_draw_frame();
//! println!("rendered as {:?}", mode);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss
)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;

pub mod ar;
pub mod bridge;
pub mod input;
pub mod render;
pub mod renderer;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        ar::{AnchorDetection, ArSession, FrameSnapshot, ScriptedArSession, TrackingState},
        bridge::{BridgeError, NativeRef, RendererBridge},
        config::{Config, ConfigError},
        core::{ArRendererConfig, BlurPassConfig, EngineConfig},
        foundation::{
            math::{FieldOfView, Mat4, Vec3, Vec4},
            time::{Clock, ManualClock, SystemClock},
        },
        input::{InputController, TouchAction},
        render::{
            headless::{CommandLog, HeadlessDriver, HeadlessFrameRenderer},
            post_process::{GaussianBlurPass, RenderPass, RenderPassIo},
            Driver, FrameRenderer, RenderError, RenderTargetHandle, Viewport,
        },
        renderer::{ArSceneRenderer, DispatchError, RenderMode, RendererProxy},
        scene::{Scene, SceneController, TimingFunction},
    };
}
