//! Main frame renderer contract
//!
//! The AR scene renderer decides *what* to draw each tick; the frame renderer
//! executes it. Every tick drives the same ordered sequence:
//!
//! 1. [`FrameRenderer::prepare_frame`]
//! 2. [`Driver::set_viewport`]
//! 3. [`FrameRenderer::render_eye`]
//! 4. [`FrameRenderer::end_frame`]
//!
//! Skipping or reordering steps leaves GPU state inconsistent.

use crate::foundation::math::{FieldOfView, Mat4};
use crate::input::InputController;
use crate::render::driver::Driver;
use crate::render::Viewport;
use crate::scene::{SceneController, SceneTransition, SharedNode};

/// Horizontal field of view used when no AR camera is available
pub const DEFAULT_MONO_FOV_X: f32 = 60.0;

/// Far clipping plane used when the renderer isn't told otherwise
pub const DEFAULT_FAR_CLIPPING_PLANE: f32 = 50.0;

/// Which eye a render pass is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeType {
    /// Single full-screen view (phone AR)
    Monocular,
    /// Left eye of a stereo pair
    Left,
    /// Right eye of a stereo pair
    Right,
}

/// Renderer that turns prepared camera state into GPU work
pub trait FrameRenderer: Send {
    /// Node whose camera the scene is rendered from
    fn set_point_of_view(&mut self, node: SharedNode);

    /// Present a new scene, optionally animating the change
    fn set_scene_controller(&mut self, controller: SceneController, transition: Option<SceneTransition>);

    /// Distance to the far clipping plane
    fn far_clipping_plane(&self) -> f32 {
        DEFAULT_FAR_CLIPPING_PLANE
    }

    /// Set the horizontal field of view used by [`FrameRenderer::compute_mono_fov`].
    ///
    /// Renderers that derive their field of view elsewhere may ignore it.
    fn set_mono_fov_x(&mut self, _degrees: f32) {}

    /// Synthesized field of view for a viewport of the given size
    fn compute_mono_fov(&self, width: u32, height: u32) -> FieldOfView {
        FieldOfView::mono(DEFAULT_MONO_FOV_X, width, height)
    }

    /// Begin a frame: update scene state for the given camera
    fn prepare_frame(
        &mut self,
        frame: u64,
        viewport: Viewport,
        fov: FieldOfView,
        rotation: &Mat4,
        projection: &Mat4,
        driver: &mut dyn Driver,
    );

    /// Draw the scene for one eye
    fn render_eye(
        &mut self,
        eye: EyeType,
        view: &Mat4,
        projection: &Mat4,
        viewport: Viewport,
        driver: &mut dyn Driver,
    );

    /// Finish the frame
    fn end_frame(&mut self, driver: &mut dyn Driver);

    /// Controller receiving touch and gaze input
    fn input_controller(&mut self) -> &mut dyn InputController;
}
