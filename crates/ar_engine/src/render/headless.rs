//! Headless backend
//!
//! A [`Driver`] and a [`FrameRenderer`] that draw nothing and record every
//! call into a shared [`CommandLog`]. Both write into the same log, so the
//! interleaving of frame-renderer and driver calls can be inspected, which is
//! how the ordered frame contract is verified. The demo viewer also uses it
//! to run the renderer without a GPU.

use std::sync::{Arc, Mutex};

use crate::foundation::math::{FieldOfView, Mat4, Vec4};
use crate::foundation::sync::lock;
use crate::input::{InputController, ScreenTouchController};
use crate::render::driver::{CullMode, Driver, ProgramHandle};
use crate::render::frame_renderer::{EyeType, FrameRenderer, DEFAULT_FAR_CLIPPING_PLANE, DEFAULT_MONO_FOV_X};
use crate::render::post_process::PostProcessProgram;
use crate::render::texture::RenderTargetHandle;
use crate::render::{RenderError, Viewport};
use crate::scene::{SceneController, SceneTransition, SharedNode};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// [`Driver::enable_depth_test`]
    EnableDepthTest,
    /// [`Driver::set_cull_mode`]
    SetCullMode(CullMode),
    /// [`Driver::set_viewport`]
    SetViewport(Viewport),
    /// [`Driver::clear`]
    Clear(Vec4),
    /// [`Driver::on_pause`]
    DriverPaused,
    /// [`Driver::on_resume`]
    DriverResumed,
    /// [`Driver::compile_post_process`]
    CompileProgram {
        /// Handle that was returned
        handle: ProgramHandle,
        /// Program that was compiled
        program: PostProcessProgram,
    },
    /// [`Driver::release_post_process`]
    ReleaseProgram(ProgramHandle),
    /// [`Driver::blit`]
    Blit {
        /// Program run
        program: ProgramHandle,
        /// Sampled target
        source: RenderTargetHandle,
        /// Written target
        target: RenderTargetHandle,
        /// Raw uniform bytes
        uniforms: Vec<u8>,
    },
    /// [`FrameRenderer::prepare_frame`]
    PrepareFrame {
        /// Frame counter passed in
        frame: u64,
        /// Output viewport
        viewport: Viewport,
        /// Camera field of view
        fov: FieldOfView,
        /// Camera rotation
        rotation: Mat4,
        /// Projection matrix
        projection: Mat4,
    },
    /// [`FrameRenderer::render_eye`]
    RenderEye {
        /// Eye rendered
        eye: EyeType,
        /// View matrix
        view: Mat4,
        /// Output viewport
        viewport: Viewport,
    },
    /// [`FrameRenderer::end_frame`]
    EndFrame,
    /// [`FrameRenderer::set_scene_controller`]
    SceneControllerSet {
        /// Requested transition
        transition: Option<SceneTransition>,
    },
}

/// Shared, append-only record of backend calls
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Arc<Mutex<Vec<RenderCommand>>>,
}

impl CommandLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&self, command: RenderCommand) {
        lock(&self.commands).push(command);
    }

    /// Copy of every recorded command, oldest first
    pub fn commands(&self) -> Vec<RenderCommand> {
        lock(&self.commands).clone()
    }

    /// Number of recorded commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&RenderCommand) -> bool) -> usize {
        lock(&self.commands).iter().filter(|c| predicate(c)).count()
    }

    /// Most recent command matching `predicate`
    pub fn last_matching(&self, predicate: impl Fn(&RenderCommand) -> bool) -> Option<RenderCommand> {
        lock(&self.commands).iter().rev().find(|c| predicate(c)).cloned()
    }

    /// Total number of recorded commands
    pub fn len(&self) -> usize {
        lock(&self.commands).len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        lock(&self.commands).clear();
    }
}

/// Driver that records instead of drawing
#[derive(Debug)]
pub struct HeadlessDriver {
    log: CommandLog,
    next_program: u64,
    fail_compiles: bool,
    paused: bool,
}

impl HeadlessDriver {
    /// Create a driver recording into `log`
    pub fn new(log: CommandLog) -> Self {
        Self {
            log,
            next_program: 1,
            fail_compiles: false,
            paused: false,
        }
    }

    /// Make every program compilation fail
    pub fn with_failing_compiles(mut self) -> Self {
        self.fail_compiles = true;
        self
    }

    /// True between `on_pause` and `on_resume`
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Driver for HeadlessDriver {
    fn enable_depth_test(&mut self) {
        self.log.push(RenderCommand::EnableDepthTest);
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.log.push(RenderCommand::SetCullMode(mode));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.log.push(RenderCommand::SetViewport(viewport));
    }

    fn clear(&mut self, color: Vec4) {
        self.log.push(RenderCommand::Clear(color));
    }

    fn on_pause(&mut self) {
        self.paused = true;
        self.log.push(RenderCommand::DriverPaused);
    }

    fn on_resume(&mut self) {
        self.paused = false;
        self.log.push(RenderCommand::DriverResumed);
    }

    fn compile_post_process(&mut self, program: &PostProcessProgram) -> Result<ProgramHandle, RenderError> {
        if self.fail_compiles {
            return Err(RenderError::ProgramCompilationFailed(program.name().to_string()));
        }
        let handle = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.log.push(RenderCommand::CompileProgram {
            handle,
            program: program.clone(),
        });
        Ok(handle)
    }

    fn release_post_process(&mut self, program: ProgramHandle) {
        self.log.push(RenderCommand::ReleaseProgram(program));
    }

    fn blit(
        &mut self,
        program: ProgramHandle,
        source: RenderTargetHandle,
        target: RenderTargetHandle,
        uniforms: &[u8],
    ) -> Result<(), RenderError> {
        self.log.push(RenderCommand::Blit {
            program,
            source,
            target,
            uniforms: uniforms.to_vec(),
        });
        Ok(())
    }
}

/// Frame renderer that records instead of drawing
pub struct HeadlessFrameRenderer {
    log: CommandLog,
    far_clipping_plane: f32,
    mono_fov_x: f32,
    point_of_view: Option<SharedNode>,
    scene_controller: Option<SceneController>,
    input: Box<dyn InputController>,
}

impl HeadlessFrameRenderer {
    /// Create a frame renderer recording into `log`, with a touch controller
    pub fn new(log: CommandLog) -> Self {
        Self::with_input_controller(log, Box::new(ScreenTouchController::new()))
    }

    /// Create a frame renderer with a custom input controller
    pub fn with_input_controller(log: CommandLog, input: Box<dyn InputController>) -> Self {
        Self {
            log,
            far_clipping_plane: DEFAULT_FAR_CLIPPING_PLANE,
            mono_fov_x: DEFAULT_MONO_FOV_X,
            point_of_view: None,
            scene_controller: None,
            input,
        }
    }

    /// Override the far clipping plane
    pub fn with_far_clipping_plane(mut self, far: f32) -> Self {
        self.far_clipping_plane = far;
        self
    }

    /// Point of view installed by the AR renderer
    pub fn point_of_view(&self) -> Option<&SharedNode> {
        self.point_of_view.as_ref()
    }

    /// Scene controller currently presented
    pub fn scene_controller(&self) -> Option<&SceneController> {
        self.scene_controller.as_ref()
    }
}

impl FrameRenderer for HeadlessFrameRenderer {
    fn set_point_of_view(&mut self, node: SharedNode) {
        self.point_of_view = Some(node);
    }

    fn set_scene_controller(&mut self, controller: SceneController, transition: Option<SceneTransition>) {
        self.log.push(RenderCommand::SceneControllerSet { transition });
        self.scene_controller = Some(controller);
    }

    fn far_clipping_plane(&self) -> f32 {
        self.far_clipping_plane
    }

    fn set_mono_fov_x(&mut self, degrees: f32) {
        self.mono_fov_x = degrees;
    }

    fn compute_mono_fov(&self, width: u32, height: u32) -> FieldOfView {
        FieldOfView::mono(self.mono_fov_x, width, height)
    }

    fn prepare_frame(
        &mut self,
        frame: u64,
        viewport: Viewport,
        fov: FieldOfView,
        rotation: &Mat4,
        projection: &Mat4,
        _driver: &mut dyn Driver,
    ) {
        self.log.push(RenderCommand::PrepareFrame {
            frame,
            viewport,
            fov,
            rotation: *rotation,
            projection: *projection,
        });
    }

    fn render_eye(
        &mut self,
        eye: EyeType,
        view: &Mat4,
        _projection: &Mat4,
        viewport: Viewport,
        _driver: &mut dyn Driver,
    ) {
        self.log.push(RenderCommand::RenderEye {
            eye,
            view: *view,
            viewport,
        });
    }

    fn end_frame(&mut self, _driver: &mut dyn Driver) {
        self.log.push(RenderCommand::EndFrame);
    }

    fn input_controller(&mut self) -> &mut dyn InputController {
        self.input.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_and_renderer_share_log() {
        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone());
        let mut renderer = HeadlessFrameRenderer::new(log.clone());

        renderer.end_frame(&mut driver);
        driver.set_viewport(Viewport::from_size(4, 4));

        assert_eq!(
            log.commands(),
            vec![RenderCommand::EndFrame, RenderCommand::SetViewport(Viewport::from_size(4, 4))]
        );
    }

    #[test]
    fn test_program_handles_are_unique() {
        let mut driver = HeadlessDriver::new(CommandLog::new());
        let program = PostProcessProgram::PreBlur {
            reinforced_intensity: 1.0,
            consider_transparent_pixels: false,
        };
        let a = driver.compile_post_process(&program).unwrap();
        let b = driver.compile_post_process(&program).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pause_state_tracked() {
        let mut driver = HeadlessDriver::new(CommandLog::new());
        driver.on_pause();
        assert!(driver.is_paused());
        driver.on_resume();
        assert!(!driver.is_paused());
    }
}
