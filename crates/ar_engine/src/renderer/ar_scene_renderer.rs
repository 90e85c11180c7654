//! # AR Scene Renderer
//!
//! Drives one AR view: every display tick it asks the AR session for a
//! fresh camera snapshot, decides whether the scene can be rendered with
//! tracking, composites the camera feed behind the scene and hands the
//! prepared matrices to the [`FrameRenderer`].
//!
//! ## Tick states
//!
//! - **Suspended**: the host suspended rendering; clear to a solid color
//!   and warn at a limited rate.
//! - **Waiting for tracking**: the session isn't ready, or tracking hasn't
//!   reached `Normal` yet in this session segment. Render with a synthesized
//!   field of view so the output pipeline keeps running.
//! - **Tracking active**: render from the camera pose. Once a segment has
//!   seen `Normal` tracking it stays active until the host resumes the app.
//!
//! All methods except [`ArSceneRenderer::proxy`] must be called on the render
//! thread. Host threads use [`RendererProxy`].

use crate::ar::component_manager::{ArComponentManager, SharedComponentManager};
use crate::ar::frame::{FrameSnapshot, TrackingState};
use crate::ar::session::ArSession;
use crate::core::ArRendererConfig;
use crate::foundation::math::{FieldOfView, Mat4};
use crate::foundation::sync::{lock, shared};
use crate::foundation::thread::ThreadRestricted;
use crate::foundation::time::Clock;
use crate::input::TouchAction;
use crate::render::driver::{CullMode, Driver};
use crate::render::frame_renderer::{EyeType, FrameRenderer};
use crate::render::texture::QuadTexcoords;
use crate::render::Viewport;
use crate::renderer::dispatch::{RendererProxy, TaskQueue};
use crate::renderer::lifecycle::RendererLifecycle;
use crate::scene::{
    ArSceneState, Material, Node, Scene, SceneController, SceneTransition, SharedNode, SharedScene,
    SharedSurface, Surface, TimingFunction,
};

/// Name of the surface showing the camera feed
pub const CAMERA_BACKGROUND_NAME: &str = "Camera";

/// Name of the node that follows the AR camera
pub const POINT_OF_VIEW_NAME: &str = "PointOfView";

const SUSPENDED_WARNING: &str = "Renderer suspended! Do you have a valid key?";

/// How a tick was rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Cleared to the suspended color
    Suspended,
    /// Rendered with a synthesized camera
    WaitingForTracking,
    /// Rendered from the AR camera pose
    TrackingActive,
}

/// Per-view AR renderer
pub struct ArSceneRenderer {
    config: ArRendererConfig,
    session: Box<dyn ArSession>,
    renderer: Box<dyn FrameRenderer>,
    driver: Box<dyn Driver>,
    clock: Box<dyn Clock>,
    lifecycle: RendererLifecycle,
    thread: ThreadRestricted,
    tasks: TaskQueue,
    surface_width: u32,
    surface_height: u32,
    scene_controller: Option<SceneController>,
    camera_background: Option<SharedSurface>,
    component_manager: Option<SharedComponentManager>,
    point_of_view: SharedNode,
}

impl ArSceneRenderer {
    /// Create a renderer.
    ///
    /// With the default config the renderer starts suspended and renders
    /// nothing until the host calls [`ArSceneRenderer::set_suspended`] with
    /// `false`.
    ///
    /// # Arguments
    ///
    /// * `session` - AR session supplying camera snapshots
    /// * `renderer` - Frame renderer executing the draw
    /// * `driver` - Graphics driver
    /// * `clock` - Time source for rate-limited diagnostics
    /// * `config` - Renderer settings
    pub fn new(
        session: Box<dyn ArSession>,
        mut renderer: Box<dyn FrameRenderer>,
        driver: Box<dyn Driver>,
        clock: Box<dyn Clock>,
        config: ArRendererConfig,
    ) -> Self {
        let point_of_view = Node::new(POINT_OF_VIEW_NAME).into_shared();
        renderer.set_point_of_view(point_of_view.clone());
        renderer.set_mono_fov_x(config.mono_fov_x_degrees);

        Self {
            lifecycle: RendererLifecycle::new(
                config.suspended_warning_interval(),
                config.start_suspended,
                clock.now(),
            ),
            config,
            session,
            renderer,
            driver,
            clock,
            thread: ThreadRestricted::new("Renderer"),
            tasks: TaskQueue::new(),
            surface_width: 0,
            surface_height: 0,
            scene_controller: None,
            camera_background: None,
            component_manager: None,
            point_of_view,
        }
    }

    /// Handle for driving this renderer from other threads
    pub fn proxy(&self) -> RendererProxy {
        self.tasks.proxy()
    }

    /// Render one display tick and report how it was rendered
    pub fn on_draw_frame(&mut self) -> RenderMode {
        self.thread.assert_current();
        self.run_pending_tasks();

        let mode = if self.lifecycle.is_suspended() {
            self.render_suspended();
            RenderMode::Suspended
        } else {
            self.render_frame()
        };

        log::trace!("Frame {} rendered as {:?}", self.lifecycle.frame(), mode);
        self.lifecycle.advance_frame();
        mode
    }

    /// The output surface was created or resized.
    ///
    /// Binds the calling thread as the render thread.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.thread.bind_current();
        self.surface_width = width;
        self.surface_height = height;

        if let Some(background) = &self.camera_background {
            let (x, y) = self.viewport().center();
            lock(background).set_frame(x, y, width as f32, height as f32);
        }
        log::debug!("Surface changed to {}x{}", width, height);
    }

    /// Forward a touch to the frame renderer's input controller
    pub fn on_touch_event(&mut self, action: TouchAction, x: f32, y: f32) {
        self.thread.assert_current();
        self.renderer.input_controller().on_screen_touch(action, x, y);
    }

    /// Queue a pause for the start of the next tick
    pub fn on_pause(&self) {
        self.tasks.push(Box::new(Self::pause_now));
    }

    /// Queue a resume for the start of the next tick
    pub fn on_resume(&self) {
        self.tasks.push(Box::new(Self::resume_now));
    }

    /// Suspend or unsuspend rendering
    pub fn set_suspended(&mut self, suspended: bool) {
        self.thread.assert_current();
        self.lifecycle.set_suspended(suspended);
    }

    /// Present a new scene controller
    pub fn set_scene_controller(&mut self, controller: SceneController) {
        self.install_scene_controller(controller, None);
    }

    /// Present a new scene controller, animating the change over `seconds`
    pub fn set_scene_controller_with_transition(
        &mut self,
        controller: SceneController,
        seconds: f32,
        timing: TimingFunction,
    ) {
        self.install_scene_controller(controller, Some(SceneTransition::new(seconds, timing)));
    }

    /// Presented scene controller
    pub fn scene_controller(&self) -> Option<&SceneController> {
        self.scene_controller.as_ref()
    }

    /// Lifecycle flags and counters
    pub fn lifecycle(&self) -> &RendererLifecycle {
        &self.lifecycle
    }

    /// Ticks rendered so far
    pub fn frame(&self) -> u64 {
        self.lifecycle.frame()
    }

    /// Camera feed surface, once the AR session is initialized
    pub fn camera_background(&self) -> Option<&SharedSurface> {
        self.camera_background.as_ref()
    }

    /// Anchor manager, once the AR session is initialized
    pub fn component_manager(&self) -> Option<&SharedComponentManager> {
        self.component_manager.as_ref()
    }

    /// Node following the AR camera
    pub fn point_of_view(&self) -> &SharedNode {
        &self.point_of_view
    }

    /// Renderer settings
    pub fn config(&self) -> &ArRendererConfig {
        &self.config
    }

    /// AR session, for configuration on the render thread
    pub fn session_mut(&mut self) -> &mut dyn ArSession {
        self.thread.assert_current();
        self.session.as_mut()
    }

    pub(crate) fn pause_now(&mut self) {
        log::info!("Pausing AR renderer");
        self.renderer.input_controller().on_pause();
        self.driver.on_pause();
    }

    pub(crate) fn resume_now(&mut self) {
        log::info!("Resuming AR renderer");
        self.lifecycle.reset_tracking_resumed();
        self.renderer.input_controller().on_resume();
        self.driver.on_resume();
    }

    fn run_pending_tasks(&mut self) {
        for task in self.tasks.drain() {
            task(self);
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::from_size(self.surface_width, self.surface_height)
    }

    fn install_scene_controller(&mut self, controller: SceneController, transition: Option<SceneTransition>) {
        self.thread.assert_current();
        if let Some(manager) = &self.component_manager {
            attach_component_manager(manager, controller.scene());
        }
        self.scene_controller = Some(controller.clone());
        self.renderer.set_scene_controller(controller, transition);
    }

    fn render_frame(&mut self) -> RenderMode {
        self.driver.enable_depth_test();
        self.driver.set_cull_mode(CullMode::Back);

        let viewport = self.viewport();
        if self.camera_background.is_none() {
            if let Some(scene) = self.scene_controller.as_ref().map(|c| c.scene().clone()) {
                self.init_ar_session(viewport, &scene);
            }
        }

        if !self.session.is_ready() {
            self.render_waiting_for_tracking(viewport);
            return RenderMode::WaitingForTracking;
        }

        self.session.set_viewport(viewport);
        let frame = self.session.update_frame();

        let tracking_resumed = self.lifecycle.has_tracking_resumed();
        if tracking_resumed || frame.tracking_state == TrackingState::Normal {
            self.render_with_tracking(&frame, viewport, !tracking_resumed);
            self.lifecycle.mark_tracking_resumed();
            RenderMode::TrackingActive
        } else {
            self.render_waiting_for_tracking(viewport);
            RenderMode::WaitingForTracking
        }
    }

    fn render_with_tracking(&mut self, frame: &FrameSnapshot, viewport: Viewport, first_frame_since_resume: bool) {
        let projection = frame.projection(self.config.near_plane, self.renderer.far_clipping_plane());

        if let Some(controller) = &self.scene_controller {
            if !self.lifecycle.is_tracking_initialized()
                && frame.has_position()
                && self.lifecycle.latch_tracking_initialized()
            {
                log::info!("AR tracking initialized at frame {}", self.lifecycle.frame());
                require_ar(&mut lock(controller.scene())).tracking_has_initialized();
            }
        }

        if first_frame_since_resume || frame.display_rotation_changed {
            self.update_camera_background(frame.background_texcoords);
        }

        lock(&self.point_of_view).set_position(frame.position);
        self.render_ordered(viewport, frame.fov, &frame.rotation, &projection);

        if let Some(scene) = self.session.scene() {
            let light = frame.ambient_light;
            require_ar(&mut lock(&scene)).update_ambient_light(light.intensity, light.color_temperature);
        }
    }

    fn render_waiting_for_tracking(&mut self, viewport: Viewport) {
        let fov = self.renderer.compute_mono_fov(viewport.width, viewport.height);
        let projection = fov.to_perspective_projection(self.config.near_plane, self.renderer.far_clipping_plane());
        self.render_ordered(viewport, fov, &Mat4::identity(), &projection);
    }

    fn render_suspended(&mut self) {
        self.driver.clear(self.config.suspended_clear_color());
        if self.lifecycle.should_warn_suspended(self.clock.now()) {
            log::error!("{}", SUSPENDED_WARNING);
        }
    }

    fn render_ordered(&mut self, viewport: Viewport, fov: FieldOfView, rotation: &Mat4, projection: &Mat4) {
        let frame = self.lifecycle.frame();
        let driver = self.driver.as_mut();

        self.renderer.prepare_frame(frame, viewport, fov, rotation, projection, driver);
        driver.set_viewport(viewport);
        self.renderer
            .render_eye(EyeType::Monocular, &Mat4::identity(), projection, viewport, driver);
        self.renderer.end_frame(driver);
    }

    fn update_camera_background(&mut self, texcoords: QuadTexcoords) {
        let Some(background) = &self.camera_background else {
            return;
        };
        lock(background).set_texcoords(texcoords);

        // Only install once real texture coordinates are known
        if let Some(controller) = &self.scene_controller {
            let scene = lock(controller.scene());
            let mut root = lock(scene.root());
            if root.background().is_none() {
                log::debug!("Installing camera background");
                root.set_background(background.clone());
            }
        }
    }

    fn init_ar_session(&mut self, viewport: Viewport, scene: &SharedScene) {
        if self.camera_background.is_some() {
            return;
        }

        let (x, y) = viewport.center();
        let material = Material::camera_background(self.session.camera_background_texture());
        let background = Surface::screen_space(
            CAMERA_BACKGROUND_NAME,
            x,
            y,
            viewport.width as f32,
            viewport.height as f32,
        )
        .with_material(material);
        self.camera_background = Some(shared(background));

        let manager = shared(ArComponentManager::new());
        lock(&manager).attach_scene(scene);

        self.session.set_scene(scene.clone());
        self.session.set_viewport(viewport);
        self.session.set_anchor_detection(self.config.anchor_detection.to_flags());
        self.session.set_delegate(manager.clone());
        self.session.run();

        {
            let mut scene = lock(scene);
            let ar = require_ar(&mut scene);
            ar.set_ar_component_manager(manager.clone());
            ar.set_point_of_view(self.point_of_view.clone());
            scene.add_node(self.point_of_view.clone());
        }

        self.component_manager = Some(manager);
        log::info!("AR session initialized for {}x{} viewport", viewport.width, viewport.height);
    }
}

/// AR state of `scene`; AR views can't present anything else
fn require_ar(scene: &mut Scene) -> &mut ArSceneState {
    match scene.as_ar_mut() {
        Some(ar) => ar,
        None => panic!("AR View requires an AR Scene!"),
    }
}

fn attach_component_manager(manager: &SharedComponentManager, scene: &SharedScene) {
    let attached = match lock(scene).as_ar_mut() {
        Some(ar) => {
            ar.set_ar_component_manager(manager.clone());
            true
        }
        None => false,
    };
    if attached {
        lock(manager).attach_scene(scene);
    }
}
