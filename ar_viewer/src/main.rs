//! AR viewer demo
//!
//! Runs the AR renderer on a dedicated render thread against a scripted
//! session and the headless backend, drives it from the main thread the way
//! a host activity would (pause, suspend, resume, touches), then blurs a
//! frame with the Gaussian pass.
//!
//! Usage: `ar_viewer [config.toml|config.ron]`

use std::thread;
use std::time::Duration;

use ar_engine::ar::scripted::AnchorEvent;
use ar_engine::ar::{Anchor, FrameSnapshot, PlaneAlignment, ScriptedArSession, TrackingState};
use ar_engine::bridge::{BridgeError, RendererBridge};
use ar_engine::config::{Config, ConfigError};
use ar_engine::core::{BlurPassConfig, EngineConfig};
use ar_engine::foundation::logging;
use ar_engine::foundation::math::{Mat4, Vec2, Vec3};
use ar_engine::foundation::sync::lock;
use ar_engine::foundation::time::SystemClock;
use ar_engine::render::headless::{CommandLog, HeadlessDriver, HeadlessFrameRenderer, RenderCommand};
use ar_engine::render::post_process::{
    GaussianBlurPass, RenderContext, RenderPass, RenderPassIo, GAUSSIAN_INPUT, GAUSSIAN_PING_PONG,
    RENDER_TARGET_SINGLE_OUTPUT,
};
use ar_engine::render::{RenderError, RenderTargetHandle};
use ar_engine::renderer::{ArSceneRenderer, DispatchError, RenderMode};
use ar_engine::scene::{Scene, SceneController};

const SURFACE_WIDTH: u32 = 1080;
const SURFACE_HEIGHT: u32 = 1920;
const TICKS: u32 = 120;
const TICK: Duration = Duration::from_millis(16);

#[derive(thiserror::Error, Debug)]
enum ViewerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bridge call failed: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Render dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to start render thread: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render thread panicked")]
    RenderThreadPanicked,
}

/// What the render thread saw
#[derive(Debug, Default)]
struct RunSummary {
    suspended: u32,
    waiting: u32,
    tracking: u32,
    suspended_warnings: u64,
    anchors: usize,
}

impl RunSummary {
    fn record(&mut self, mode: RenderMode) {
        match mode {
            RenderMode::Suspended => self.suspended += 1,
            RenderMode::WaitingForTracking => self.waiting += 1,
            RenderMode::TrackingActive => self.tracking += 1,
        }
    }
}

fn load_config() -> Result<EngineConfig, ViewerError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// A phone held still while tracking settles, then slowly walked forward
fn scripted_walk() -> Vec<FrameSnapshot> {
    let settling = (0..10).map(|_| FrameSnapshot::new().with_tracking_state(TrackingState::Initializing));
    let walking = (0..60u8).map(|step| {
        let t = f32::from(step);
        FrameSnapshot::new()
            .with_tracking_state(TrackingState::Normal)
            .with_position(Vec3::new(0.0, 1.5, -0.02 * t))
            .with_rotation(Mat4::new_rotation(Vec3::new(0.0, 0.01 * t, 0.0)))
            .with_ambient_light(800.0 + 5.0 * t, 5500.0)
            .with_display_rotation_changed(step == 30)
    });
    settling.chain(walking).collect()
}

fn main() -> Result<(), ViewerError> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting AR viewer");

    let log = CommandLog::new();
    let (session, script) = ScriptedArSession::new();
    script.push_frames(scripted_walk());
    script.push_anchor_event(AnchorEvent::Detected(Anchor::plane(
        "floor",
        PlaneAlignment::Horizontal,
        Vec3::new(0.0, 0.0, -1.0),
        Vec2::new(2.0, 3.0),
    )));

    let mut renderer = ArSceneRenderer::new(
        Box::new(session),
        Box::new(HeadlessFrameRenderer::new(log.clone())),
        Box::new(HeadlessDriver::new(log.clone())),
        Box::new(SystemClock::new()),
        config.renderer.clone(),
    );

    let proxy = renderer.proxy();
    let mut bridge = RendererBridge::new();
    let handle = bridge.register(renderer.proxy());

    let render_thread = thread::Builder::new()
        .name("render".to_string())
        .spawn(move || {
            renderer.on_surface_changed(SURFACE_WIDTH, SURFACE_HEIGHT);
            let mut summary = RunSummary::default();
            for _ in 0..TICKS {
                summary.record(renderer.on_draw_frame());
                thread::sleep(TICK);
            }
            summary.suspended_warnings = renderer.lifecycle().suspended_warnings();
            summary.anchors = renderer
                .component_manager()
                .map_or(0, |manager| lock(manager).anchor_count());
            summary
        })?;

    // Host thread: what an activity would do over the render thread's lifetime
    log::info!("Host ready, unsuspending renderer");
    bridge.set_suspended(handle, false)?;
    proxy.set_scene_controller(SceneController::new(Scene::new_ar().into_shared()))?;
    thread::sleep(TICK * 40);

    log::info!("Host pausing and suspending");
    bridge.on_pause(handle)?;
    bridge.set_suspended(handle, true)?;
    thread::sleep(TICK * 20);

    log::info!("Host resuming");
    bridge.set_suspended(handle, false)?;
    bridge.on_resume(handle)?;
    bridge.on_touch_event(handle, 0, 540.0, 960.0)?;
    bridge.on_touch_event(handle, 1, 540.0, 960.0)?;

    let summary = render_thread
        .join()
        .map_err(|_| ViewerError::RenderThreadPanicked)?;
    bridge.destroy(handle)?;

    log::info!(
        "Rendered {} ticks: {} tracking, {} waiting, {} suspended ({} warnings), {} anchors",
        TICKS,
        summary.tracking,
        summary.waiting,
        summary.suspended,
        summary.suspended_warnings,
        summary.anchors
    );
    log::info!(
        "Driver saw {} frames end and {} pause/resume calls",
        log.count(|c| *c == RenderCommand::EndFrame),
        log.count(|c| matches!(c, RenderCommand::DriverPaused | RenderCommand::DriverResumed))
    );

    run_blur(&config.blur, &log)?;
    log::info!("AR viewer finished");
    Ok(())
}

fn run_blur(config: &BlurPassConfig, log: &CommandLog) -> Result<(), ViewerError> {
    let mut driver = HeadlessDriver::new(log.clone());
    let mut pass = GaussianBlurPass::from_config(config);
    let mut io = RenderPassIo::new()
        .with_input(GAUSSIAN_INPUT, RenderTargetHandle(1))
        .with_input(GAUSSIAN_PING_PONG, RenderTargetHandle(2))
        .with_output(RENDER_TARGET_SINGLE_OUTPUT, RenderTargetHandle(3));

    pass.render(None, None, &mut io, &RenderContext::default(), &mut driver)?;
    log::info!(
        "{}: kernel {} (sigma {}), {} taps, {} passes into {:?}",
        pass.name(),
        pass.kernel_size(),
        pass.sigma(),
        pass.kernel().tap_count(),
        pass.passes_last_render(),
        io.output(RENDER_TARGET_SINGLE_OUTPUT)?
    );

    pass.release(&mut driver);
    Ok(())
}
