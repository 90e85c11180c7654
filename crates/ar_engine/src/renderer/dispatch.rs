//! Render-thread dispatch
//!
//! Host code runs on the UI thread but the renderer may only be touched from
//! the render thread. [`RendererProxy`] queues closures that the renderer
//! drains at the start of its next tick, in the order they were queued.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::ar::session::ArSession;
use crate::input::TouchAction;
use crate::renderer::ar_scene_renderer::ArSceneRenderer;
use crate::scene::{SceneController, TimingFunction};

/// Work queued for the render thread
pub type RenderTask = Box<dyn FnOnce(&mut ArSceneRenderer) + Send>;

/// Dispatch errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The renderer was dropped; the task was discarded
    #[error("Renderer is gone, task discarded")]
    RendererGone,
}

/// Receiving end of the task queue, owned by the renderer
#[derive(Debug)]
pub(crate) struct TaskQueue {
    sender: Sender<RenderTask>,
    receiver: Receiver<RenderTask>,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub(crate) fn proxy(&self) -> RendererProxy {
        RendererProxy {
            sender: self.sender.clone(),
        }
    }

    /// Queue a task from the render thread itself
    pub(crate) fn push(&self, task: RenderTask) {
        if self.sender.send(task).is_err() {
            log::warn!("Render task queue closed");
        }
    }

    /// Everything queued so far. Tasks queued while these run wait for the next drain.
    pub(crate) fn drain(&self) -> Vec<RenderTask> {
        self.receiver.try_iter().collect()
    }
}

/// Thread-safe handle for driving an [`ArSceneRenderer`] from the host
#[derive(Debug, Clone)]
pub struct RendererProxy {
    sender: Sender<RenderTask>,
}

impl RendererProxy {
    /// Queue `task` for the render thread
    pub fn dispatch(&self, task: impl FnOnce(&mut ArSceneRenderer) + Send + 'static) -> Result<(), DispatchError> {
        self.sender.send(Box::new(task)).map_err(|_| {
            log::warn!("Dropping render task: renderer is gone");
            DispatchError::RendererGone
        })
    }

    /// Pause input and the driver
    pub fn on_pause(&self) -> Result<(), DispatchError> {
        self.dispatch(ArSceneRenderer::pause_now)
    }

    /// Resume input and the driver and start a new tracking segment
    pub fn on_resume(&self) -> Result<(), DispatchError> {
        self.dispatch(ArSceneRenderer::resume_now)
    }

    /// Suspend or unsuspend rendering
    pub fn set_suspended(&self, suspended: bool) -> Result<(), DispatchError> {
        self.dispatch(move |renderer| renderer.set_suspended(suspended))
    }

    /// Present a new scene controller
    pub fn set_scene_controller(&self, controller: SceneController) -> Result<(), DispatchError> {
        self.dispatch(move |renderer| renderer.set_scene_controller(controller))
    }

    /// Present a new scene controller with an animated transition
    pub fn set_scene_controller_with_transition(
        &self,
        controller: SceneController,
        seconds: f32,
        timing: TimingFunction,
    ) -> Result<(), DispatchError> {
        self.dispatch(move |renderer| renderer.set_scene_controller_with_transition(controller, seconds, timing))
    }

    /// Forward a touch event
    pub fn on_touch_event(&self, action: TouchAction, x: f32, y: f32) -> Result<(), DispatchError> {
        self.dispatch(move |renderer| renderer.on_touch_event(action, x, y))
    }

    /// Run `configure` against the AR session on the render thread
    pub fn configure_session(
        &self,
        configure: impl FnOnce(&mut dyn ArSession) + Send + 'static,
    ) -> Result<(), DispatchError> {
        self.dispatch(move |renderer| configure(renderer.session_mut()))
    }
}
