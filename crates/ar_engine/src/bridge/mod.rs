//! # Host Bridge
//!
//! Entry points for a native host (a JNI layer, a C API) that can only hold
//! plain integers. Renderers are registered as [`RendererProxy`] handles and
//! addressed by [`NativeRef`]; every call is re-dispatched onto the render
//! thread.

pub mod handle_table;

pub use handle_table::{HandleTable, NativeRef};

use crate::ar::AnchorDetection;
use crate::input::TouchAction;
use crate::renderer::{DispatchError, RendererProxy};

/// Bridge errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The reference was never issued or its renderer was destroyed
    #[error("Invalid native handle: {0:?}")]
    InvalidHandle(NativeRef),

    /// The host passed an action code this platform doesn't define
    #[error("Unknown touch action code: {0}")]
    UnknownTouchAction(i32),

    /// The renderer behind a live handle already shut down
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Registry of renderers reachable from the host
#[derive(Debug, Default)]
pub struct RendererBridge {
    renderers: HandleTable<RendererProxy>,
}

impl RendererBridge {
    /// Create an empty bridge
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a renderer reachable from the host
    pub fn register(&mut self, proxy: RendererProxy) -> NativeRef {
        let reference = self.renderers.create(proxy);
        log::debug!("Registered renderer {:?}", reference);
        reference
    }

    /// Forget a renderer; later calls with `reference` fail
    pub fn destroy(&mut self, reference: NativeRef) -> Result<(), BridgeError> {
        if self.renderers.destroy(reference).is_none() {
            return Err(BridgeError::InvalidHandle(reference));
        }
        log::debug!("Destroyed renderer {:?}", reference);
        Ok(())
    }

    /// Host activity paused
    pub fn on_pause(&self, reference: NativeRef) -> Result<(), BridgeError> {
        Ok(self.proxy(reference)?.on_pause()?)
    }

    /// Host activity resumed
    pub fn on_resume(&self, reference: NativeRef) -> Result<(), BridgeError> {
        Ok(self.proxy(reference)?.on_resume()?)
    }

    /// Suspend or unsuspend rendering
    pub fn set_suspended(&self, reference: NativeRef, suspended: bool) -> Result<(), BridgeError> {
        Ok(self.proxy(reference)?.set_suspended(suspended)?)
    }

    /// Touch event with a raw platform action code
    pub fn on_touch_event(&self, reference: NativeRef, raw_action: i32, x: f32, y: f32) -> Result<(), BridgeError> {
        let proxy = self.proxy(reference)?;
        let action = TouchAction::from_raw(raw_action).ok_or(BridgeError::UnknownTouchAction(raw_action))?;
        Ok(proxy.on_touch_event(action, x, y)?)
    }

    /// Change which anchors the renderer's AR session detects
    pub fn set_anchor_detection(&self, reference: NativeRef, detection: AnchorDetection) -> Result<(), BridgeError> {
        Ok(self
            .proxy(reference)?
            .configure_session(move |session| session.set_anchor_detection(detection))?)
    }

    /// Number of registered renderers
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// True when no renderers are registered
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    fn proxy(&self, reference: NativeRef) -> Result<&RendererProxy, BridgeError> {
        self.renderers
            .get(reference)
            .ok_or(BridgeError::InvalidHandle(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ar::scripted::SessionCall;
    use crate::ar::{ScriptedArSession, ScriptedSessionHandle};
    use crate::core::ArRendererConfig;
    use crate::foundation::time::ManualClock;
    use crate::render::headless::{CommandLog, HeadlessDriver, HeadlessFrameRenderer};
    use crate::renderer::{ArSceneRenderer, RenderMode};

    fn renderer() -> (ArSceneRenderer, ScriptedSessionHandle) {
        let log = CommandLog::new();
        let (session, handle) = ScriptedArSession::new();
        let mut renderer = ArSceneRenderer::new(
            Box::new(session),
            Box::new(HeadlessFrameRenderer::new(log.clone())),
            Box::new(HeadlessDriver::new(log)),
            Box::new(ManualClock::new()),
            ArRendererConfig::default(),
        );
        renderer.on_surface_changed(320, 240);
        (renderer, handle)
    }

    #[test]
    fn test_calls_reach_registered_renderer() {
        let (mut renderer, session) = renderer();
        let mut bridge = RendererBridge::new();
        let reference = bridge.register(renderer.proxy());

        assert_eq!(renderer.on_draw_frame(), RenderMode::Suspended);

        bridge.set_suspended(reference, false).unwrap();
        bridge
            .set_anchor_detection(reference, AnchorDetection::all())
            .unwrap();
        assert_eq!(renderer.on_draw_frame(), RenderMode::WaitingForTracking);
        assert_eq!(
            session.calls(),
            vec![SessionCall::SetAnchorDetection(AnchorDetection::all())]
        );

        bridge.set_suspended(reference, true).unwrap();
        assert_eq!(renderer.on_draw_frame(), RenderMode::Suspended);
    }

    #[test]
    fn test_destroyed_handle_is_invalid() {
        let (renderer, _) = renderer();
        let mut bridge = RendererBridge::new();
        let reference = bridge.register(renderer.proxy());

        bridge.destroy(reference).unwrap();
        assert!(bridge.is_empty());
        assert_eq!(bridge.on_pause(reference), Err(BridgeError::InvalidHandle(reference)));
        assert_eq!(bridge.destroy(reference), Err(BridgeError::InvalidHandle(reference)));
    }

    #[test]
    fn test_unknown_touch_action_rejected() {
        let (renderer, _) = renderer();
        let mut bridge = RendererBridge::new();
        let reference = bridge.register(renderer.proxy());

        assert_eq!(
            bridge.on_touch_event(reference, 42, 0.0, 0.0),
            Err(BridgeError::UnknownTouchAction(42))
        );
        assert!(bridge.on_touch_event(reference, 0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_dropped_renderer_reports_dispatch_error() {
        let (renderer, _) = renderer();
        let mut bridge = RendererBridge::new();
        let reference = bridge.register(renderer.proxy());
        drop(renderer);

        assert_eq!(
            bridge.on_resume(reference),
            Err(BridgeError::Dispatch(DispatchError::RendererGone))
        );
    }
}
