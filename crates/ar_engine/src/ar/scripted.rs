//! Scripted AR session
//!
//! Replays queued frame snapshots and anchor events instead of tracking a
//! real camera. Used by the tests and by the demo viewer.

use std::collections::VecDeque;

use crate::ar::anchor::{Anchor, AnchorDetection};
use crate::ar::frame::FrameSnapshot;
use crate::ar::session::{ArSession, SharedSessionDelegate};
use crate::foundation::sync::{lock, shared, Shared};
use crate::render::texture::TextureHandle;
use crate::render::Viewport;
use crate::scene::SharedScene;

/// Texture handle the scripted session reports for the camera feed
pub const SCRIPTED_CAMERA_TEXTURE: TextureHandle = TextureHandle(1);

/// Anchor event to deliver on a future frame
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorEvent {
    /// Report a new anchor
    Detected(Anchor),
    /// Report a change to an anchor
    Updated(Anchor),
    /// Report a lost anchor
    Removed(Anchor),
}

impl AnchorEvent {
    fn anchor(&self) -> &Anchor {
        match self {
            Self::Detected(anchor) | Self::Updated(anchor) | Self::Removed(anchor) => anchor,
        }
    }
}

/// Configuration call received by the session, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    /// [`ArSession::set_scene`]
    SetScene,
    /// [`ArSession::set_viewport`]
    SetViewport(Viewport),
    /// [`ArSession::set_anchor_detection`]
    SetAnchorDetection(AnchorDetection),
    /// [`ArSession::set_delegate`]
    SetDelegate,
    /// [`ArSession::run`]
    Run,
}

#[derive(Debug, Default)]
struct ScriptState {
    frames: VecDeque<FrameSnapshot>,
    last_frame: FrameSnapshot,
    anchor_events: VecDeque<AnchorEvent>,
    ready_override: Option<bool>,
    running: bool,
    detection: AnchorDetection,
    calls: Vec<SessionCall>,
    frames_served: u64,
}

/// Session that replays a script
pub struct ScriptedArSession {
    state: Shared<ScriptState>,
    delegate: Option<SharedSessionDelegate>,
    scene: Option<SharedScene>,
}

/// Host-side handle for feeding and inspecting a [`ScriptedArSession`]
#[derive(Clone)]
pub struct ScriptedSessionHandle {
    state: Shared<ScriptState>,
}

impl ScriptedArSession {
    /// Create a session and the handle that scripts it
    pub fn new() -> (Self, ScriptedSessionHandle) {
        let state = shared(ScriptState::default());
        let session = Self {
            state: state.clone(),
            delegate: None,
            scene: None,
        };
        (session, ScriptedSessionHandle { state })
    }

    fn deliver_anchor_events(&mut self, events: Vec<AnchorEvent>) {
        let Some(delegate) = self.delegate.as_ref() else {
            return;
        };
        let mut delegate = lock(delegate);
        for event in &events {
            match event {
                AnchorEvent::Detected(anchor) => delegate.anchor_was_detected(anchor),
                AnchorEvent::Updated(anchor) => delegate.anchor_did_update(anchor),
                AnchorEvent::Removed(anchor) => delegate.anchor_was_removed(anchor),
            }
        }
    }
}

impl ArSession for ScriptedArSession {
    fn is_ready(&self) -> bool {
        let state = lock(&self.state);
        state.ready_override.unwrap_or(state.running)
    }

    fn update_frame(&mut self) -> FrameSnapshot {
        let (frame, events) = {
            let mut state = lock(&self.state);
            if let Some(next) = state.frames.pop_front() {
                state.last_frame = next;
            } else {
                // Out of script: hold the last pose but report no rotation change
                state.last_frame.display_rotation_changed = false;
            }
            state.frames_served += 1;

            let detection = state.detection;
            let events: Vec<AnchorEvent> = state
                .anchor_events
                .drain(..)
                .filter(|event| event.anchor().is_requested_by(detection))
                .collect();
            (state.last_frame.clone(), events)
        };

        self.deliver_anchor_events(events);
        frame
    }

    fn camera_background_texture(&self) -> TextureHandle {
        SCRIPTED_CAMERA_TEXTURE
    }

    fn set_anchor_detection(&mut self, detection: AnchorDetection) {
        let mut state = lock(&self.state);
        state.detection = detection;
        state.calls.push(SessionCall::SetAnchorDetection(detection));
    }

    fn set_delegate(&mut self, delegate: SharedSessionDelegate) {
        self.delegate = Some(delegate);
        lock(&self.state).calls.push(SessionCall::SetDelegate);
    }

    fn set_scene(&mut self, scene: SharedScene) {
        self.scene = Some(scene);
        lock(&self.state).calls.push(SessionCall::SetScene);
    }

    fn scene(&self) -> Option<SharedScene> {
        self.scene.clone()
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        lock(&self.state).calls.push(SessionCall::SetViewport(viewport));
    }

    fn run(&mut self) {
        let mut state = lock(&self.state);
        state.running = true;
        state.calls.push(SessionCall::Run);
        log::info!("Scripted AR session running with {} queued frames", state.frames.len());
    }
}

impl ScriptedSessionHandle {
    /// Queue one snapshot
    pub fn push_frame(&self, frame: FrameSnapshot) {
        lock(&self.state).frames.push_back(frame);
    }

    /// Queue several snapshots
    pub fn push_frames(&self, frames: impl IntoIterator<Item = FrameSnapshot>) {
        lock(&self.state).frames.extend(frames);
    }

    /// Queue an anchor event for the next served frame
    pub fn push_anchor_event(&self, event: AnchorEvent) {
        lock(&self.state).anchor_events.push_back(event);
    }

    /// Force readiness regardless of whether the session runs
    pub fn set_ready(&self, ready: bool) {
        lock(&self.state).ready_override = Some(ready);
    }

    /// Configuration calls received so far
    pub fn calls(&self) -> Vec<SessionCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of snapshots handed out
    pub fn frames_served(&self) -> u64 {
        lock(&self.state).frames_served
    }

    /// Snapshots still queued
    pub fn queued_frames(&self) -> usize {
        lock(&self.state).frames.len()
    }
}
