//! AR session contract

use crate::ar::anchor::{Anchor, AnchorDetection};
use crate::ar::frame::FrameSnapshot;
use crate::foundation::sync::Shared;
use crate::render::texture::TextureHandle;
use crate::render::Viewport;
use crate::scene::SharedScene;

/// Receives anchor lifecycle events from the session
pub trait ArSessionDelegate: Send {
    /// A new anchor was found
    fn anchor_was_detected(&mut self, anchor: &Anchor);

    /// A known anchor moved or grew
    fn anchor_did_update(&mut self, anchor: &Anchor);

    /// A known anchor is no longer tracked
    fn anchor_was_removed(&mut self, anchor: &Anchor);
}

/// Delegate shared between the session and its owner
pub type SharedSessionDelegate = Shared<dyn ArSessionDelegate>;

/// Camera tracking session.
///
/// Implemented by platform AR backends. All methods are called from the
/// render thread.
pub trait ArSession: Send {
    /// True once the session can produce frames
    fn is_ready(&self) -> bool;

    /// Advance the session and return this tick's snapshot
    fn update_frame(&mut self) -> FrameSnapshot;

    /// Texture the session streams camera images into
    fn camera_background_texture(&self) -> TextureHandle;

    /// Choose which anchor types to detect
    fn set_anchor_detection(&mut self, detection: AnchorDetection);

    /// Install the anchor delegate
    fn set_delegate(&mut self, delegate: SharedSessionDelegate);

    /// Scene anchors are reported for
    fn set_scene(&mut self, scene: SharedScene);

    /// Scene set by [`ArSession::set_scene`]
    fn scene(&self) -> Option<SharedScene>;

    /// Output viewport, used to map the camera image
    fn set_viewport(&mut self, viewport: Viewport);

    /// Start tracking
    fn run(&mut self);
}
