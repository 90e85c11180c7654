//! AR-specific scene state
//!
//! A scene becomes an AR scene by carrying an [`ArSceneState`]. The renderer
//! and component manager reach it through [`crate::scene::Scene::as_ar_mut`].

use std::fmt;

use crate::ar::anchor::Anchor;
use crate::ar::component_manager::SharedComponentManager;
use crate::ar::frame::AmbientLightEstimate;
use crate::scene::node::SharedNode;

/// Application callbacks for AR scene events.
///
/// Every method has an empty default so implementors only override what
/// they care about.
pub trait ArSceneDelegate: Send {
    /// Camera tracking produced its first real pose
    fn on_tracking_initialized(&mut self) {}

    /// New lighting estimate
    fn on_ambient_light_update(&mut self, _intensity: f32, _color_temperature: f32) {}

    /// An anchor was found
    fn on_anchor_found(&mut self, _anchor: &Anchor) {}

    /// An anchor changed
    fn on_anchor_updated(&mut self, _anchor: &Anchor) {}

    /// An anchor was lost
    fn on_anchor_removed(&mut self, _anchor: &Anchor) {}
}

/// State carried by AR scenes
#[derive(Default)]
pub struct ArSceneState {
    tracking_initialized: bool,
    ambient_light: AmbientLightEstimate,
    component_manager: Option<SharedComponentManager>,
    point_of_view: Option<SharedNode>,
    delegate: Option<Box<dyn ArSceneDelegate>>,
}

impl fmt::Debug for ArSceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArSceneState")
            .field("tracking_initialized", &self.tracking_initialized)
            .field("ambient_light", &self.ambient_light)
            .field("has_component_manager", &self.component_manager.is_some())
            .field("has_delegate", &self.delegate.is_some())
            .finish_non_exhaustive()
    }
}

impl ArSceneState {
    /// Fresh state: tracking not initialized, default lighting
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the application delegate
    pub fn set_delegate(&mut self, delegate: Box<dyn ArSceneDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Record that tracking produced its first pose and notify the delegate
    pub fn tracking_has_initialized(&mut self) {
        self.tracking_initialized = true;
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_tracking_initialized();
        }
    }

    /// True after [`Self::tracking_has_initialized`]
    pub fn is_tracking_initialized(&self) -> bool {
        self.tracking_initialized
    }

    /// Store the latest lighting estimate and notify the delegate
    pub fn update_ambient_light(&mut self, intensity: f32, color_temperature: f32) {
        self.ambient_light = AmbientLightEstimate::new(intensity, color_temperature);
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_ambient_light_update(intensity, color_temperature);
        }
    }

    /// Latest lighting estimate
    pub fn ambient_light(&self) -> AmbientLightEstimate {
        self.ambient_light
    }

    /// Attach the component manager tracking this scene's anchors
    pub fn set_ar_component_manager(&mut self, manager: SharedComponentManager) {
        self.component_manager = Some(manager);
    }

    /// Attached component manager
    pub fn component_manager(&self) -> Option<&SharedComponentManager> {
        self.component_manager.as_ref()
    }

    /// Node that follows the AR camera
    pub fn set_point_of_view(&mut self, node: SharedNode) {
        self.point_of_view = Some(node);
    }

    /// Node that follows the AR camera
    pub fn point_of_view(&self) -> Option<&SharedNode> {
        self.point_of_view.as_ref()
    }

    pub(crate) fn anchor_was_found(&mut self, anchor: &Anchor) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_anchor_found(anchor);
        }
    }

    pub(crate) fn anchor_was_updated(&mut self, anchor: &Anchor) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_anchor_updated(anchor);
        }
    }

    pub(crate) fn anchor_was_removed(&mut self, anchor: &Anchor) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_anchor_removed(anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDelegate {
        initialized: Arc<AtomicUsize>,
        light_updates: Arc<AtomicUsize>,
    }

    impl ArSceneDelegate for CountingDelegate {
        fn on_tracking_initialized(&mut self) {
            self.initialized.fetch_add(1, Ordering::SeqCst);
        }

        fn on_ambient_light_update(&mut self, _intensity: f32, _color_temperature: f32) {
            self.light_updates.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_notifications_reach_delegate() {
        let initialized = Arc::new(AtomicUsize::new(0));
        let light_updates = Arc::new(AtomicUsize::new(0));
        let mut state = ArSceneState::new();
        state.set_delegate(Box::new(CountingDelegate {
            initialized: initialized.clone(),
            light_updates: light_updates.clone(),
        }));

        state.tracking_has_initialized();
        state.update_ambient_light(800.0, 5000.0);

        assert!(state.is_tracking_initialized());
        assert_eq!(state.ambient_light(), AmbientLightEstimate::new(800.0, 5000.0));
        assert_eq!(initialized.load(Ordering::SeqCst), 1);
        assert_eq!(light_updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_works_without_delegate() {
        let mut state = ArSceneState::new();
        state.tracking_has_initialized();
        state.update_ambient_light(1.0, 2.0);
        assert!(state.is_tracking_initialized());
    }
}
