//! AR component manager
//!
//! Sits between the AR session and the AR scene: the session reports anchor
//! events here, the manager keeps the set of live anchors and relays each
//! event to the scene's delegate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use crate::ar::anchor::Anchor;
use crate::ar::session::ArSessionDelegate;
use crate::foundation::sync::{lock, Shared};
use crate::scene::{ArSceneState, Scene, SharedScene};

/// Component manager shared between the renderer, session and scene
pub type SharedComponentManager = Shared<ArComponentManager>;

/// Tracks anchors reported by the session
#[derive(Debug, Default)]
pub struct ArComponentManager {
    anchors: HashMap<String, Anchor>,
    scene: Option<Weak<Mutex<Scene>>>,
}

impl ArComponentManager {
    /// Create a manager with no anchors and no scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay future anchor events to `scene`.
    ///
    /// Only a weak reference is kept; events for a dropped scene are still
    /// tracked but not relayed.
    pub fn attach_scene(&mut self, scene: &SharedScene) {
        self.scene = Some(Arc::downgrade(scene));
    }

    /// Look up a live anchor
    pub fn anchor(&self, id: &str) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    /// Number of live anchors
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    fn relay(&self, event: impl FnOnce(&mut ArSceneState)) {
        let Some(scene) = self.scene.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let mut scene = lock(&scene);
        if let Some(ar) = scene.as_ar_mut() {
            event(ar);
        }
    }
}

impl ArSessionDelegate for ArComponentManager {
    fn anchor_was_detected(&mut self, anchor: &Anchor) {
        log::debug!("Anchor detected: {}", anchor.id);
        self.anchors.insert(anchor.id.clone(), anchor.clone());
        self.relay(|ar| ar.anchor_was_found(anchor));
    }

    fn anchor_did_update(&mut self, anchor: &Anchor) {
        if !self.anchors.contains_key(&anchor.id) {
            log::warn!("Update for unknown anchor {}, treating as new", anchor.id);
            self.anchor_was_detected(anchor);
            return;
        }
        self.anchors.insert(anchor.id.clone(), anchor.clone());
        self.relay(|ar| ar.anchor_was_updated(anchor));
    }

    fn anchor_was_removed(&mut self, anchor: &Anchor) {
        if self.anchors.remove(&anchor.id).is_none() {
            log::debug!("Ignoring removal of unknown anchor {}", anchor.id);
            return;
        }
        self.relay(|ar| ar.anchor_was_removed(anchor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec2, Vec3};
    use crate::foundation::sync::shared;
    use crate::ar::anchor::PlaneAlignment;
    use crate::scene::ArSceneDelegate;

    #[derive(Default)]
    struct Events {
        found: Vec<String>,
        updated: Vec<String>,
        removed: Vec<String>,
    }

    struct RecordingDelegate(Arc<Mutex<Events>>);

    impl ArSceneDelegate for RecordingDelegate {
        fn on_anchor_found(&mut self, anchor: &Anchor) {
            lock(&self.0).found.push(anchor.id.clone());
        }

        fn on_anchor_updated(&mut self, anchor: &Anchor) {
            lock(&self.0).updated.push(anchor.id.clone());
        }

        fn on_anchor_removed(&mut self, anchor: &Anchor) {
            lock(&self.0).removed.push(anchor.id.clone());
        }
    }

    fn floor() -> Anchor {
        Anchor::plane("floor", PlaneAlignment::Horizontal, Vec3::zeros(), Vec2::new(1.0, 1.0))
    }

    fn ar_scene_with_recorder() -> (SharedScene, Arc<Mutex<Events>>) {
        let events = Arc::new(Mutex::new(Events::default()));
        let mut scene = Scene::new_ar();
        if let Some(ar) = scene.as_ar_mut() {
            ar.set_delegate(Box::new(RecordingDelegate(events.clone())));
        }
        (shared(scene), events)
    }

    #[test]
    fn test_anchor_lifecycle_is_relayed() {
        let (scene, events) = ar_scene_with_recorder();
        let mut manager = ArComponentManager::new();
        manager.attach_scene(&scene);

        let mut anchor = floor();
        manager.anchor_was_detected(&anchor);
        anchor.position = Vec3::new(0.0, -1.0, 0.0);
        manager.anchor_did_update(&anchor);
        assert_eq!(manager.anchor("floor").map(|a| a.position), Some(anchor.position));

        manager.anchor_was_removed(&anchor);
        assert_eq!(manager.anchor_count(), 0);

        let events = lock(&events);
        assert_eq!(events.found, vec!["floor"]);
        assert_eq!(events.updated, vec!["floor"]);
        assert_eq!(events.removed, vec!["floor"]);
    }

    #[test]
    fn test_update_for_unknown_anchor_counts_as_found() {
        let (scene, events) = ar_scene_with_recorder();
        let mut manager = ArComponentManager::new();
        manager.attach_scene(&scene);

        manager.anchor_did_update(&floor());
        assert_eq!(manager.anchor_count(), 1);
        assert_eq!(lock(&events).found.len(), 1);
        assert!(lock(&events).updated.is_empty());
    }

    #[test]
    fn test_tracks_anchors_without_scene() {
        let mut manager = ArComponentManager::new();
        manager.anchor_was_detected(&floor());
        assert_eq!(manager.anchor_count(), 1);

        let scene = shared(Scene::new_ar());
        manager.attach_scene(&scene);
        drop(scene);
        manager.anchor_was_removed(&floor());
        assert_eq!(manager.anchor_count(), 0);
    }
}
