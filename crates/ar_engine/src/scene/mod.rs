//! # Scene
//!
//! The scene graph presented by the renderer, the controller that owns it,
//! and the AR extension carried by AR scenes.

pub mod ar_scene;
pub mod material;
pub mod node;
pub mod surface;

pub use ar_scene::{ArSceneDelegate, ArSceneState};
pub use material::{LightingModel, Material};
pub use node::{Node, SharedNode};
pub use surface::{SharedSurface, Surface};

use crate::foundation::sync::{lock, shared, Shared};

/// Scene shared between the controller, the renderer and the AR session
pub type SharedScene = Shared<Scene>;

/// A scene graph rooted at a single node
#[derive(Debug)]
pub struct Scene {
    root: SharedNode,
    ar: Option<ArSceneState>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a plain (non-AR) scene
    pub fn new() -> Self {
        Self {
            root: Node::new("root").into_shared(),
            ar: None,
        }
    }

    /// Create an AR scene
    pub fn new_ar() -> Self {
        Self {
            ar: Some(ArSceneState::new()),
            ..Self::new()
        }
    }

    /// Wrap the scene for sharing
    pub fn into_shared(self) -> SharedScene {
        shared(self)
    }

    /// Root node
    pub fn root(&self) -> &SharedNode {
        &self.root
    }

    /// Attach a node under the root
    pub fn add_node(&self, node: SharedNode) {
        lock(&self.root).add_child(node);
    }

    /// True if this scene carries AR state
    pub fn is_ar(&self) -> bool {
        self.ar.is_some()
    }

    /// AR state, if this is an AR scene
    pub fn as_ar(&self) -> Option<&ArSceneState> {
        self.ar.as_ref()
    }

    /// Mutable AR state, if this is an AR scene
    pub fn as_ar_mut(&mut self) -> Option<&mut ArSceneState> {
        self.ar.as_mut()
    }
}

/// Owns the scene presented by the renderer
#[derive(Debug, Clone)]
pub struct SceneController {
    scene: SharedScene,
}

impl SceneController {
    /// Create a controller presenting `scene`
    pub fn new(scene: SharedScene) -> Self {
        Self { scene }
    }

    /// Presented scene
    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }
}

/// Easing curve for scene transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingFunction {
    /// Constant speed
    #[default]
    Linear,
    /// Slow start
    EaseIn,
    /// Slow finish
    EaseOut,
    /// Slow start and finish
    EaseInEaseOut,
}

impl TimingFunction {
    /// Map linear progress `t` in `[0, 1]` to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInEaseOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Animated switch between scene controllers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransition {
    /// Length of the transition in seconds
    pub duration_seconds: f32,
    /// Easing curve
    pub timing: TimingFunction,
}

impl SceneTransition {
    /// Create a transition
    pub fn new(duration_seconds: f32, timing: TimingFunction) -> Self {
        Self {
            duration_seconds,
            timing,
        }
    }

    /// Eased progress `elapsed_seconds` into the transition
    pub fn progress(&self, elapsed_seconds: f32) -> f32 {
        if self.duration_seconds <= 0.0 {
            return 1.0;
        }
        self.timing.apply(elapsed_seconds / self.duration_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ar_scene_detection() {
        assert!(!Scene::new().is_ar());
        assert!(Scene::new_ar().is_ar());
        assert!(Scene::new().as_ar().is_none());
    }

    #[test]
    fn test_add_node_under_root() {
        let scene = Scene::new();
        scene.add_node(Node::new("box").into_shared());
        assert_eq!(lock(scene.root()).children().len(), 1);
    }

    #[test]
    fn test_timing_function_endpoints() {
        for timing in [
            TimingFunction::Linear,
            TimingFunction::EaseIn,
            TimingFunction::EaseOut,
            TimingFunction::EaseInEaseOut,
        ] {
            assert_relative_eq!(timing.apply(0.0), 0.0);
            assert_relative_eq!(timing.apply(1.0), 1.0);
        }
        assert!(TimingFunction::EaseIn.apply(0.5) < 0.5);
        assert!(TimingFunction::EaseOut.apply(0.5) > 0.5);
        assert_relative_eq!(TimingFunction::EaseInEaseOut.apply(0.5), 0.5);
    }

    #[test]
    fn test_transition_progress() {
        let transition = SceneTransition::new(2.0, TimingFunction::Linear);
        assert_relative_eq!(transition.progress(1.0), 0.5);
        assert_relative_eq!(transition.progress(5.0), 1.0);
        assert_relative_eq!(SceneTransition::new(0.0, TimingFunction::EaseIn).progress(0.0), 1.0);
    }
}
