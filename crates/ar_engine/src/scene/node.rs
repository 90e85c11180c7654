//! Scene graph nodes

use crate::foundation::math::Vec3;
use crate::foundation::sync::{lock, shared, Shared};
use crate::scene::surface::SharedSurface;

/// Node shared between the scene graph and the renderer
pub type SharedNode = Shared<Node>;

/// A positioned element of the scene graph
#[derive(Debug, Default)]
pub struct Node {
    name: String,
    position: Vec3,
    background: Option<SharedSurface>,
    children: Vec<SharedNode>,
}

impl Node {
    /// Create a node at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Wrap the node for sharing
    pub fn into_shared(self) -> SharedNode {
        shared(self)
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position relative to the parent
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the node
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Surface drawn behind everything else when this node is a scene root
    pub fn background(&self) -> Option<&SharedSurface> {
        self.background.as_ref()
    }

    /// Install the background surface
    pub fn set_background(&mut self, surface: SharedSurface) {
        self.background = Some(surface);
    }

    /// Append a child node
    pub fn add_child(&mut self, child: SharedNode) {
        self.children.push(child);
    }

    /// Direct children
    pub fn children(&self) -> &[SharedNode] {
        &self.children
    }

    /// Find a direct or indirect child by name
    pub fn find_child(&self, name: &str) -> Option<SharedNode> {
        for child in &self.children {
            let node = lock(child);
            if node.name == name {
                return Some(child.clone());
            }
            if let Some(found) = node.find_child(name) {
                return Some(found);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_find_nested_child() {
        let grandchild = Node::new("lamp").into_shared();
        let mut child = Node::new("table");
        child.add_child(grandchild.clone());

        let mut root = Node::new("root");
        root.add_child(child.into_shared());

        let found = root.find_child("lamp").unwrap();
        assert!(Arc::ptr_eq(&found, &grandchild));
        assert!(root.find_child("chair").is_none());
    }

    #[test]
    fn test_position_defaults_to_origin() {
        let mut node = Node::new("camera");
        assert_eq!(node.position(), Vec3::zeros());
        node.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(node.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
