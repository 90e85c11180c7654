//! Detected real-world anchors

use bitflags::bitflags;

use crate::foundation::math::{Vec2, Vec3};

bitflags! {
    /// Anchor types the session should look for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnchorDetection: u32 {
        /// Floors, tables and other horizontal surfaces
        const PLANES_HORIZONTAL = 1 << 0;
        /// Walls and other vertical surfaces
        const PLANES_VERTICAL = 1 << 1;
    }
}

impl Default for AnchorDetection {
    fn default() -> Self {
        Self::PLANES_HORIZONTAL
    }
}

/// Orientation of a detected plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneAlignment {
    /// Facing up or down
    Horizontal,
    /// Facing sideways
    Vertical,
}

/// What an anchor is attached to
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorKind {
    /// A detected plane with its extent in meters
    Plane {
        /// Plane orientation
        alignment: PlaneAlignment,
        /// Width and depth
        extent: Vec2,
    },
    /// A free-standing point
    Point,
}

/// A tracked point of interest in the real world
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Session-assigned identifier, stable across updates
    pub id: String,
    /// Anchor type
    pub kind: AnchorKind,
    /// World-space center
    pub position: Vec3,
}

impl Anchor {
    /// Create a plane anchor
    pub fn plane(id: impl Into<String>, alignment: PlaneAlignment, position: Vec3, extent: Vec2) -> Self {
        Self {
            id: id.into(),
            kind: AnchorKind::Plane { alignment, extent },
            position,
        }
    }

    /// Create a point anchor
    pub fn point(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            kind: AnchorKind::Point,
            position,
        }
    }

    /// Whether `detection` asks for anchors of this kind
    pub fn is_requested_by(&self, detection: AnchorDetection) -> bool {
        match self.kind {
            AnchorKind::Plane {
                alignment: PlaneAlignment::Horizontal,
                ..
            } => detection.contains(AnchorDetection::PLANES_HORIZONTAL),
            AnchorKind::Plane {
                alignment: PlaneAlignment::Vertical,
                ..
            } => detection.contains(AnchorDetection::PLANES_VERTICAL),
            AnchorKind::Point => true,
        }
    }
}
