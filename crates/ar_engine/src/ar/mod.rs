//! # Augmented Reality
//!
//! The AR session contract, the per-tick frame snapshot it produces, and the
//! anchor bookkeeping shared with AR scenes.

pub mod anchor;
pub mod component_manager;
pub mod frame;
pub mod scripted;
pub mod session;

pub use anchor::{Anchor, AnchorDetection, AnchorKind, PlaneAlignment};
pub use component_manager::{ArComponentManager, SharedComponentManager};
pub use frame::{AmbientLightEstimate, FrameSnapshot, TrackingState};
pub use scripted::{ScriptedArSession, ScriptedSessionHandle};
pub use session::{ArSession, ArSessionDelegate, SharedSessionDelegate};
