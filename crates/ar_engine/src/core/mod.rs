//! # Core Engine Module
//!
//! Shared configuration types that the renderer, the post-process passes and
//! applications all consume.

pub mod config;

pub use config::{AnchorDetectionConfig, ArRendererConfig, BlurPassConfig, EngineConfig};
