//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and the field-of-view model
//! - Time sources and rate limiting
//! - Thread-affinity checks
//! - Shared-ownership helpers
//! - Logging utilities

pub mod math;
pub mod time;
pub mod thread;
pub mod sync;
pub mod logging;
