//! # Engine Configuration
//!
//! Configuration structures for the AR renderer and its post-process passes.
//! Every field has a default, and files may specify only the fields they
//! want to override.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging level and the nested subsystem configs
//! - **AR Renderer Config**: clipping, suspended-state diagnostics, anchor detection
//! - **Blur Pass Config**: Gaussian kernel and iteration settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ar::AnchorDetection;
use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec4;

/// Which real-world features the AR session should detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorDetectionConfig {
    /// Detect horizontal planes (floors, tables)
    pub planes_horizontal: bool,
    /// Detect vertical planes (walls)
    pub planes_vertical: bool,
}

impl Default for AnchorDetectionConfig {
    fn default() -> Self {
        Self {
            planes_horizontal: true,
            planes_vertical: false,
        }
    }
}

impl AnchorDetectionConfig {
    /// Convert to the session-facing flag set
    pub fn to_flags(self) -> AnchorDetection {
        let mut flags = AnchorDetection::empty();
        flags.set(AnchorDetection::PLANES_HORIZONTAL, self.planes_horizontal);
        flags.set(AnchorDetection::PLANES_VERTICAL, self.planes_vertical);
        flags
    }
}

/// # AR Renderer Configuration
///
/// Settings consumed by [`crate::renderer::ArSceneRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArRendererConfig {
    /// Near clipping plane used for every AR projection
    pub near_plane: f32,
    /// Minimum spacing between "renderer suspended" warnings
    pub suspended_warning_interval_ms: u64,
    /// Solid color shown while suspended [R, G, B, A]
    pub suspended_clear_color: [f32; 4],
    /// Horizontal field of view used while waiting for tracking.
    ///
    /// Handed to the frame renderer when the AR renderer is created.
    pub mono_fov_x_degrees: f32,
    /// Start suspended until the host calls `set_suspended(false)`
    pub start_suspended: bool,
    /// Anchor types requested from the AR session
    pub anchor_detection: AnchorDetectionConfig,
}

impl Default for ArRendererConfig {
    fn default() -> Self {
        Self {
            near_plane: 0.01,
            suspended_warning_interval_ms: 200,
            suspended_clear_color: [0.0, 0.0, 0.0, 1.0],
            mono_fov_x_degrees: 60.0,
            start_suspended: true,
            anchor_detection: AnchorDetectionConfig::default(),
        }
    }
}

impl ArRendererConfig {
    /// Set the near clipping plane
    pub fn with_near_plane(mut self, near: f32) -> Self {
        self.near_plane = near;
        self
    }

    /// Set the suspended warning interval
    pub fn with_suspended_warning_interval(mut self, interval: Duration) -> Self {
        self.suspended_warning_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the synthesized horizontal field of view
    pub fn with_mono_fov_x(mut self, degrees: f32) -> Self {
        self.mono_fov_x_degrees = degrees;
        self
    }

    /// Choose whether the renderer starts suspended
    pub fn with_start_suspended(mut self, suspended: bool) -> Self {
        self.start_suspended = suspended;
        self
    }

    /// Set the anchor detection request
    pub fn with_anchor_detection(mut self, detection: AnchorDetectionConfig) -> Self {
        self.anchor_detection = detection;
        self
    }

    /// Suspended warning interval as a [`Duration`]
    pub fn suspended_warning_interval(&self) -> Duration {
        Duration::from_millis(self.suspended_warning_interval_ms)
    }

    /// Suspended clear color as a vector
    pub fn suspended_clear_color(&self) -> Vec4 {
        Vec4::from(self.suspended_clear_color)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near_plane > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "near_plane must be positive, got {}",
                self.near_plane
            )));
        }
        if !(self.mono_fov_x_degrees > 0.0 && self.mono_fov_x_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "mono_fov_x_degrees must be in (0, 180), got {}",
                self.mono_fov_x_degrees
            )));
        }
        Ok(())
    }
}

/// # Blur Pass Configuration
///
/// Initial settings for [`crate::render::post_process::GaussianBlurPass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurPassConfig {
    /// Convolution window size; must be even
    pub kernel_size: u32,
    /// Gaussian standard deviation; must be positive
    pub sigma: f32,
    /// Normalize kernel weights to sum to one
    pub normalized: bool,
    /// Merge taps to use bilinear texture lookups
    pub bilinear_texture_lookup: bool,
    /// Number of separable passes; must be even
    pub num_blur_iterations: u32,
    /// Scale applied to input RGB before blurring
    pub reinforced_intensity: f32,
}

impl Default for BlurPassConfig {
    fn default() -> Self {
        Self {
            kernel_size: 10,
            sigma: 5.0,
            normalized: false,
            bilinear_texture_lookup: true,
            num_blur_iterations: 10,
            reinforced_intensity: 1.0,
        }
    }
}

impl BlurPassConfig {
    /// Validate the configuration
    ///
    /// The pass itself asserts on these; validating up front turns a bad
    /// config file into an error instead of a panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kernel_size < 2 || self.kernel_size % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "kernel_size must be an even number >= 2, got {}",
                self.kernel_size
            )));
        }
        if !(self.sigma > 0.0) {
            return Err(ConfigError::Invalid(format!("sigma must be positive, got {}", self.sigma)));
        }
        if self.num_blur_iterations % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "num_blur_iterations must be even, got {}",
                self.num_blur_iterations
            )));
        }
        Ok(())
    }
}

/// # Engine Configuration
///
/// Top-level configuration loaded by applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// AR renderer settings
    pub renderer: ArRendererConfig,
    /// Blur pass settings
    pub blur: BlurPassConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            renderer: ArRendererConfig::default(),
            blur: BlurPassConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set renderer configuration
    pub fn with_renderer(mut self, renderer: ArRendererConfig) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set blur configuration
    pub fn with_blur(mut self, blur: BlurPassConfig) -> Self {
        self.blur = blur;
        self
    }

    /// Validate every nested configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.renderer.validate()?;
        self.blur.validate()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("ar_engine_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.renderer.suspended_warning_interval(), Duration::from_millis(200));
        assert_eq!(config.renderer.anchor_detection.to_flags(), AnchorDetection::PLANES_HORIZONTAL);
        assert!(config.renderer.start_suspended);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            log_level = "debug"

            [blur]
            kernel_size = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.blur.kernel_size, 4);
        assert_eq!(config.blur.num_blur_iterations, 10);
        assert_eq!(config.renderer, ArRendererConfig::default());
    }

    #[test]
    fn test_odd_kernel_size_rejected() {
        let blur = BlurPassConfig {
            kernel_size: 5,
            ..Default::default()
        };
        assert!(matches!(blur.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_odd_iterations_rejected() {
        let blur = BlurPassConfig {
            num_blur_iterations: 3,
            ..Default::default()
        };
        assert!(blur.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let path = temp_path("engine.toml");
        let config = EngineConfig::default()
            .with_log_level("trace")
            .with_renderer(ArRendererConfig::default().with_near_plane(0.05));

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let path = temp_path("engine.ron");
        let config = EngineConfig::default().with_blur(BlurPassConfig {
            kernel_size: 6,
            sigma: 2.0,
            ..Default::default()
        });

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = EngineConfig::default().save_to_file("engine.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
