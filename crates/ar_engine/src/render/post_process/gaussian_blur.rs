//! Separable Gaussian blur for bloom
//!
//! The blur ping-pongs between two render targets. A pre-blur program first
//! copies the input into the output target (reinforcing its intensity), then
//! each iteration runs one horizontal or one vertical pass:
//!
//! ```text
//! pre-blur:  input     -> output
//! pass 0:    output    -> ping_pong   (horizontal)
//! pass 1:    ping_pong -> output      (vertical)
//! ...
//! ```
//!
//! The iteration count is always even, so the result ends in `output`.
//!
//! Compiled programs are created lazily on the next render after any
//! shader-affecting setter, so several setters in a row cost one compile.

use crate::core::BlurPassConfig;
use crate::foundation::math::Vec4;
use crate::render::driver::{Driver, ProgramHandle};
use crate::render::post_process::kernel::{self, BlurKernel};
use crate::render::post_process::pass::{RenderContext, RenderPass, RenderPassIo, RENDER_TARGET_SINGLE_OUTPUT};
use crate::render::post_process::program::{BlurPassUniforms, PostProcessProgram};
use crate::render::texture::RenderTargetHandle;
use crate::render::RenderError;
use crate::scene::Scene;

/// Input key for the texture to blur
pub const GAUSSIAN_INPUT: &str = "G_Input";

/// Input key for the intermediate ping-pong target
pub const GAUSSIAN_PING_PONG: &str = "G_PP";

#[derive(Debug, Clone, Copy)]
struct BlurPrograms {
    pre_blur: ProgramHandle,
    blur: ProgramHandle,
}

/// Gaussian blur render pass
#[derive(Debug)]
pub struct GaussianBlurPass {
    /// Higher sigma spreads the distribution, softening the blur
    sigma: f32,

    /// Width of the convolution window in texels
    kernel_size: u32,

    /// False gives a "feathery" blur; true keeps the same overall brightness
    /// regardless of kernel size
    normalized_kernel: bool,

    /// Merge taps so each lookup is a bilinear fetch of two texels
    bilinear_texture_lookup: bool,

    /// Horizontal plus vertical passes
    num_blur_iterations: u32,

    /// True if compositing onto a background with transparent pixels
    consider_transparent_pixels: bool,

    /// Premultiplied intensity applied to the input before blurring
    reinforced_intensity: f32,

    kernel: BlurKernel,
    programs: Option<BlurPrograms>,
    retired_programs: Vec<ProgramHandle>,
    passes_last_render: u32,
}

impl Default for GaussianBlurPass {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianBlurPass {
    /// Create a blur pass with default settings
    pub fn new() -> Self {
        Self::from_config(&BlurPassConfig::default())
    }

    /// Create a blur pass from configuration
    ///
    /// # Panics
    /// If the kernel size or iteration count is odd, or sigma is not positive.
    pub fn from_config(config: &BlurPassConfig) -> Self {
        let mut pass = Self {
            sigma: config.sigma,
            kernel_size: config.kernel_size,
            normalized_kernel: config.normalized,
            bilinear_texture_lookup: config.bilinear_texture_lookup,
            num_blur_iterations: 0,
            consider_transparent_pixels: true,
            reinforced_intensity: config.reinforced_intensity,
            kernel: BlurKernel::default(),
            programs: None,
            retired_programs: Vec::new(),
            passes_last_render: 0,
        };
        pass.set_num_blur_iterations(config.num_blur_iterations);
        pass.set_blur_kernel(config.kernel_size, config.sigma, config.normalized);
        pass
    }

    /// Set the number of blur passes. More iterations, more blur.
    ///
    /// # Panics
    /// If `num_iterations` is odd: every horizontal pass needs its vertical pair.
    pub fn set_num_blur_iterations(&mut self, num_iterations: u32) {
        assert!(
            num_iterations % 2 == 0,
            "Blur iteration count must be even, got {num_iterations}"
        );
        self.num_blur_iterations = num_iterations;
    }

    /// Number of blur passes per render
    pub fn num_blur_iterations(&self) -> u32 {
        self.num_blur_iterations
    }

    /// Set the kernel shape.
    ///
    /// * `kernel_size` controls the spread of the blur
    /// * `sigma` controls the blur intensity
    /// * `normalized` keeps a consistent look across kernel sizes
    ///
    /// # Panics
    /// If `kernel_size` is odd or zero, or `sigma` is not positive.
    pub fn set_blur_kernel(&mut self, kernel_size: u32, sigma: f32, normalized: bool) {
        assert!(
            kernel_size >= 2 && kernel_size % 2 == 0,
            "Blur kernel size must be an even number >= 2, got {kernel_size}"
        );
        assert!(sigma > 0.0, "Blur sigma must be positive, got {sigma}");

        self.kernel_size = kernel_size;
        self.sigma = sigma;
        self.normalized_kernel = normalized;
        self.rebuild_kernel();
        self.reset_programs();
    }

    /// Kernel window size in texels
    pub fn kernel_size(&self) -> u32 {
        self.kernel_size
    }

    /// Gaussian standard deviation
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Whether kernel weights are normalized
    pub fn is_normalized(&self) -> bool {
        self.normalized_kernel
    }

    /// Enable or disable bilinear tap merging (on by default)
    pub fn set_bilinear_texture_lookup(&mut self, enabled: bool) {
        if self.bilinear_texture_lookup == enabled {
            return;
        }
        self.bilinear_texture_lookup = enabled;
        self.rebuild_kernel();
        self.reset_programs();
    }

    /// Whether bilinear tap merging is enabled
    pub fn bilinear_texture_lookup(&self) -> bool {
        self.bilinear_texture_lookup
    }

    /// Tell the pass about the renderer's clear color.
    ///
    /// Only the alpha matters: a translucent background means the input has
    /// premultiplied transparent pixels the pre-blur must account for.
    pub fn set_clear_color(&mut self, color: Vec4) {
        let consider_transparent_pixels = color.w < 1.0;
        if self.consider_transparent_pixels != consider_transparent_pixels {
            self.consider_transparent_pixels = consider_transparent_pixels;
            self.reset_programs();
        }
    }

    /// Whether the pre-blur accounts for transparent pixels
    pub fn considers_transparent_pixels(&self) -> bool {
        self.consider_transparent_pixels
    }

    /// Scale applied to input RGB before blurring
    pub fn set_reinforced_intensity(&mut self, intensity: f32) {
        if self.reinforced_intensity != intensity {
            self.reinforced_intensity = intensity;
            self.reset_programs();
        }
    }

    /// Scale applied to input RGB before blurring
    pub fn reinforced_intensity(&self) -> f32 {
        self.reinforced_intensity
    }

    /// Kernel the blur program is (or will be) compiled with
    pub fn kernel(&self) -> &BlurKernel {
        &self.kernel
    }

    /// True once programs are compiled and still valid
    pub fn has_compiled_programs(&self) -> bool {
        self.programs.is_some()
    }

    /// Blur passes executed by the most recent render
    pub fn passes_last_render(&self) -> u32 {
        self.passes_last_render
    }

    /// Blur `input`, using `ping_pong` as scratch, leaving the result in `output`.
    pub fn blur(
        &mut self,
        input: RenderTargetHandle,
        ping_pong: RenderTargetHandle,
        output: RenderTargetHandle,
        driver: &mut dyn Driver,
    ) -> Result<RenderTargetHandle, RenderError> {
        let programs = self.ensure_programs(driver)?;

        driver.blit(programs.pre_blur, input, output, &[])?;

        let mut horizontal = true;
        self.passes_last_render = 0;
        for _ in 0..self.num_blur_iterations {
            let (source, target) = if horizontal { (output, ping_pong) } else { (ping_pong, output) };
            let uniforms = BlurPassUniforms::new(horizontal);
            driver.blit(programs.blur, source, target, bytemuck::bytes_of(&uniforms))?;

            self.passes_last_render += 1;
            horizontal = !horizontal;
        }

        log::trace!(
            "Gaussian blur: {} passes, {} taps",
            self.passes_last_render,
            self.kernel.tap_count()
        );
        Ok(output)
    }

    /// Free compiled programs. The pass recompiles on its next render.
    pub fn release(&mut self, driver: &mut dyn Driver) {
        self.reset_programs();
        self.release_retired(driver);
    }

    fn rebuild_kernel(&mut self) {
        let kernel = kernel::compute_kernel(self.kernel_size, self.sigma, self.normalized_kernel);
        self.kernel = if self.bilinear_texture_lookup {
            kernel::to_linear_sampling(&kernel)
        } else {
            kernel
        };
    }

    fn reset_programs(&mut self) {
        if let Some(programs) = self.programs.take() {
            self.retired_programs.push(programs.pre_blur);
            self.retired_programs.push(programs.blur);
        }
    }

    fn release_retired(&mut self, driver: &mut dyn Driver) {
        for program in self.retired_programs.drain(..) {
            driver.release_post_process(program);
        }
    }

    fn ensure_programs(&mut self, driver: &mut dyn Driver) -> Result<BlurPrograms, RenderError> {
        self.release_retired(driver);
        if let Some(programs) = self.programs {
            return Ok(programs);
        }

        let pre_blur = driver.compile_post_process(&PostProcessProgram::PreBlur {
            reinforced_intensity: self.reinforced_intensity,
            consider_transparent_pixels: self.consider_transparent_pixels,
        })?;
        let blur = match driver.compile_post_process(&PostProcessProgram::GaussianBlur {
            weights: self.kernel.weights().to_vec(),
            offsets: self.kernel.offsets().to_vec(),
        }) {
            Ok(blur) => blur,
            Err(e) => {
                driver.release_post_process(pre_blur);
                return Err(e);
            }
        };

        log::debug!(
            "Compiled Gaussian blur programs (kernel {}, sigma {}, {} taps)",
            self.kernel_size,
            self.sigma,
            self.kernel.tap_count()
        );

        let programs = BlurPrograms { pre_blur, blur };
        self.programs = Some(programs);
        Ok(programs)
    }
}

impl RenderPass for GaussianBlurPass {
    fn name(&self) -> &str {
        "GaussianBlur"
    }

    fn render(
        &mut self,
        _scene: Option<&Scene>,
        _outgoing_scene: Option<&Scene>,
        io: &mut RenderPassIo,
        _context: &RenderContext,
        driver: &mut dyn Driver,
    ) -> Result<(), RenderError> {
        let input = io.input(GAUSSIAN_INPUT)?;
        let ping_pong = io.input(GAUSSIAN_PING_PONG)?;
        let output = io.output(RENDER_TARGET_SINGLE_OUTPUT)?;

        let result = self.blur(input, ping_pong, output, driver)?;
        io.outputs.insert(RENDER_TARGET_SINGLE_OUTPUT.to_string(), result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::{CommandLog, HeadlessDriver, RenderCommand};

    fn targets() -> (RenderTargetHandle, RenderTargetHandle, RenderTargetHandle) {
        (RenderTargetHandle(1), RenderTargetHandle(2), RenderTargetHandle(3))
    }

    fn compile_count(log: &CommandLog) -> usize {
        log.count(|c| matches!(c, RenderCommand::CompileProgram { .. }))
    }

    #[test]
    fn test_kernel_size_four_sigma_one() {
        let mut pass = GaussianBlurPass::new();
        pass.set_blur_kernel(4, 1.0, true);
        pass.set_num_blur_iterations(6);

        let weights = pass.kernel().weights();
        assert!(!weights.is_empty());
        assert!(weights.iter().all(|&w| w > 0.0 && w < 1.0));
        approx::assert_relative_eq!(pass.kernel().total_weight(), 1.0, epsilon = 1e-5);

        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone());
        let (input, ping_pong, output) = targets();
        pass.blur(input, ping_pong, output, &mut driver).unwrap();

        assert_eq!(pass.passes_last_render(), 6);
        let blur_blits = log.count(|c| matches!(c, RenderCommand::Blit { uniforms, .. } if !uniforms.is_empty()));
        assert_eq!(blur_blits, 6);
    }

    #[test]
    #[should_panic(expected = "even")]
    fn test_odd_kernel_size_panics() {
        GaussianBlurPass::new().set_blur_kernel(5, 1.0, true);
    }

    #[test]
    #[should_panic(expected = "even")]
    fn test_odd_iteration_count_panics() {
        GaussianBlurPass::new().set_num_blur_iterations(3);
    }

    #[test]
    #[should_panic(expected = "sigma")]
    fn test_non_positive_sigma_panics() {
        GaussianBlurPass::new().set_blur_kernel(4, 0.0, true);
    }

    #[test]
    fn test_ping_pong_sequence_ends_in_output() {
        let mut pass = GaussianBlurPass::new();
        pass.set_num_blur_iterations(4);

        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone());
        let (input, ping_pong, output) = targets();
        let result = pass.blur(input, ping_pong, output, &mut driver).unwrap();
        assert_eq!(result, output);

        let blits: Vec<_> = log
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                RenderCommand::Blit { source, target, uniforms, .. } => Some((source, target, uniforms)),
                _ => None,
            })
            .collect();

        assert_eq!(blits.len(), 5);
        assert_eq!((blits[0].0, blits[0].1), (input, output));
        assert!(blits[0].2.is_empty());

        let expected = [(output, ping_pong, true), (ping_pong, output, false)];
        for (i, (source, target, uniforms)) in blits[1..].iter().enumerate() {
            let (exp_source, exp_target, exp_horizontal) = expected[i % 2];
            let uniforms: BlurPassUniforms = bytemuck::pod_read_unaligned(uniforms);
            assert_eq!(*source, exp_source);
            assert_eq!(*target, exp_target);
            assert_eq!(uniforms.is_horizontal(), exp_horizontal);
        }
    }

    #[test]
    fn test_setters_rebuild_programs_lazily() {
        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone());
        let (input, ping_pong, output) = targets();

        let mut pass = GaussianBlurPass::new();
        assert!(!pass.has_compiled_programs());
        assert_eq!(compile_count(&log), 0);

        pass.blur(input, ping_pong, output, &mut driver).unwrap();
        assert_eq!(compile_count(&log), 2);

        pass.set_blur_kernel(6, 2.0, false);
        pass.set_reinforced_intensity(2.5);
        pass.set_bilinear_texture_lookup(false);
        pass.set_clear_color(Vec4::new(0.0, 0.0, 0.0, 0.5));
        assert!(!pass.has_compiled_programs());
        assert_eq!(compile_count(&log), 2);

        pass.blur(input, ping_pong, output, &mut driver).unwrap();
        assert_eq!(compile_count(&log), 4);
        assert_eq!(log.count(|c| matches!(c, RenderCommand::ReleaseProgram(_))), 2);
    }

    #[test]
    fn test_unchanged_settings_keep_programs() {
        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone());
        let (input, ping_pong, output) = targets();

        let mut pass = GaussianBlurPass::new();
        pass.blur(input, ping_pong, output, &mut driver).unwrap();

        pass.set_reinforced_intensity(pass.reinforced_intensity());
        pass.set_bilinear_texture_lookup(true);
        pass.set_clear_color(Vec4::new(0.1, 0.1, 0.1, 0.2));
        pass.set_num_blur_iterations(2);
        assert!(pass.has_compiled_programs());

        pass.blur(input, ping_pong, output, &mut driver).unwrap();
        assert_eq!(compile_count(&log), 2);
        assert_eq!(pass.passes_last_render(), 2);
    }

    #[test]
    fn test_opaque_clear_color_disables_transparency_handling() {
        let mut pass = GaussianBlurPass::new();
        assert!(pass.considers_transparent_pixels());
        pass.set_clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(!pass.considers_transparent_pixels());
    }

    #[test]
    fn test_bilinear_toggle_changes_tap_count() {
        let mut pass = GaussianBlurPass::new();
        pass.set_blur_kernel(8, 2.0, true);
        let merged = pass.kernel().tap_count();
        pass.set_bilinear_texture_lookup(false);
        assert_eq!(pass.kernel().tap_count(), 9);
        assert!(merged < 9);
    }

    #[test]
    fn test_render_pass_reads_named_bindings() {
        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone());
        let (input, ping_pong, output) = targets();
        let mut io = RenderPassIo::new()
            .with_input(GAUSSIAN_INPUT, input)
            .with_input(GAUSSIAN_PING_PONG, ping_pong)
            .with_output(RENDER_TARGET_SINGLE_OUTPUT, output);

        let mut pass = GaussianBlurPass::new();
        pass.render(None, None, &mut io, &RenderContext::default(), &mut driver)
            .unwrap();

        assert_eq!(io.output(RENDER_TARGET_SINGLE_OUTPUT).unwrap(), output);
        assert_eq!(pass.passes_last_render(), pass.num_blur_iterations());
    }

    #[test]
    fn test_render_pass_missing_binding_is_an_error() {
        let mut driver = HeadlessDriver::new(CommandLog::new());
        let mut io = RenderPassIo::new().with_input(GAUSSIAN_INPUT, RenderTargetHandle(1));

        let mut pass = GaussianBlurPass::new();
        let result = pass.render(None, None, &mut io, &RenderContext::default(), &mut driver);
        assert!(matches!(result, Err(RenderError::MissingRenderTarget(key)) if key == GAUSSIAN_PING_PONG));
    }

    #[test]
    fn test_compile_failure_propagates() {
        let log = CommandLog::new();
        let mut driver = HeadlessDriver::new(log.clone()).with_failing_compiles();
        let (input, ping_pong, output) = targets();

        let mut pass = GaussianBlurPass::new();
        let result = pass.blur(input, ping_pong, output, &mut driver);
        assert!(matches!(result, Err(RenderError::ProgramCompilationFailed(_))));
        assert!(!pass.has_compiled_programs());
    }
}
