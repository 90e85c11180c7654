//! Gaussian kernel precomputation
//!
//! Point-sampling the Gaussian density at each tap underestimates the center
//! and overestimates the tails for small sigmas. Instead each tap's weight is
//! the density integrated over the texel it covers, using Simpson's rule.
//!
//! Taps sit at integer offsets `-k/2 ..= k/2` for an (even) kernel size `k`.
//! The tails beyond the window are dropped, so an unnormalized kernel sums to
//! slightly less than one and produces a softer, "feathery" blur.

/// Total number of density samples spread across the kernel window
const INTEGRATION_SAMPLE_COUNT: f64 = 1000.0;

/// Kernel tap weights and their texel offsets, ordered by offset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlurKernel {
    weights: Vec<f32>,
    offsets: Vec<f32>,
}

impl BlurKernel {
    fn from_taps(taps: &[(f64, f64)]) -> Self {
        Self {
            weights: taps.iter().map(|&(weight, _)| weight as f32).collect(),
            offsets: taps.iter().map(|&(_, offset)| offset as f32).collect(),
        }
    }

    /// Tap weights
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Tap offsets in texels
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Number of texture lookups per pixel per pass
    pub fn tap_count(&self) -> usize {
        self.weights.len()
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// `(weight, offset)` pairs
    pub fn taps(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.weights.iter().copied().zip(self.offsets.iter().copied())
    }
}

/// Normal distribution density at `x`
pub fn gaussian_density(x: f64, mu: f64, sigma: f64) -> f64 {
    let d = x - mu;
    let n = sigma * (2.0 * std::f64::consts::PI).sqrt();
    (-d * d / (2.0 * sigma * sigma)).exp() / n
}

/// Evenly spaced `(x, density)` samples over `[min_inclusive, max_inclusive]`
pub fn samples_for_range(min_inclusive: f64, max_inclusive: f64, sample_count: usize, sigma: f64) -> Vec<(f64, f64)> {
    debug_assert!(sample_count >= 2);
    let step = (max_inclusive - min_inclusive) / (sample_count - 1) as f64;

    (0..sample_count)
        .map(|i| {
            let x = min_inclusive + i as f64 * step;
            (x, gaussian_density(x, 0.0, sigma))
        })
        .collect()
}

/// Composite Simpson's rule over evenly spaced samples.
///
/// The sample count must be odd (an even number of intervals).
pub fn integrate_simpson(samples: &[(f64, f64)]) -> f64 {
    let n = samples.len();
    if n < 3 {
        return 0.0;
    }
    debug_assert!(n % 2 == 1, "Simpson's rule needs an odd number of samples, got {n}");

    let (first_x, first_y) = samples[0];
    let (last_x, last_y) = samples[n - 1];

    let interior: f64 = samples[1..n - 1]
        .iter()
        .enumerate()
        .map(|(i, &(_, y))| if i % 2 == 0 { 4.0 * y } else { 2.0 * y })
        .sum();

    let h = (last_x - first_x) / (n - 1) as f64;
    (first_y + last_y + interior) * h / 3.0
}

/// Samples per tap: an odd count so every tap integrates cleanly
fn samples_per_tap(kernel_size: u32) -> usize {
    let samples = (INTEGRATION_SAMPLE_COUNT / f64::from(kernel_size)).ceil() as usize;
    if samples % 2 == 0 {
        samples + 1
    } else {
        samples.max(3)
    }
}

fn compute_taps(kernel_size: u32, sigma: f32, normalized: bool) -> Vec<(f64, f64)> {
    let sigma = f64::from(sigma);
    let half = i64::from(kernel_size / 2);
    let samples = samples_per_tap(kernel_size);

    let mut taps: Vec<(f64, f64)> = (-half..=half)
        .map(|offset| {
            let center = offset as f64;
            let range = samples_for_range(center - 0.5, center + 0.5, samples, sigma);
            (integrate_simpson(&range), center)
        })
        .collect();

    if normalized {
        let sum: f64 = taps.iter().map(|&(weight, _)| weight).sum();
        if sum > 0.0 {
            for (weight, _) in &mut taps {
                *weight /= sum;
            }
        }
    }

    taps
}

/// Compute the per-texel kernel for an even `kernel_size`
pub fn compute_kernel(kernel_size: u32, sigma: f32, normalized: bool) -> BlurKernel {
    BlurKernel::from_taps(&compute_taps(kernel_size, sigma, normalized))
}

/// Merge neighbouring taps so the GPU's bilinear filter does half the work.
///
/// Sampling between two texels at `(o1 w1 + o2 w2) / (w1 + w2)` with weight
/// `w1 + w2` returns exactly `w1 t1 + w2 t2`. The center tap stays alone;
/// side taps are paired outward from it, and a trailing odd tap is kept.
pub fn to_linear_sampling(kernel: &BlurKernel) -> BlurKernel {
    let taps: Vec<(f64, f64)> = kernel
        .taps()
        .map(|(weight, offset)| (f64::from(weight), f64::from(offset)))
        .collect();
    if taps.len() < 3 {
        return kernel.clone();
    }

    let center = taps
        .iter()
        .position(|&(_, offset)| offset == 0.0)
        .unwrap_or(taps.len() / 2);

    let merge_outward = |side: &[(f64, f64)]| -> Vec<(f64, f64)> {
        side.chunks(2)
            .map(|pair| match *pair {
                [(w1, o1), (w2, o2)] => {
                    let weight = w1 + w2;
                    let offset = if weight > 0.0 {
                        (o1 * w1 + o2 * w2) / weight
                    } else {
                        (o1 + o2) / 2.0
                    };
                    (weight, offset)
                }
                [single] => single,
                _ => unreachable!("chunks(2) yields one or two taps"),
            })
            .collect()
    };

    let left: Vec<(f64, f64)> = taps[..center].iter().rev().copied().collect();
    let right = &taps[center + 1..];

    let mut merged: Vec<(f64, f64)> = merge_outward(&left).into_iter().rev().collect();
    merged.push(taps[center]);
    merged.extend(merge_outward(right));

    BlurKernel::from_taps(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simpson_is_exact_for_cubics() {
        let samples: Vec<(f64, f64)> = (0..5)
            .map(|i| {
                let x = f64::from(i) * 0.5;
                (x, x * x * x)
            })
            .collect();
        assert_relative_eq!(integrate_simpson(&samples), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_needs_three_samples() {
        assert_eq!(integrate_simpson(&[(0.0, 1.0), (1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_center_tap_matches_erf() {
        let kernel = compute_kernel(4, 1.0, false);
        // P(|X| < 0.5) for a unit normal
        assert_relative_eq!(kernel.weights()[2], 0.382_924_9, epsilon = 1e-5);
    }

    #[test]
    fn test_normalized_kernel_sums_to_one() {
        for &(size, sigma) in &[(2, 0.5), (4, 1.0), (10, 5.0), (16, 3.0)] {
            let kernel = compute_kernel(size, sigma, true);
            assert_relative_eq!(kernel.total_weight(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_unnormalized_kernel_loses_tails() {
        let kernel = compute_kernel(4, 1.0, false);
        let total = kernel.total_weight();
        assert!(total < 1.0);
        assert!(total > 0.95);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let kernel = compute_kernel(6, 2.0, true);
        let weights = kernel.weights();
        assert_eq!(kernel.tap_count(), 7);
        for i in 0..weights.len() / 2 {
            assert_relative_eq!(weights[i], weights[weights.len() - 1 - i], epsilon = 1e-7);
        }
        assert_eq!(kernel.offsets(), &[-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_linear_sampling_halves_side_taps() {
        let kernel = compute_kernel(4, 1.0, true);
        let linear = to_linear_sampling(&kernel);

        assert_eq!(linear.tap_count(), 3);
        assert_relative_eq!(linear.total_weight(), kernel.total_weight(), epsilon = 1e-6);
        assert_eq!(linear.offsets()[1], 0.0);

        let w1 = kernel.weights()[3];
        let w2 = kernel.weights()[4];
        assert_relative_eq!(linear.offsets()[2], (w1 + 2.0 * w2) / (w1 + w2), epsilon = 1e-6);
        assert_relative_eq!(linear.offsets()[0], -linear.offsets()[2], epsilon = 1e-6);
    }

    #[test]
    fn test_linear_sampling_keeps_unpaired_tap() {
        let kernel = compute_kernel(6, 2.0, true);
        let linear = to_linear_sampling(&kernel);

        // Three taps per side: one merged pair plus the outermost tap
        assert_eq!(linear.tap_count(), 5);
        assert_eq!(linear.offsets()[4], 3.0);
        assert_eq!(linear.offsets()[0], -3.0);
    }

    #[test]
    fn test_sample_count_is_odd() {
        assert_eq!(samples_per_tap(4), 251);
        assert_eq!(samples_per_tap(10), 101);
        assert_eq!(samples_per_tap(2), 501);
    }
}
