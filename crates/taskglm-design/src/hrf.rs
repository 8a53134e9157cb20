//! SPM canonical haemodynamic response function.
//!
//! The kernel is a difference of two gamma densities (peak at 6 s,
//! undershoot at 16 s, ratio 1:0.167) sampled on a grid of step
//! `tr / oversampling` over 32 s and normalized to unit sum. The time
//! derivative is the finite difference of the kernel with a 0.1 s shift.

use taskglm_stats::distributions::gamma_pdf;

/// Default number of high-resolution samples per repetition time.
pub const DEFAULT_OVERSAMPLING: usize = 50;

const TIME_LENGTH: f64 = 32.0;
const PEAK_DELAY: f64 = 6.0;
const UNDERSHOOT_DELAY: f64 = 16.0;
const UNDERSHOOT_RATIO: f64 = 0.167;
const DERIVATIVE_SHIFT: f64 = 0.1;

/// Evenly spaced samples over `[start, stop]`, both ends included.
#[must_use]
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            #[expect(clippy::cast_precision_loss)]
            let step = (stop - start) / (n - 1) as f64;
            let mut samples = (0..n)
                .map(|i| {
                    #[expect(clippy::cast_precision_loss)]
                    let i = i as f64;
                    start + i * step
                })
                .collect::<Vec<_>>();
            samples[n - 1] = stop;
            samples
        }
    }
}

/// Canonical HRF sampled for one acquisition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalHrf {
    pub tr: f64,
    pub oversampling: usize,
}

impl CanonicalHrf {
    #[must_use]
    pub fn new(tr: f64, oversampling: usize) -> Self {
        Self { tr, oversampling }
    }

    /// High-resolution sampling step in seconds.
    #[must_use]
    pub fn dt(&self) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let oversampling = self.oversampling as f64;
        self.tr / oversampling
    }

    #[must_use]
    pub fn kernel(&self) -> Vec<f64> {
        self.shifted(0.0)
    }

    #[must_use]
    pub fn time_derivative(&self) -> Vec<f64> {
        self.kernel()
            .into_iter()
            .zip(self.shifted(DERIVATIVE_SHIFT))
            .map(|(h, shifted)| (h - shifted) / DERIVATIVE_SHIFT)
            .collect()
    }

    fn shifted(&self, onset: f64) -> Vec<f64> {
        let dt = self.dt();
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (TIME_LENGTH / dt).round_ties_even() as usize;
        let hrf = linspace(0.0, TIME_LENGTH, n)
            .into_iter()
            .map(|t| {
                let t = t - onset;
                gamma_pdf(t, PEAK_DELAY, dt, 1.0)
                    - UNDERSHOOT_RATIO * gamma_pdf(t, UNDERSHOOT_DELAY, dt, 1.0)
            })
            .collect::<Vec<_>>();
        let total = hrf.iter().sum::<f64>();
        if total == 0.0 {
            return hrf;
        }
        hrf.into_iter().map(|h| h / total).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn test_linspace_includes_both_ends() {
        let samples = linspace(-1.0, 1.0, 5);
        assert_eq!(samples, [-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1), [3.0]);
        assert!(linspace(3.0, 4.0, 0).is_empty());
    }

    #[test]
    fn test_kernel_is_normalized_and_peaks_near_five_seconds() {
        let hrf = CanonicalHrf::new(2.0, 50);
        let kernel = hrf.kernel();
        assert_eq!(kernel.len(), 800);
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

        let (peak, _) = kernel
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        #[expect(clippy::cast_precision_loss)]
        let peak_time = peak as f64 * 32.0 / 799.0;
        assert!((4.5..5.5).contains(&peak_time), "{peak_time}");
        // undershoot
        assert!(kernel[kernel.len() * 15 / 32] < 0.0);
    }

    #[test]
    fn test_derivative_sums_to_zero() {
        let derivative = CanonicalHrf::new(1.49, 50).time_derivative();
        assert_abs_diff_eq!(derivative.iter().sum::<f64>(), 0.0, epsilon = 1e-9);
        assert!(derivative.iter().any(|d| *d > 0.0));
        assert!(derivative.iter().any(|d| *d < 0.0));
    }
}
