//! Isotropic Gaussian smoothing of BOLD frames.
//!
//! Each axis is filtered separately with a normalized Gaussian truncated at
//! four standard deviations. Samples beyond the edge mirror the volume
//! including the edge voxel (`d c b a | a b c d | d c b a`).

use ndarray::{Array3, ArrayViewMut1, ArrayViewMut3, Axis, parallel::prelude::*};

use crate::volume::BoldSeries;

const TRUNCATE: f64 = 4.0;

/// Per-axis standard deviation, in voxels, of a kernel with the given FWHM
/// in millimetres.
#[must_use]
pub fn fwhm_to_sigma(fwhm: f64, voxel_size: [f64; 3]) -> [f64; 3] {
    let fwhm_over_sigma = (8.0 * 2.0_f64.ln()).sqrt();
    voxel_size.map(|size| fwhm / (fwhm_over_sigma * size))
}

/// Normalized 1-D Gaussian weights of radius `⌊4σ + 0.5⌋`.
#[must_use]
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radius = (TRUNCATE * sigma + 0.5) as usize;
    #[expect(clippy::cast_precision_loss)]
    let weights = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-0.5 * (x / sigma).powi(2)).exp()
        })
        .collect::<Vec<_>>();
    let total = weights.iter().sum::<f64>();
    weights.into_iter().map(|w| w / total).collect()
}

#[expect(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn reflect(index: isize, len: usize) -> usize {
    let m = index.rem_euclid(2 * len as isize) as usize;
    if m < len { m } else { 2 * len - 1 - m }
}

#[expect(clippy::cast_possible_wrap)]
fn filter_line(mut line: ArrayViewMut1<'_, f64>, kernel: &[f64], scratch: &mut Vec<f64>) {
    let len = line.len();
    let radius = (kernel.len() / 2) as isize;
    scratch.clear();
    scratch.extend(line.iter().copied());
    for (i, out) in line.iter_mut().enumerate() {
        *out = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * scratch[reflect(i as isize + k as isize - radius, len)])
            .sum();
    }
}

/// Smooths one volume in place. Non-finite values are zeroed first.
pub fn smooth_volume(mut volume: ArrayViewMut3<'_, f64>, sigma: [f64; 3]) {
    volume.mapv_inplace(|v| if v.is_finite() { v } else { 0.0 });
    let mut scratch = Vec::new();
    for (axis, sigma) in sigma.into_iter().enumerate() {
        if sigma <= 0.0 || volume.len_of(Axis(axis)) == 0 {
            continue;
        }
        let kernel = gaussian_kernel(sigma);
        for line in volume.lanes_mut(Axis(axis)) {
            filter_line(line, &kernel, &mut scratch);
        }
    }
}

/// Smooths every frame of `bold`, frames in parallel.
pub fn smooth_bold(bold: &mut BoldSeries, fwhm: f64) {
    let sigma = fwhm_to_sigma(fwhm, bold.voxel_size());
    bold.data_mut()
        .axis_iter_mut(Axis(3))
        .into_par_iter()
        .for_each(|frame| smooth_volume(frame, sigma));
}

/// Convenience wrapper returning a smoothed copy of one volume.
#[must_use]
pub fn smoothed(volume: &Array3<f64>, sigma: [f64; 3]) -> Array3<f64> {
    let mut volume = volume.clone();
    smooth_volume(volume.view_mut(), sigma);
    volume
}
