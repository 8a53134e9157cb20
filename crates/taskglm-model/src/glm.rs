//! First-level GLM: smoothing, signal scaling and a least-squares fit
//! under an OLS or AR(1) noise model.
//!
//! Under AR(1) the model is first fitted by OLS. Each voxel's lag-1
//! residual autocorrelation is truncated to two decimals, voxels sharing a
//! coefficient are grouped, and each group is refitted after whitening
//! design and data with `x_t - ρ x_{t-1}` (the first row is kept as is).

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVectorView};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use taskglm_design::{contrast::UnknownColumn, design_matrix::DesignMatrix};
use taskglm_stats::least_squares::{LeastSquaresError, LeastSquaresFit};
use tracing::{debug, warn};

use crate::{
    smoothing,
    volume::{BoldSeries, GridMismatch, Mask},
};

/// AR(1) coefficients are truncated to multiples of `1 / AR1_BINS`.
const AR1_BINS: f64 = 100.0;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display("design has {design_rows} rows but the series has {n_scans} scans")]
    ScanMismatch { design_rows: usize, n_scans: usize },
    #[display("brain mask is empty")]
    EmptyMask,
    #[display("{_0}")]
    Grid(GridMismatch),
    #[display("least-squares fit failed: {_0}")]
    LeastSquares(LeastSquaresError),
    #[display("{_0}")]
    Contrast(UnknownColumn),
}

impl From<GridMismatch> for ModelError {
    fn from(err: GridMismatch) -> Self {
        Self::Grid(err)
    }
}

impl From<LeastSquaresError> for ModelError {
    fn from(err: LeastSquaresError) -> Self {
        Self::LeastSquares(err)
    }
}

impl From<UnknownColumn> for ModelError {
    fn from(err: UnknownColumn) -> Self {
        Self::Contrast(err)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum NoiseModel {
    #[display("ols")]
    Ols,
    #[default]
    #[display("ar1")]
    Ar1,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstLevelModel {
    /// Gaussian FWHM in millimetres; `None` disables smoothing.
    pub smoothing_fwhm: Option<f64>,
    /// Rescale every voxel to percent signal change before fitting.
    pub signal_scaling: bool,
    pub noise_model: NoiseModel,
}

impl Default for FirstLevelModel {
    fn default() -> Self {
        Self {
            smoothing_fwhm: Some(5.0),
            signal_scaling: true,
            noise_model: NoiseModel::Ar1,
        }
    }
}

impl FirstLevelModel {
    /// Smooths `bold`, extracts the in-mask voxels and fits them.
    pub fn fit(
        &self,
        design: &DesignMatrix,
        mut bold: BoldSeries,
        mask: &Mask,
    ) -> Result<FittedModel, ModelError> {
        GridMismatch::check(mask.shape(), bold.shape())?;
        if mask.is_empty() {
            return Err(ModelError::EmptyMask);
        }
        check_scans(design, bold.n_scans())?;
        if let Some(fwhm) = self.smoothing_fwhm.filter(|fwhm| *fwhm > 0.0) {
            smoothing::smooth_bold(&mut bold, fwhm);
        }
        let series = mask.gather(&bold)?;
        self.fit_series(design, series)
    }

    /// Fits an `n_scans × n_voxels` matrix of already extracted series.
    pub fn fit_series(
        &self,
        design: &DesignMatrix,
        mut series: DMatrix<f64>,
    ) -> Result<FittedModel, ModelError> {
        check_scans(design, series.nrows())?;
        if self.signal_scaling {
            scale_to_percent_signal(&mut series);
        }
        let n_voxels = series.ncols();
        let groups = match self.noise_model {
            NoiseModel::Ols => vec![fit_group(design.matrix(), series, 0, (0..n_voxels).collect())?],
            NoiseModel::Ar1 => {
                let ols = LeastSquaresFit::fit(design.matrix(), &series)?;
                let mut bins = BTreeMap::<i64, Vec<usize>>::new();
                for (voxel, residual) in ols.residuals.column_iter().enumerate() {
                    bins.entry(ar1_bin(residual)).or_default().push(voxel);
                }
                debug!(n_voxels, n_groups = bins.len(), "grouped voxels by AR(1) coefficient");
                bins.into_par_iter()
                    .map(|(bin, voxels)| {
                        let y = series.select_columns(&voxels);
                        fit_group(design.matrix(), y, bin, voxels)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(FittedModel {
            names: design.names().to_vec(),
            n_voxels,
            groups,
        })
    }
}

fn check_scans(design: &DesignMatrix, n_scans: usize) -> Result<(), ModelError> {
    if design.n_scans() == n_scans {
        Ok(())
    } else {
        Err(ModelError::ScanMismatch {
            design_rows: design.n_scans(),
            n_scans,
        })
    }
}

/// `100 · (y / mean - 1)` per voxel; a zero mean is replaced by one.
pub fn scale_to_percent_signal(series: &mut DMatrix<f64>) {
    let mut n_zero_mean = 0;
    for mut column in series.column_iter_mut() {
        let mean = column.mean();
        let scale = if mean == 0.0 {
            n_zero_mean += 1;
            1.0
        } else {
            mean
        };
        column.apply(|v| *v = 100.0 * (*v / scale - 1.0));
    }
    if n_zero_mean > 0 {
        warn!(n_voxels = n_zero_mean, "voxels with zero mean signal");
    }
}

/// Lag-1 autocorrelation `Σ r_t r_{t-1} / Σ r_t²` truncated to a bin.
#[expect(clippy::cast_possible_truncation)]
fn ar1_bin(residual: DVectorView<'_, f64>) -> i64 {
    let denominator = residual.norm_squared();
    if denominator == 0.0 {
        return 0;
    }
    let numerator = residual
        .iter()
        .zip(residual.iter().skip(1))
        .map(|(previous, current)| previous * current)
        .sum::<f64>();
    let rho = numerator / denominator;
    if rho.is_finite() {
        (rho * AR1_BINS).trunc() as i64
    } else {
        0
    }
}

/// `x_t - ρ x_{t-1}` for every row but the first.
#[must_use]
pub fn whiten(matrix: &DMatrix<f64>, rho: f64) -> DMatrix<f64> {
    let n = matrix.nrows();
    let mut whitened = matrix.clone();
    if n > 1 {
        let lagged = matrix.rows(0, n - 1) * rho;
        let mut tail = whitened.rows_mut(1, n - 1);
        tail -= lagged;
    }
    whitened
}

#[expect(clippy::cast_precision_loss)]
fn fit_group(
    design: &DMatrix<f64>,
    series: DMatrix<f64>,
    bin: i64,
    voxels: Vec<usize>,
) -> Result<GroupFit, LeastSquaresError> {
    let rho = bin as f64 / AR1_BINS;
    let fit = if bin == 0 {
        LeastSquaresFit::fit(design, &series)?
    } else {
        LeastSquaresFit::fit(&whiten(design, rho), &whiten(&series, rho))?
    };
    let dof = fit.residual_dof();
    let dispersion = fit
        .residual_sum_of_squares()
        .into_iter()
        .map(|rss| if dof > 0 { rss / dof as f64 } else { f64::NAN })
        .collect();
    Ok(GroupFit {
        rho,
        voxels,
        coefficients: fit.coefficients,
        normalized_covariance: fit.normalized_covariance,
        dispersion,
        dof,
    })
}

/// Voxels fitted together under one noise model.
#[derive(Debug, Clone)]
pub struct GroupFit {
    pub rho: f64,
    /// Column indices into the fitted series.
    pub voxels: Vec<usize>,
    /// `p × voxels` coefficients.
    pub coefficients: DMatrix<f64>,
    pub normalized_covariance: DMatrix<f64>,
    /// Residual variance `RSS / dof` of each voxel.
    pub dispersion: Vec<f64>,
    pub dof: usize,
}

#[derive(Debug, Clone)]
pub struct FittedModel {
    pub(crate) names: Vec<String>,
    pub(crate) n_voxels: usize,
    pub(crate) groups: Vec<GroupFit>,
}

impl FittedModel {
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn n_voxels(&self) -> usize {
        self.n_voxels
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupFit] {
        &self.groups
    }

    /// Fitted coefficient of one design column, per voxel.
    #[must_use]
    pub fn coefficients(&self, column: &str) -> Option<Vec<f64>> {
        let row = self.names.iter().position(|name| name == column)?;
        let mut values = vec![0.0; self.n_voxels];
        for group in &self.groups {
            for (i, voxel) in group.voxels.iter().enumerate() {
                values[*voxel] = group.coefficients[(row, i)];
            }
        }
        Some(values)
    }
}
