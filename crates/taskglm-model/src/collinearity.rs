//! Variance inflation factors of contrasts.
//!
//! The VIF of a contrast `c` measures how well the effective regressor
//! `X c` is explained by the part of the design orthogonal to it. Design
//! columns are centered and scaled to unit norm (constant columns are
//! dropped), `c` is normalized and a Householder reflection maps it onto
//! the first axis. The rotated first regressor is then regressed on the
//! remaining rotated regressors and `VIF = 1 / (1 - R²)`.

use std::{fs::File, io, path::Path};

use nalgebra::{DMatrix, DVector};
use taskglm_design::{contrast::Contrast, design_matrix::DesignMatrix};
use taskglm_stats::least_squares::{LeastSquaresError, PseudoInverse};
use tracing::{debug, warn};

use crate::glm::ModelError;

/// Residual share of the total below which the fit counts as perfect.
const PERFECT_FIT_TOLERANCE: f64 = 1.0e-10;

/// Why a VIF is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Degenerate {
    #[display("contrast has no weight on any non-constant column")]
    EmptyContrast,
    #[display("effective regressor is identically zero")]
    ZeroRegressor,
    #[display("effective regressor is a linear combination of the others")]
    PerfectFit,
}

/// VIF of the contrast `coefficients` over `design`.
pub fn contrast_vif(
    design: &DMatrix<f64>,
    coefficients: &DVector<f64>,
) -> Result<Result<f64, Degenerate>, LeastSquaresError> {
    let kept = (0..design.ncols())
        .filter(|&j| {
            let column = design.column(j);
            column.max() - column.min() > 0.0
        })
        .collect::<Vec<_>>();

    let c = DVector::from_iterator(kept.len(), kept.iter().map(|&j| coefficients[j]));
    let c_norm = c.norm();
    if c_norm == 0.0 {
        return Ok(Err(Degenerate::EmptyContrast));
    }
    let v = c / c_norm;

    let mut x = design.select_columns(&kept);
    for mut column in x.column_iter_mut() {
        let mean = column.mean();
        column.add_scalar_mut(-mean);
        let norm = column.norm();
        column /= norm;
    }

    let m = kept.len();
    let rotation = householder_to_first_axis(&v);
    let target = &x * &v;
    let tss = target.norm_squared();
    if tss <= PERFECT_FIT_TOLERANCE {
        return Ok(Err(Degenerate::ZeroRegressor));
    }
    if m == 1 {
        return Ok(Ok(1.0));
    }
    let others = &x * rotation.columns(1, m - 1);
    let pinv = PseudoInverse::new(&others)?;
    let residual = &target - &others * (&pinv.matrix * &target);
    let rss = residual.norm_squared();
    if rss <= PERFECT_FIT_TOLERANCE * tss {
        return Ok(Err(Degenerate::PerfectFit));
    }
    Ok(Ok(tss / rss))
}

/// Orthogonal symmetric `H` with `H v = e₁` for a unit vector `v`.
fn householder_to_first_axis(v: &DVector<f64>) -> DMatrix<f64> {
    let m = v.len();
    let mut u = v.clone();
    u[0] -= 1.0;
    let uu = u.norm_squared();
    let mut h = DMatrix::identity(m, m);
    if uu > f64::EPSILON * f64::EPSILON {
        h -= (&u * u.transpose()) * (2.0 / uu);
    }
    h
}

/// VIF of every contrast of one session; undefined values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct VifReport {
    entries: Vec<(String, f64)>,
}

impl VifReport {
    pub fn compute(design: &DesignMatrix, contrasts: &[Contrast]) -> Result<Self, ModelError> {
        let mut entries = Vec::with_capacity(contrasts.len());
        for contrast in contrasts {
            let coefficients = contrast.formula.coefficients(design.names())?;
            let vif = match contrast_vif(design.matrix(), &coefficients)? {
                Ok(vif) => vif,
                Err(reason) => {
                    warn!(contrast = %contrast.name, %reason, "VIF is undefined");
                    f64::NAN
                }
            };
            debug!(contrast = %contrast.name, vif, "contrast VIF");
            entries.push((contrast.name.clone(), vif));
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, contrast: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == contrast)
            .map(|(_, vif)| *vif)
    }

    /// Writes `contrast,VIF` rows; an undefined VIF is an empty cell.
    pub fn write_csv<W>(&self, writer: W) -> Result<(), csv::Error>
    where
        W: io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["contrast", "VIF"])?;
        for (name, vif) in &self.entries {
            let value = if vif.is_nan() {
                String::new()
            } else {
                vif.to_string()
            };
            writer.write_record([name.as_str(), value.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv<P>(&self, path: P) -> Result<(), csv::Error>
    where
        P: AsRef<Path>,
    {
        self.write_csv(File::create(path.as_ref())?)
    }
}
