//! Contrast estimates from a fitted model.

use nalgebra::DVector;
use ndarray::Array3;
use taskglm_design::contrast::ContrastFormula;
use taskglm_stats::distributions::t_to_z;

use crate::{
    glm::{FittedModel, ModelError},
    volume::{Mask, Shape},
};

/// Variance floor used when forming the t statistic.
const TINY: f64 = 1.0e-50;

/// Per-voxel effect size, variance and z score of one contrast, in the
/// voxel order of the fitted series.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastEstimate {
    pub effect_size: Vec<f64>,
    pub variance: Vec<f64>,
    pub z_score: Vec<f64>,
}

impl ContrastEstimate {
    #[must_use]
    pub fn to_maps(&self, mask: &Mask) -> StatMaps {
        StatMaps {
            effect_size: mask.scatter(&self.effect_size),
            variance: mask.scatter(&self.variance),
            z_score: mask.scatter(&self.z_score),
        }
    }
}

/// Effect size, variance and z score volumes.
#[derive(Debug, Clone, PartialEq)]
pub struct StatMaps {
    pub effect_size: Array3<f64>,
    pub variance: Array3<f64>,
    pub z_score: Array3<f64>,
}

impl StatMaps {
    #[must_use]
    pub fn zeros(shape: Shape) -> Self {
        Self {
            effect_size: Array3::zeros(shape),
            variance: Array3::zeros(shape),
            z_score: Array3::zeros(shape),
        }
    }
}

impl FittedModel {
    /// Evaluates `c'β`, `σ² c'(X'X)⁺c` and the matching z score.
    pub fn evaluate(&self, formula: &ContrastFormula) -> Result<ContrastEstimate, ModelError> {
        let c = formula.coefficients(&self.names)?;
        Ok(self.evaluate_vector(&c))
    }

    #[expect(clippy::cast_precision_loss)]
    fn evaluate_vector(&self, c: &DVector<f64>) -> ContrastEstimate {
        let mut estimate = ContrastEstimate {
            effect_size: vec![0.0; self.n_voxels],
            variance: vec![0.0; self.n_voxels],
            z_score: vec![0.0; self.n_voxels],
        };
        for group in &self.groups {
            let effects = group.coefficients.tr_mul(c);
            let scale = (&group.normalized_covariance * c).dot(c);
            for (i, voxel) in group.voxels.iter().enumerate() {
                let effect = effects[i];
                let variance = group.dispersion[i] * scale;
                let t = effect / variance.max(TINY).sqrt();
                estimate.effect_size[*voxel] = effect;
                estimate.variance[*voxel] = variance;
                estimate.z_score[*voxel] = t_to_z(t, group.dof as f64);
            }
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;
    use ndarray::Array3;
    use taskglm_design::design_matrix::DesignMatrix;

    use super::*;
    use crate::glm::{FirstLevelModel, NoiseModel};

    fn fitted() -> FittedModel {
        let n = 12;
        let a = (0..n).map(|t| if t % 3 == 0 { 1.0 } else { 0.0 }).collect::<Vec<_>>();
        let b = (0..n).map(|t| if t % 4 == 1 { 1.0 } else { 0.0 }).collect::<Vec<_>>();
        let noise = [0.1, -0.2, 0.05, 0.0, 0.15, -0.1, 0.2, -0.05, -0.15, 0.1, 0.0, 0.05];
        let series = DMatrix::from_fn(n, 2, |t, v| {
            let scale = v as f64 + 1.0;
            scale * (2.0 * a[t] + 0.5 * b[t]) + 1.0 + 0.5 * noise[t]
        });
        let design = DesignMatrix::from_columns(
            [
                ("a".to_owned(), a),
                ("b".to_owned(), b),
                ("constant".to_owned(), vec![1.0; n]),
            ],
            n,
        )
        .unwrap();
        let model = FirstLevelModel {
            smoothing_fwhm: None,
            signal_scaling: false,
            noise_model: NoiseModel::Ols,
        };
        model.fit_series(&design, series).unwrap()
    }

    #[test]
    fn test_difference_contrast() {
        let fitted = fitted();
        let estimate = fitted.evaluate(&ContrastFormula::parse("a-b").unwrap()).unwrap();
        assert_abs_diff_eq!(estimate.effect_size[0], 1.5, epsilon = 0.2);
        assert_abs_diff_eq!(estimate.effect_size[1], 3.0, epsilon = 0.2);
        for voxel in 0..2 {
            assert!(estimate.variance[voxel] > 0.0);
            assert!(estimate.z_score[voxel] > 3.0);
        }
    }

    #[test]
    fn test_scaled_contrast_scales_effect_and_variance() {
        let fitted = fitted();
        let single = fitted.evaluate(&ContrastFormula::parse("a").unwrap()).unwrap();
        let double = fitted.evaluate(&ContrastFormula::parse("2*a").unwrap()).unwrap();
        assert_abs_diff_eq!(double.effect_size[0], 2.0 * single.effect_size[0], epsilon = 1e-10);
        assert_abs_diff_eq!(double.variance[0], 4.0 * single.variance[0], epsilon = 1e-10);
        assert_abs_diff_eq!(double.z_score[0], single.z_score[0], epsilon = 1e-8);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let err = fitted()
            .evaluate(&ContrastFormula::parse("a-c").unwrap())
            .unwrap_err();
        assert!(matches!(err, ModelError::Contrast(ref unknown) if unknown.column == "c"));
    }

    #[test]
    fn test_maps_are_zero_outside_mask() {
        let estimate = ContrastEstimate {
            effect_size: vec![1.0, 2.0],
            variance: vec![0.5, 0.25],
            z_score: vec![3.0, 4.0],
        };
        let mut voxels = Array3::from_elem((2, 1, 2), false);
        voxels[[0, 0, 1]] = true;
        voxels[[1, 0, 0]] = true;
        let maps = estimate.to_maps(&Mask::from_voxels(voxels));
        assert_eq!(maps.effect_size[[0, 0, 1]], 1.0);
        assert_eq!(maps.z_score[[1, 0, 0]], 4.0);
        assert_eq!(maps.variance[[0, 0, 0]], 0.0);
        assert_eq!(maps.variance[[1, 0, 1]], 0.0);
    }
}
