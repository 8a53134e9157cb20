//! First-level GLM estimation over BOLD volumes.
//!
//! - [`volume`]: BOLD series, brain masks and the in-mask voxel layout
//! - [`smoothing`]: isotropic Gaussian smoothing of every frame
//! - [`glm`]: [`FirstLevelModel`](glm::FirstLevelModel), fitted under an
//!   OLS or AR(1) noise model
//! - [`contrast`]: effect size, variance and z score of a contrast
//! - [`fixed_effects`]: inverse-variance combination across sessions
//! - [`collinearity`]: contrast variance inflation factors
//!
//! # Example
//!
//! ```
//! use nalgebra::DMatrix;
//! use taskglm_design::{contrast::ContrastFormula, design_matrix::DesignMatrix};
//! use taskglm_model::glm::{FirstLevelModel, NoiseModel};
//!
//! let n = 8;
//! let task = (0..n).map(|t| if t % 2 == 0 { 1.0 } else { 0.0 }).collect::<Vec<_>>();
//! let series = DMatrix::from_fn(n, 1, |t, _| 100.0 + 3.0 * task[t] + 0.01 * (t as f64).sin());
//! let design = DesignMatrix::from_columns(
//!     [("task".to_owned(), task.clone()), ("constant".to_owned(), vec![1.0; n])],
//!     n,
//! )
//! .unwrap();
//!
//! let model = FirstLevelModel {
//!     smoothing_fwhm: None,
//!     signal_scaling: false,
//!     noise_model: NoiseModel::Ols,
//! };
//! let fitted = model.fit_series(&design, series).unwrap();
//! let estimate = fitted.evaluate(&ContrastFormula::parse("task").unwrap()).unwrap();
//! assert!((estimate.effect_size[0] - 3.0).abs() < 0.05);
//! ```

pub mod collinearity;
pub mod contrast;
pub mod fixed_effects;
pub mod glm;
pub mod smoothing;
pub mod volume;
