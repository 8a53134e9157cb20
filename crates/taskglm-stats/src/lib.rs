//! Numeric building blocks for the first-level GLM pipeline.
//!
//! This crate provides the scalar and small-matrix statistics that the
//! design, model and QC layers share:
//!
//! - **Descriptive statistics**: mean, median, variance and range of a sample
//! - **Distributions**: gamma density, Student-t tail probabilities and the
//!   normal quantile, used for HRF kernels and t-to-z conversion
//! - **Least squares**: SVD pseudo-inverse with numerical rank, the solver
//!   behind every regression in the workspace
//! - **Fixed effects**: precision-weighted combination of repeated estimates
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing samples
//! - [`distributions`]: Special functions and probability distributions
//! - [`least_squares`]: Pseudo-inverse based least-squares fitting
//! - [`fixed_effects`]: Inverse-variance weighted combination
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use taskglm_stats::descriptive::DescriptiveStats;
//!
//! let values = [0.42, 0.51, 0.47];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.median, 0.47);
//! ```
//!
//! ## Converting a t statistic to a z score
//!
//! ```
//! use taskglm_stats::distributions::t_to_z;
//!
//! // With many degrees of freedom the t distribution approaches the normal.
//! let z = t_to_z(1.96, 1.0e6);
//! assert!((z - 1.96).abs() < 1e-3);
//! ```
//!
//! ## Combining two session estimates
//!
//! ```
//! use taskglm_stats::fixed_effects::PrecisionWeighted;
//!
//! let combined = PrecisionWeighted::combine(&[1.5, 1.5], &[0.5, 0.5]).unwrap();
//! assert_eq!(combined.effect, 1.5);
//! assert_eq!(combined.variance, 0.25);
//! ```

pub mod descriptive;
pub mod distributions;
pub mod fixed_effects;
pub mod least_squares;
