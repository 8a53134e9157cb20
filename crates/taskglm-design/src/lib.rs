//! From augmented event logs to a named design matrix.
//!
//! # Modules
//!
//! - [`hrf`]: SPM canonical HRF and its time derivative
//! - [`regressor`]: [`RegressorSpec`](regressor::RegressorSpec) and the
//!   [`RegressorBuilder`](regressor::RegressorBuilder) that convolves
//!   selected events and samples them at scan times
//! - [`confounds`]: motion and drift columns picked from the confound table
//! - [`design_matrix`]: regressors, confounds and intercept in one matrix
//! - [`simplified_events`]: onset-joined summary of the regressor inputs
//! - [`contrast`]: contrast formulas parsed into coefficient vectors
//!
//! # Example
//!
//! ```
//! use taskglm_design::{
//!     confounds::ConfoundFrame,
//!     contrast::ContrastFormula,
//!     design_matrix::DesignMatrix,
//!     regressor::{RegressorBuilder, RegressorSpec},
//! };
//! use taskglm_events::{filter::Filter, table::EventTable};
//!
//! let tsv = "\
//! onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\tresponse_time
//! 6.0\t1.0\ttest_trial\tgo\t37\t37\t0.48
//! 18.0\t1.0\ttest_trial\tstop_success\t-1\t37\tn/a
//! ";
//! let events = EventTable::from_tsv_reader(tsv.as_bytes()).unwrap();
//! let specs = ["go", "stop_success"].map(|label| {
//!     RegressorSpec::new(label, "duration", "duration", Filter::eq("trial_type", label))
//! });
//!
//! let builder = RegressorBuilder::new(30, 1.49, 50).unwrap();
//! let regressors = builder
//!     .build_all(&events, &specs)
//!     .unwrap()
//!     .into_iter()
//!     .map(|(regressor, _)| regressor)
//!     .collect::<Vec<_>>();
//! let confounds = ConfoundFrame::from_tsv_reader("global_signal\n".as_bytes(), Default::default())
//!     .unwrap();
//! let design = DesignMatrix::assemble(&regressors, &confounds, 30).unwrap();
//! assert_eq!(design.names(), ["go", "stop_success", "constant"]);
//!
//! let c = ContrastFormula::parse("stop_success-go")
//!     .unwrap()
//!     .coefficients(design.names())
//!     .unwrap();
//! assert_eq!(c.as_slice(), [-1.0, 1.0, 0.0]);
//! ```

pub mod confounds;
pub mod contrast;
pub mod design_matrix;
pub mod hrf;
pub mod regressor;
pub mod simplified_events;
