//! Event-to-regressor convolution.
//!
//! A [`RegressorSpec`] picks event rows with a [`Filter`] and reads their
//! onset, duration and amplitude. [`RegressorBuilder::build`] turns those
//! rows into a high-resolution boxcar, convolves it with the canonical HRF
//! (and optionally its time derivative) and samples the result at the scan
//! acquisition times.

use arrayvec::ArrayVec;
use rayon::prelude::*;
use serde::Serialize;
use taskglm_events::{
    filter::{Filter, FilterError},
    table::{Column, EventTable},
};
use tracing::{debug, warn};

use crate::hrf::{CanonicalHrf, linspace};

/// Suffix of the time-derivative column of a regressor.
pub const DERIVATIVE_SUFFIX: &str = "_derivative";

/// Seconds of high-resolution signal sampled before the first scan.
const MIN_ONSET: f64 = -24.0;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RegressorError {
    #[display("regressor '{regressor}': event column '{column}' is missing")]
    MissingColumn { regressor: String, column: String },
    #[display("regressor '{regressor}': event column '{column}' is not numeric")]
    NotNumeric { regressor: String, column: String },
    #[display("regressor '{regressor}': {source}")]
    Filter {
        regressor: String,
        source: FilterError,
    },
    #[display("regressor '{regressor}': row {row} has a non-finite '{column}'")]
    NonFiniteEvent {
        regressor: String,
        row: usize,
        column: String,
    },
    #[display("at least two scans are required, got {n_scans}")]
    TooFewScans { n_scans: usize },
    #[display("repetition time must be positive, got {tr}")]
    InvalidRepetitionTime { tr: f64 },
}

/// How one named regressor is derived from an event table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressorSpec {
    pub name: String,
    pub amplitude_column: String,
    pub duration_column: String,
    pub filter: Filter,
    pub add_derivative: bool,
    pub demean_amplitude: bool,
}

impl RegressorSpec {
    #[must_use]
    pub fn new<N, A, D>(name: N, amplitude_column: A, duration_column: D, filter: Filter) -> Self
    where
        N: Into<String>,
        A: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            amplitude_column: amplitude_column.into(),
            duration_column: duration_column.into(),
            filter,
            add_derivative: false,
            demean_amplitude: false,
        }
    }

    #[must_use]
    pub fn with_derivative(mut self) -> Self {
        self.add_derivative = true;
        self
    }

    #[must_use]
    pub fn demeaned(mut self) -> Self {
        self.demean_amplitude = true;
        self
    }

    /// Names of the design columns this regressor produces.
    #[must_use]
    pub fn column_names(&self) -> ArrayVec<String, 2> {
        let mut names = ArrayVec::new();
        names.push(self.name.clone());
        if self.add_derivative {
            names.push(format!("{}{DERIVATIVE_SUFFIX}", self.name));
        }
        names
    }

    /// Every event column the regressor reads.
    #[must_use]
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns = vec![self.amplitude_column.as_str(), self.duration_column.as_str()];
        columns.extend(self.filter.referenced_columns());
        columns.sort_unstable();
        columns.dedup();
        columns
    }
}

/// The `(onset, duration, modulation)` rows a regressor was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThreeColumnEvents {
    pub onset: Vec<f64>,
    pub duration: Vec<f64>,
    pub modulation: Vec<f64>,
}

impl ThreeColumnEvents {
    #[must_use]
    pub fn len(&self) -> usize {
        self.onset.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.onset.is_empty()
    }

    /// Subtracts the mean modulation. No-op on an empty frame.
    pub fn demean(&mut self) {
        if self.is_empty() {
            return;
        }
        #[expect(clippy::cast_precision_loss)]
        let mean = self.modulation.iter().sum::<f64>() / self.len() as f64;
        for value in &mut self.modulation {
            *value -= mean;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressorColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Convolved regressor sampled at scan times: the main column, then the
/// derivative column when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Regressor {
    pub name: String,
    pub columns: ArrayVec<RegressorColumn, 2>,
}

/// Acquisition time of each scan: the middle of its repetition.
#[must_use]
pub fn frame_times(n_scans: usize, tr: f64) -> Vec<f64> {
    (0..n_scans)
        .map(|i| {
            #[expect(clippy::cast_precision_loss)]
            let i = i as f64;
            i * tr + tr / 2.0
        })
        .collect()
}

/// Builds regressors for one session.
///
/// Frame times, the high-resolution grid and the HRF kernels depend only on
/// the acquisition, so they are computed once and shared by every
/// regressor of the session.
#[derive(Debug, Clone)]
pub struct RegressorBuilder {
    frame_times: Vec<f64>,
    hr_times: Vec<f64>,
    kernel: Vec<f64>,
    derivative: Vec<f64>,
}

impl RegressorBuilder {
    pub fn new(n_scans: usize, tr: f64, oversampling: usize) -> Result<Self, RegressorError> {
        if n_scans < 2 {
            return Err(RegressorError::TooFewScans { n_scans });
        }
        if !(tr.is_finite() && tr > 0.0) {
            return Err(RegressorError::InvalidRepetitionTime { tr });
        }
        let frame_times = frame_times(n_scans, tr);
        let first = frame_times[0];
        let last = frame_times[n_scans - 1];
        #[expect(clippy::cast_precision_loss)]
        let (intervals, oversampling_f) = ((n_scans - 1) as f64, oversampling as f64);

        let stop = last * (1.0 + 1.0 / intervals);
        let n_hr = intervals / (last - first) * (stop - first - MIN_ONSET) * oversampling_f + 1.0;
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hr_times = linspace(first + MIN_ONSET, stop, n_hr.round_ties_even() as usize);

        let hrf = CanonicalHrf::new(last / intervals, oversampling);
        Ok(Self {
            frame_times,
            hr_times,
            kernel: hrf.kernel(),
            derivative: hrf.time_derivative(),
        })
    }

    #[must_use]
    pub fn n_scans(&self) -> usize {
        self.frame_times.len()
    }

    #[must_use]
    pub fn frame_times(&self) -> &[f64] {
        &self.frame_times
    }

    pub fn build(
        &self,
        events: &EventTable,
        spec: &RegressorSpec,
    ) -> Result<(Regressor, ThreeColumnEvents), RegressorError> {
        let three_column = select_events(events, spec)?;
        if three_column.is_empty() {
            warn!(regressor = %spec.name, "no events selected, regressor is all zeros");
        }
        if three_column.onset.iter().any(|&t| t < self.hr_times[0]) {
            warn!(
                regressor = %spec.name,
                "events start before the sampled window and are clipped"
            );
        }

        let boxcar = self.sample_boxcar(&three_column);
        let mut columns = ArrayVec::<RegressorColumn, 2>::new();
        columns.push(RegressorColumn {
            name: spec.name.clone(),
            values: self.resample(&convolve_truncated(&boxcar, &self.kernel)),
        });
        if spec.add_derivative {
            let mut values = self.resample(&convolve_truncated(&boxcar, &self.derivative));
            orthogonalize(&mut values, &columns[0].values);
            columns.push(RegressorColumn {
                name: format!("{}{DERIVATIVE_SUFFIX}", spec.name),
                values,
            });
        }
        debug!(
            regressor = %spec.name,
            n_events = three_column.len(),
            n_columns = columns.len(),
            "built regressor"
        );
        Ok((
            Regressor {
                name: spec.name.clone(),
                columns,
            },
            three_column,
        ))
    }

    /// Builds every regressor of a session in parallel, in `specs` order.
    pub fn build_all(
        &self,
        events: &EventTable,
        specs: &[RegressorSpec],
    ) -> Result<Vec<(Regressor, ThreeColumnEvents)>, RegressorError> {
        specs
            .par_iter()
            .map(|spec| self.build(events, spec))
            .collect()
    }

    fn sample_boxcar(&self, events: &ThreeColumnEvents) -> Vec<f64> {
        let n = self.hr_times.len();
        let index_of = |t: f64| self.hr_times.partition_point(|&x| x < t).min(n - 1);
        let mut boxcar = vec![0.0; n];
        for ((&onset, &duration), &value) in events
            .onset
            .iter()
            .zip(&events.duration)
            .zip(&events.modulation)
        {
            let start = index_of(onset);
            let mut end = index_of(onset + duration);
            if end == start && end < n - 1 {
                end += 1;
            }
            boxcar[start] += value;
            boxcar[end] -= value;
        }
        let mut level = 0.0;
        for sample in &mut boxcar {
            level += *sample;
            *sample = level;
        }
        boxcar
    }

    fn resample(&self, signal: &[f64]) -> Vec<f64> {
        let xs = &self.hr_times;
        self.frame_times
            .iter()
            .map(|&x| {
                let hi = xs.partition_point(|&t| t < x).clamp(1, xs.len() - 1);
                let lo = hi - 1;
                let slope = (signal[hi] - signal[lo]) / (xs[hi] - xs[lo]);
                signal[lo] + slope * (x - xs[lo])
            })
            .collect()
    }
}

fn numeric_column<'a>(
    events: &'a EventTable,
    spec: &RegressorSpec,
    column: &str,
) -> Result<&'a [f64], RegressorError> {
    match events.column(column) {
        Some(Column::Numeric(values)) => Ok(values),
        Some(Column::Text(_)) => Err(RegressorError::NotNumeric {
            regressor: spec.name.clone(),
            column: column.to_owned(),
        }),
        None => Err(RegressorError::MissingColumn {
            regressor: spec.name.clone(),
            column: column.to_owned(),
        }),
    }
}

fn select_events(
    events: &EventTable,
    spec: &RegressorSpec,
) -> Result<ThreeColumnEvents, RegressorError> {
    let amplitude = numeric_column(events, spec, &spec.amplitude_column)?;
    let duration = numeric_column(events, spec, &spec.duration_column)?;
    let onset = numeric_column(events, spec, "onset")?;
    let mask = spec
        .filter
        .evaluate(events)
        .map_err(|source| RegressorError::Filter {
            regressor: spec.name.clone(),
            source,
        })?;

    let mut selected = ThreeColumnEvents::default();
    for (row, _) in mask.iter().enumerate().filter(|(_, keep)| **keep) {
        for (column, value) in [
            ("onset", onset[row]),
            (spec.duration_column.as_str(), duration[row]),
            (spec.amplitude_column.as_str(), amplitude[row]),
        ] {
            if !value.is_finite() {
                return Err(RegressorError::NonFiniteEvent {
                    regressor: spec.name.clone(),
                    row,
                    column: column.to_owned(),
                });
            }
        }
        selected.onset.push(onset[row]);
        selected.duration.push(duration[row]);
        selected.modulation.push(amplitude[row]);
    }
    if spec.demean_amplitude {
        selected.demean();
    }
    Ok(selected)
}

/// Full discrete convolution truncated to the length of `signal`.
fn convolve_truncated(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let mut out = vec![0.0; n];
    for (i, &s) in signal.iter().enumerate() {
        if s == 0.0 {
            continue;
        }
        for (o, &k) in out[i..].iter_mut().zip(kernel) {
            *o += s * k;
        }
    }
    out
}

/// Removes from `column` its projection onto `basis`.
fn orthogonalize(column: &mut [f64], basis: &[f64]) {
    let norm_squared = basis.iter().map(|b| b * b).sum::<f64>();
    if norm_squared == 0.0 {
        return;
    }
    let projection = column.iter().zip(basis).map(|(c, b)| c * b).sum::<f64>() / norm_squared;
    for (c, b) in column.iter_mut().zip(basis) {
        *c -= projection * b;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const TSV: &str = "\
onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\tresponse_time\tweight
10.0\t1.0\ttest_trial\tgo\t37\t37\t0.45\t2.0
40.0\t1.0\ttest_trial\tstop\t-1\t37\tn/a\t4.0
70.0\t0.0\ttest_trial\tgo\t37\t37\t0.61\t6.0
100.0\t1.0\ttest_trial\tgo\t37\t37\tn/a\tn/a
";

    fn events() -> EventTable {
        EventTable::from_tsv_reader(TSV.as_bytes()).unwrap()
    }

    fn builder() -> RegressorBuilder {
        RegressorBuilder::new(100, 1.49, 50).unwrap()
    }

    #[test]
    fn test_frame_times_are_mid_repetition() {
        assert_eq!(
            frame_times(5, 1.49),
            [0.745, 2.235, 3.725, 5.215, 6.705]
        );
    }

    #[test]
    fn test_empty_subset_gives_zero_regressor() {
        let spec = RegressorSpec::new("none", "duration", "duration", Filter::eq("trial_type", "missing"));
        let (regressor, three_column) = builder().build(&events(), &spec).unwrap();
        assert!(three_column.is_empty());
        assert_eq!(regressor.columns.len(), 1);
        assert_eq!(regressor.columns[0].values, vec![0.0; 100]);

        let (regressor, _) = builder().build(&events(), &spec.with_derivative()).unwrap();
        assert_eq!(regressor.columns.len(), 2);
        assert_eq!(regressor.columns[1].name, "none_derivative");
        assert!(regressor.columns.iter().all(|c| c.values == vec![0.0; 100]));
    }

    #[test]
    fn test_response_peaks_after_onset() {
        let spec = RegressorSpec::new("stop", "duration", "duration", Filter::eq("trial_type", "stop"));
        let (regressor, three_column) = builder().build(&events(), &spec).unwrap();
        assert_eq!(three_column.onset, [40.0]);

        let values = &regressor.columns[0].values;
        let times = builder().frame_times().to_vec();
        let (peak, _) = values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert!((44.0..48.0).contains(&times[peak]), "{}", times[peak]);
        assert!(values[..25].iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_zero_duration_event_still_responds() {
        let spec = RegressorSpec::new("late", "constant", "duration", Filter::eq("onset", 70.0));
        let events = {
            let mut events = events();
            events
                .push_column("constant", Column::Numeric(vec![1.0; 4]))
                .unwrap();
            events
        };
        let (regressor, _) = builder().build(&events, &spec).unwrap();
        assert!(regressor.columns[0].values.iter().any(|v| *v > 0.0));
    }

    #[test]
    fn test_derivative_is_orthogonal_to_main_column() {
        let spec = RegressorSpec::new("go", "duration", "duration", Filter::eq("trial_type", "go"))
            .with_derivative();
        let (regressor, _) = builder().build(&events(), &spec).unwrap();
        let [main, derivative] = [&regressor.columns[0].values, &regressor.columns[1].values];
        let dot = main.iter().zip(derivative).map(|(a, b)| a * b).sum::<f64>();
        assert_abs_diff_eq!(dot, 0.0, epsilon = 1e-10);
        assert!(derivative.iter().any(|v| v.abs() > 1e-6));
    }

    #[test]
    fn test_demean_is_idempotent() {
        let spec = RegressorSpec::new("weighted", "weight", "duration", Filter::lt("onset", 80.0))
            .demeaned();
        let (_, mut three_column) = builder().build(&events(), &spec).unwrap();
        assert_eq!(three_column.modulation, [-2.0, 0.0, 2.0]);
        three_column.demean();
        assert_eq!(three_column.modulation, [-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_same_amplitude_and_duration_column() {
        let spec = RegressorSpec::new("weighted", "weight", "weight", Filter::lt("onset", 50.0));
        let (_, three_column) = builder().build(&events(), &spec).unwrap();
        assert_eq!(three_column.duration, [2.0, 4.0]);
        assert_eq!(three_column.modulation, [2.0, 4.0]);
    }

    #[test]
    fn test_missing_and_non_finite_columns_fail() {
        let spec = RegressorSpec::new("x", "absent", "duration", Filter::All);
        assert!(matches!(
            builder().build(&events(), &spec),
            Err(RegressorError::MissingColumn { ref column, .. }) if column == "absent"
        ));

        let spec = RegressorSpec::new("x", "trial_type", "duration", Filter::All);
        assert!(matches!(
            builder().build(&events(), &spec),
            Err(RegressorError::NotNumeric { .. })
        ));

        let spec = RegressorSpec::new("x", "weight", "duration", Filter::All);
        assert!(matches!(
            builder().build(&events(), &spec),
            Err(RegressorError::NonFiniteEvent { row: 3, .. })
        ));
    }

    #[test]
    fn test_build_all_preserves_order() {
        let specs = ["go", "stop"].map(|label| {
            RegressorSpec::new(label, "duration", "duration", Filter::eq("trial_type", label))
        });
        let built = builder().build_all(&events(), &specs).unwrap();
        let names = built.iter().map(|(r, _)| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["go", "stop"]);
    }

    #[test]
    fn test_too_few_scans_is_rejected() {
        assert!(matches!(
            RegressorBuilder::new(1, 2.0, 50),
            Err(RegressorError::TooFewScans { n_scans: 1 })
        ));
        assert!(matches!(
            RegressorBuilder::new(10, 0.0, 50),
            Err(RegressorError::InvalidRepetitionTime { .. })
        ));
    }
}
