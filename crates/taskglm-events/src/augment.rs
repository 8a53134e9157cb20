//! Derived event columns.
//!
//! Every event table is augmented with the nuisance indicators, a constant
//! column and the subject-centered response time before any regressor is
//! built. The response-time centre is the mean, across the subject's
//! sessions of one task, of each session's mean response time over the
//! task's centering subset.

use taskglm_stats::descriptive::DescriptiveStats;
use tracing::debug;

use crate::{
    filter::Filter,
    nuisance::NuisanceFlags,
    table::{Column, EventTable, EventsError},
};

pub const JUNK_TRIALS: &str = "junk_trials";
pub const OMISSION: &str = "omission";
pub const COMMISSION: &str = "commission";
pub const RT_FAST: &str = "rt_fast";
pub const CONSTANT: &str = "constant_1_column";
pub const RESPONSE_TIME_CENTERED: &str = "response_time_centered";

/// Columns appended by [`augment`], in order.
pub const DERIVED_COLUMNS: [&str; 6] = [
    JUNK_TRIALS,
    OMISSION,
    COMMISSION,
    RT_FAST,
    CONSTANT,
    RESPONSE_TIME_CENTERED,
];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AugmentError {
    #[display("{_0}")]
    Events(EventsError),
    #[display("response-time centering subset: {_0}")]
    Filter(crate::filter::FilterError),
}

impl From<EventsError> for AugmentError {
    fn from(err: EventsError) -> Self {
        Self::Events(err)
    }
}

impl From<crate::filter::FilterError> for AugmentError {
    fn from(err: crate::filter::FilterError) -> Self {
        Self::Filter(err)
    }
}

/// Mean response time over the rows selected by `subset`.
///
/// Rows without a response time are ignored; `None` when nothing remains.
pub fn session_mean_rt(events: &EventTable, subset: &Filter) -> Result<Option<f64>, AugmentError> {
    let mask = subset.evaluate(events)?;
    let response_time = events.numeric("response_time")?;
    let Some(stats) = DescriptiveStats::new(
        response_time
            .iter()
            .zip(mask)
            .filter(|(rt, selected)| *selected && rt.is_finite())
            .map(|(rt, _)| *rt),
    ) else {
        return Ok(None);
    };
    debug!(
        n_trials = stats.count,
        mean = stats.mean,
        median = stats.median,
        std_dev = stats.std_dev,
        "response times of the centering subset"
    );
    Ok(Some(stats.mean))
}

/// Mean of per-session means; sessions without a mean are skipped.
#[must_use]
pub fn subject_mean_rt<I>(session_means: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    DescriptiveStats::new(session_means.into_iter().flatten()).map(|s| s.mean)
}

/// Appends [`DERIVED_COLUMNS`] to `events`.
pub fn augment(
    events: &mut EventTable,
    flags: &NuisanceFlags,
    mean_rt: f64,
) -> Result<(), EventsError> {
    let centered = events
        .numeric("response_time")?
        .iter()
        .map(|rt| rt - mean_rt)
        .collect();
    let n_rows = events.n_rows();

    events.push_column(JUNK_TRIALS, Column::indicator(&flags.junk()))?;
    events.push_column(OMISSION, Column::indicator(&flags.omission))?;
    events.push_column(COMMISSION, Column::indicator(&flags.commission))?;
    events.push_column(RT_FAST, Column::indicator(&flags.rt_too_fast))?;
    events.push_column(CONSTANT, Column::Numeric(vec![1.0; n_rows]))?;
    events.push_column(RESPONSE_TIME_CENTERED, Column::Numeric(centered))?;
    debug!(
        n_rows,
        junk = flags.junk_count(),
        mean_rt,
        "appended derived event columns"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::nuisance::TaskFamily;

    fn events(rt: &[f64], key: &[f64]) -> EventTable {
        let n = rt.len();
        EventTable::from_columns([
            ("onset", Column::Numeric((0..n).map(|i| f64::from(u32::try_from(i).unwrap())).collect())),
            ("duration", Column::Numeric(vec![1.0; n])),
            ("trial_id", Column::Text(vec![Some("test_trial".into()); n])),
            ("trial_type", Column::Text(vec![Some("go".into()); n])),
            ("key_press", Column::Numeric(key.to_vec())),
            ("correct_response", Column::Numeric(vec![37.0; n])),
            ("response_time", Column::Numeric(rt.to_vec())),
        ])
        .unwrap()
    }

    fn accurate() -> Filter {
        Filter::columns_eq("key_press", "correct_response")
            .and(Filter::eq("trial_id", "test_trial"))
            .and(Filter::ge("response_time", 0.2))
    }

    #[test]
    fn test_session_mean_uses_subset_only() {
        let events = events(&[0.4, 0.6, 0.1, 0.9, f64::NAN], &[37.0, 37.0, 37.0, 39.0, -1.0]);
        let mean = session_mean_rt(&events, &accurate()).unwrap().unwrap();
        assert_relative_eq!(mean, 0.5);
    }

    #[test]
    fn test_subject_mean_skips_empty_sessions() {
        assert_relative_eq!(subject_mean_rt([Some(0.4), None, Some(0.6)]).unwrap(), 0.5);
        assert!(subject_mean_rt([None, None]).is_none());
    }

    #[test]
    fn test_augment_appends_derived_columns() {
        let mut events = events(&[0.5, f64::NAN, 0.1], &[37.0, -1.0, 37.0]);
        let flags = NuisanceFlags::classify(&events, &TaskFamily::TestTrial).unwrap();
        augment(&mut events, &flags, 0.4).unwrap();

        for column in DERIVED_COLUMNS {
            assert!(events.has_column(column), "{column}");
        }
        assert_eq!(events.numeric(JUNK_TRIALS).unwrap(), [0.0, 1.0, 1.0]);
        assert_eq!(events.numeric(CONSTANT).unwrap(), [1.0; 3]);
        let centered = events.numeric(RESPONSE_TIME_CENTERED).unwrap();
        assert_relative_eq!(centered[0], 0.1, epsilon = 1e-12);
        assert!(centered[1].is_nan());
    }
}
