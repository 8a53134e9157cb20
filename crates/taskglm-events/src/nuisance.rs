//! Nuisance trial classification.
//!
//! Scoreable trials are identified per task family; among them a trial is
//! an *omission* when no key was pressed, a *commission* when the wrong key
//! was pressed with a plausible response time, and *too fast* when the
//! response time is below [`RT_TOO_FAST_THRESHOLD`]. Commission requires
//! `response_time >= 0.2` and too-fast requires `response_time < 0.2`, so
//! the two flags never overlap.

use serde::Serialize;

use crate::{
    filter::{Filter, FilterError},
    table::EventTable,
};

/// Response times below this many seconds are treated as anticipatory.
pub const RT_TOO_FAST_THRESHOLD: f64 = 0.2;

/// `key_press` code recorded when no response was given.
pub const NO_RESPONSE: i32 = -1;

/// Classification rule shared by every task of a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TaskFamily {
    /// Scoreable rows have `trial_id == "test_trial"`.
    TestTrial,
    /// Scoreable rows have a `trial_type` in the listed go labels.
    GoTrials(Vec<String>),
}

impl TaskFamily {
    #[must_use]
    pub fn go_trials<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaskFamily::GoTrials(labels.into_iter().map(Into::into).collect())
    }

    /// Rows on which responses are scored.
    #[must_use]
    pub fn scoreable(&self) -> Filter {
        match self {
            TaskFamily::TestTrial => Filter::eq("trial_id", "test_trial"),
            TaskFamily::GoTrials(labels) if labels.len() == 1 => {
                Filter::eq("trial_type", labels[0].as_str())
            }
            TaskFamily::GoTrials(labels) => {
                Filter::is_in("trial_type", labels.iter().map(String::as_str))
            }
        }
    }

    #[must_use]
    pub fn omission(&self) -> Filter {
        Filter::eq("key_press", NO_RESPONSE).and(self.scoreable())
    }

    #[must_use]
    pub fn commission(&self) -> Filter {
        Filter::columns_eq("key_press", "correct_response")
            .not()
            .and(Filter::ne("key_press", NO_RESPONSE))
            .and(Filter::ge("response_time", RT_TOO_FAST_THRESHOLD))
            .and(self.scoreable())
    }

    #[must_use]
    pub fn rt_too_fast(&self) -> Filter {
        Filter::lt("response_time", RT_TOO_FAST_THRESHOLD).and(self.scoreable())
    }
}

/// Per-row nuisance flags of one event table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuisanceFlags {
    pub omission: Vec<bool>,
    pub commission: Vec<bool>,
    pub rt_too_fast: Vec<bool>,
}

impl NuisanceFlags {
    pub fn classify(events: &EventTable, family: &TaskFamily) -> Result<Self, FilterError> {
        Ok(Self {
            omission: family.omission().evaluate(events)?,
            commission: family.commission().evaluate(events)?,
            rt_too_fast: family.rt_too_fast().evaluate(events)?,
        })
    }

    /// Rows carrying any nuisance flag.
    #[must_use]
    pub fn junk(&self) -> Vec<bool> {
        self.omission
            .iter()
            .zip(&self.commission)
            .zip(&self.rt_too_fast)
            .map(|((o, c), f)| *o || *c || *f)
            .collect()
    }

    #[must_use]
    pub fn junk_count(&self) -> usize {
        self.junk().into_iter().filter(|b| *b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn text(values: &[&str]) -> Column {
        Column::Text(
            values
                .iter()
                .map(|v| (*v != "n/a").then(|| (*v).to_owned()))
                .collect(),
        )
    }

    fn events(trial_id: &[&str], trial_type: &[&str], key: &[f64], rt: &[f64]) -> EventTable {
        let n = trial_id.len();
        #[expect(clippy::cast_precision_loss)]
        let onsets = (0..n).map(|i| i as f64 * 3.0).collect();
        EventTable::from_columns([
            ("onset", Column::Numeric(onsets)),
            ("duration", Column::Numeric(vec![1.0; n])),
            ("trial_id", text(trial_id)),
            ("trial_type", text(trial_type)),
            ("key_press", Column::Numeric(key.to_vec())),
            ("correct_response", Column::Numeric(vec![37.0; n])),
            ("response_time", Column::Numeric(rt.to_vec())),
        ])
        .unwrap()
    }

    #[test]
    fn test_test_trial_family() {
        let events = events(
            &["test_trial", "test_trial", "test_trial", "test_trial", "practice"],
            &["a", "a", "b", "b", "a"],
            &[-1.0, 39.0, 39.0, 37.0, -1.0],
            &[f64::NAN, 0.6, 0.1, 0.5, f64::NAN],
        );
        let flags = NuisanceFlags::classify(&events, &TaskFamily::TestTrial).unwrap();
        assert_eq!(flags.omission, [true, false, false, false, false]);
        assert_eq!(flags.commission, [false, true, false, false, false]);
        assert_eq!(flags.rt_too_fast, [false, false, true, false, false]);
        assert_eq!(flags.junk_count(), 3);
    }

    #[test]
    fn test_go_family_ignores_stop_trials() {
        let events = events(
            &["test_trial"; 4],
            &["go", "stop_failure", "go", "n/a"],
            &[-1.0, 39.0, 39.0, -1.0],
            &[f64::NAN, 0.4, 0.4, f64::NAN],
        );
        let flags = NuisanceFlags::classify(&events, &TaskFamily::go_trials(["go"])).unwrap();
        assert_eq!(flags.omission, [true, false, false, false]);
        assert_eq!(flags.commission, [false, false, true, false]);
    }

    #[test]
    fn test_go_label_list_family() {
        let family = TaskFamily::go_trials(["go_pos", "go_neg", "go_con"]);
        let events = events(
            &["test_trial"; 4],
            &["go_pos", "go_con", "stop_success_neg", "go_neg"],
            &[-1.0, 37.0, -1.0, 37.0],
            &[f64::NAN, 0.15, f64::NAN, 0.5],
        );
        let flags = NuisanceFlags::classify(&events, &family).unwrap();
        assert_eq!(flags.omission, [true, false, false, false]);
        assert_eq!(flags.rt_too_fast, [false, true, false, false]);
        assert_eq!(flags.junk(), [true, true, false, false]);
    }

    #[test]
    fn test_commission_and_too_fast_are_exclusive() {
        let response_times = [0.0, 0.05, 0.1999, 0.2, 0.2001, 0.5, 1.5, f64::NAN];
        let keys = [39.0, 37.0, 39.0, 39.0, -1.0, 39.0, 37.0, 39.0];
        let events = events(&["test_trial"; 8], &["x"; 8], &keys, &response_times);
        let flags = NuisanceFlags::classify(&events, &TaskFamily::TestTrial).unwrap();
        for (commission, too_fast) in flags.commission.iter().zip(&flags.rt_too_fast) {
            assert!(!(*commission && *too_fast));
        }
        assert_eq!(
            flags.commission,
            [false, false, false, true, false, true, false, false]
        );
    }
}
