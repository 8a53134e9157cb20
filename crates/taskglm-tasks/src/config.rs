//! Per-task model configuration.

use serde::Serialize;
use taskglm_design::{confounds::ConfoundPolicy, contrast::Contrast, regressor::RegressorSpec};
use taskglm_events::{
    augment::{COMMISSION, CONSTANT, OMISSION, RESPONSE_TIME_CENTERED, RT_FAST},
    filter::Filter,
    nuisance::{RT_TOO_FAST_THRESHOLD, TaskFamily},
};

/// Name of the optional regressor covering feedback breaks.
pub const BREAK_PERIOD: &str = "break_period";

/// Contrast over the mean of every condition regressor.
pub const TASK_BASELINE: &str = "task-baseline";

/// Correct response given at a plausible latency.
#[must_use]
pub fn accurate() -> Filter {
    Filter::columns_eq("key_press", "correct_response")
        .and(Filter::ge("response_time", RT_TOO_FAST_THRESHOLD))
}

#[must_use]
pub fn trial_type(label: &str) -> Filter {
    Filter::eq("trial_type", label)
}

#[must_use]
pub fn test_trial() -> Filter {
    Filter::eq("trial_id", "test_trial")
}

/// One-second unit-amplitude regressor over the selected rows.
#[must_use]
pub fn condition(name: &str, filter: Filter) -> RegressorSpec {
    RegressorSpec::new(name, CONSTANT, CONSTANT, filter)
}

/// Parametric response-time regressor over the centered response times.
#[must_use]
pub fn response_time(filter: Filter) -> RegressorSpec {
    RegressorSpec::new("response_time", RESPONSE_TIME_CENTERED, CONSTANT, filter)
}

/// Feedback breaks, modelled over their full duration.
#[must_use]
pub fn break_period() -> RegressorSpec {
    RegressorSpec::new(
        BREAK_PERIOD,
        CONSTANT,
        "duration",
        Filter::eq("trial_id", "break_with_performance_feedback"),
    )
}

/// Subset used for the subject-level response-time mean of most tasks.
#[must_use]
pub fn default_rt_centering() -> Filter {
    Filter::columns_eq("key_press", "correct_response")
        .and(test_trial())
        .and(Filter::ge("response_time", RT_TOO_FAST_THRESHOLD))
}

/// Subset used by stop-signal tasks: accurate go trials and stop failures.
#[must_use]
pub fn stop_signal_rt_centering(go_labels: &[&str], stop_failure_labels: &[&str]) -> Filter {
    let go = Filter::is_in("trial_type", go_labels.iter().copied())
        .and(Filter::ge("response_time", RT_TOO_FAST_THRESHOLD))
        .and(Filter::columns_eq("key_press", "correct_response"));
    let stop_failure = Filter::is_in("trial_type", stop_failure_labels.iter().copied())
        .and(Filter::ge("response_time", RT_TOO_FAST_THRESHOLD));
    test_trial().and(go.or(stop_failure))
}

/// Unvalidated task entry as declared in the registry.
///
/// Contrast formulas are kept as source text here so that a registry with
/// several malformed formulas reports all of them at once.
#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub id: String,
    pub family: TaskFamily,
    pub regressors: Vec<RegressorSpec>,
    pub contrasts: Vec<(String, String)>,
    pub rt_centering: Filter,
    pub confounds: ConfoundPolicy,
    pub auxiliary_columns: Vec<String>,
}

impl TaskDefinition {
    #[must_use]
    pub fn new(id: &str, family: TaskFamily) -> Self {
        Self {
            id: id.to_owned(),
            family,
            regressors: Vec::new(),
            contrasts: Vec::new(),
            rt_centering: default_rt_centering(),
            confounds: ConfoundPolicy::default(),
            auxiliary_columns: Vec::new(),
        }
    }

    /// Adds the omission / commission / too-fast regressors.
    ///
    /// `prefix` is prepended to the regressor names (`"go_"` for tasks
    /// whose nuisance trials are go trials).
    #[must_use]
    pub fn nuisance(mut self, prefix: &str, subset: &Filter) -> Self {
        for (name, amplitude) in [("omission", OMISSION), ("commission", COMMISSION), ("rt_fast", RT_FAST)] {
            self.regressors.push(RegressorSpec::new(
                format!("{prefix}{name}"),
                amplitude,
                CONSTANT,
                subset.clone(),
            ));
        }
        self
    }

    #[must_use]
    pub fn regressor(mut self, spec: RegressorSpec) -> Self {
        self.regressors.push(spec);
        self
    }

    #[must_use]
    pub fn regressors<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = RegressorSpec>,
    {
        self.regressors.extend(specs);
        self
    }

    /// Adds one accurate-trial condition regressor per label, named after
    /// the label.
    #[must_use]
    pub fn accurate_conditions(self, labels: &[&str]) -> Self {
        self.regressors(
            labels
                .iter()
                .map(|label| condition(label, accurate().and(trial_type(label)))),
        )
    }

    #[must_use]
    pub fn contrasts(mut self, contrasts: &[(&str, &str)]) -> Self {
        self.contrasts.extend(
            contrasts
                .iter()
                .map(|(name, formula)| ((*name).to_owned(), (*formula).to_owned())),
        );
        self
    }

    /// Adds an identity contrast for every listed regressor.
    #[must_use]
    pub fn single_contrasts(mut self, names: &[&str]) -> Self {
        self.contrasts.extend(
            names
                .iter()
                .map(|name| ((*name).to_owned(), (*name).to_owned())),
        );
        self
    }

    #[must_use]
    pub fn rt_centering(mut self, filter: Filter) -> Self {
        self.rt_centering = filter;
        self
    }

    #[must_use]
    pub fn confounds(mut self, policy: ConfoundPolicy) -> Self {
        self.confounds = policy;
        self
    }

    #[must_use]
    pub fn auxiliary_column(mut self, column: &str) -> Self {
        self.auxiliary_columns.push(column.to_owned());
        self
    }
}

/// Validated task configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TaskConfig {
    pub id: String,
    pub family: TaskFamily,
    pub regressors: Vec<RegressorSpec>,
    pub contrasts: Vec<Contrast>,
    pub rt_centering: Filter,
    pub confounds: ConfoundPolicy,
    pub auxiliary_columns: Vec<String>,
}

impl TaskConfig {
    /// Regressors of one run, with [`break_period`] appended when requested.
    #[must_use]
    pub fn design_regressors(&self, model_break_period: bool) -> Vec<RegressorSpec> {
        let mut regressors = self.regressors.clone();
        if model_break_period {
            regressors.push(break_period());
        }
        regressors
    }

    #[must_use]
    pub fn contrast(&self, name: &str) -> Option<&Contrast> {
        self.contrasts.iter().find(|c| c.name == name)
    }

    pub fn contrast_names(&self) -> impl Iterator<Item = &str> {
        self.contrasts.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nuisance_names_and_amplitudes() {
        let task = TaskDefinition::new("goNogo", TaskFamily::go_trials(["go"])).nuisance("go_", &Filter::All);
        let names = task.regressors.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["go_omission", "go_commission", "go_rt_fast"]);
        assert_eq!(task.regressors[2].amplitude_column, RT_FAST);
        assert_eq!(task.regressors[0].duration_column, CONSTANT);
    }

    #[test]
    fn test_accurate_condition_filter() {
        let task = TaskDefinition::new("flanker", TaskFamily::TestTrial).accurate_conditions(&["congruent"]);
        assert_eq!(
            task.regressors[0].filter.to_string(),
            "key_press == correct_response and response_time >= 0.2 and trial_type == 'congruent'"
        );
    }

    #[test]
    fn test_stop_signal_centering_subset() {
        let filter = stop_signal_rt_centering(&["go"], &["stop_failure"]);
        let columns = filter.referenced_columns();
        for column in ["trial_id", "trial_type", "response_time", "key_press", "correct_response"] {
            assert!(columns.contains(column), "{column}");
        }
    }
}
