//! Task configurations of the study.

use taskglm_design::regressor::RegressorSpec;
use taskglm_events::filter::{Filter, MISSING_LABEL};

use crate::config::{TaskDefinition, accurate, condition, trial_type};

mod dual;
mod single;

pub(crate) fn definitions() -> Vec<TaskDefinition> {
    let mut definitions = single::definitions();
    definitions.extend(dual::definitions());
    definitions
}

/// Rows carrying a trial label.
fn not_missing() -> Filter {
    Filter::ne("trial_type", MISSING_LABEL)
}

/// Accurate trials of each label split by memory load, named
/// `<label>_<k>back`.
fn n_back_conditions(trial_types: &[&str]) -> Vec<RegressorSpec> {
    [1, 2]
        .into_iter()
        .flat_map(|delay| {
            trial_types.iter().map(move |label| {
                condition(
                    &format!("{label}_{delay}back"),
                    accurate()
                        .and(trial_type(label))
                        .and(Filter::eq("delay", delay)),
                )
            })
        })
        .collect()
}
