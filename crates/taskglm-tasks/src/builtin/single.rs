//! Single tasks.

use taskglm_design::{confounds::ConfoundPolicy, regressor::RegressorSpec};
use taskglm_events::{augment::CONSTANT, filter::Filter, nuisance::TaskFamily};

use super::{n_back_conditions, not_missing};
use crate::config::{
    TASK_BASELINE, TaskDefinition, accurate, condition, response_time, stop_signal_rt_centering,
    test_trial, trial_type,
};

pub(super) fn definitions() -> Vec<TaskDefinition> {
    vec![
        cued_ts(),
        directed_forgetting(),
        flanker(),
        go_nogo(),
        n_back(),
        stop_signal(),
        shape_matching(),
        spatial_ts(),
    ]
}

const TASK_SWITCHING_CONDITIONS: [(&str, &str); 3] = [
    ("task_stay_cue_switch", "tstay_cswitch"),
    ("task_stay_cue_stay", "tstay_cstay"),
    ("task_switch_cue_switch", "tswitch_cswitch"),
];

const TASK_SWITCHING_CONTRASTS: &[(&str, &str)] = &[
    (
        "task_switch_cost",
        "task_switch_cue_switch-task_stay_cue_switch",
    ),
    ("cue_switch_cost", "task_stay_cue_switch-task_stay_cue_stay"),
    (
        "task_switch_cue_switch-task_stay_cue_stay",
        "task_switch_cue_switch-task_stay_cue_stay",
    ),
    (
        TASK_BASELINE,
        "1/3*(task_stay_cue_switch+task_stay_cue_stay+task_switch_cue_switch)",
    ),
    ("response_time", "response_time"),
];

fn task_switching_conditions() -> impl Iterator<Item = RegressorSpec> {
    TASK_SWITCHING_CONDITIONS
        .into_iter()
        .map(|(name, label)| condition(name, accurate().and(trial_type(label))))
}

fn cued_ts() -> TaskDefinition {
    const NO_TASK_NO_CUE: &str = "tn/a_cn/a";
    TaskDefinition::new("cuedTS", TaskFamily::TestTrial)
        .nuisance("", &Filter::ne("trial_type", NO_TASK_NO_CUE))
        .regressor(condition("n/a", trial_type(NO_TASK_NO_CUE)))
        .regressors(task_switching_conditions())
        .regressor(response_time(
            accurate()
                .and(Filter::ne("trial_type", NO_TASK_NO_CUE))
                .and(test_trial()),
        ))
        .contrasts(TASK_SWITCHING_CONTRASTS)
}

fn directed_forgetting() -> TaskDefinition {
    TaskDefinition::new("directedForgetting", TaskFamily::TestTrial)
        .nuisance("", &Filter::All)
        .regressor(RegressorSpec::new(
            "memory_and_cue",
            CONSTANT,
            "duration",
            Filter::is_in("trial_id", ["test_stim", "test_cue"]),
        ))
        .accurate_conditions(&["con", "pos", "neg"])
        .regressor(response_time(accurate().and(test_trial())))
        .contrasts(&[
            ("neg-con", "neg-con"),
            (TASK_BASELINE, "1/4*(con+pos+neg+memory_and_cue)"),
            ("response_time", "response_time"),
        ])
}

fn flanker() -> TaskDefinition {
    TaskDefinition::new("flanker", TaskFamily::TestTrial)
        .nuisance("", &Filter::All)
        .accurate_conditions(&["congruent", "incongruent"])
        .regressor(response_time(accurate().and(test_trial())))
        .contrasts(&[
            ("incongruent-congruent", "incongruent-congruent"),
            (TASK_BASELINE, "1/2*congruent + 1/2*incongruent"),
            ("response_time", "response_time"),
        ])
}

fn go_nogo() -> TaskDefinition {
    TaskDefinition::new("goNogo", TaskFamily::go_trials(["go"]))
        .nuisance("go_", &Filter::All)
        .regressor(condition("nogo_failure", trial_type("nogo_failure")))
        .regressor(condition(
            "go",
            test_trial().and(accurate()).and(trial_type("go")),
        ))
        .regressor(condition("nogo_success", trial_type("nogo_success")))
        .regressor(response_time(accurate().and(trial_type("go"))))
        .contrasts(&[
            ("go", "go"),
            ("nogo_success", "nogo_success"),
            ("nogo_success-go", "nogo_success-go"),
            (TASK_BASELINE, "1/2*go+1/2*nogo_success"),
            ("response_time", "response_time"),
        ])
}

fn n_back() -> TaskDefinition {
    TaskDefinition::new("nBack", TaskFamily::TestTrial)
        .auxiliary_column("delay")
        .confounds(ConfoundPolicy::LeadingCosines)
        .nuisance("", &not_missing())
        .regressors(n_back_conditions(&["mismatch", "match"]))
        .regressor(response_time(accurate().and(not_missing())))
        .contrasts(&[
            (
                "twoBack-oneBack",
                "1/2*(mismatch_2back+match_2back-mismatch_1back-match_1back)",
            ),
            (
                "match-mismatch",
                "1/2*(match_2back+match_1back-mismatch_2back-mismatch_1back)",
            ),
            (
                TASK_BASELINE,
                "1/4*(mismatch_1back+match_1back+mismatch_2back+match_2back)",
            ),
            ("response_time", "response_time"),
        ])
}

fn stop_signal() -> TaskDefinition {
    TaskDefinition::new("stopSignal", TaskFamily::go_trials(["go"]))
        .nuisance("go_", &Filter::All)
        .regressor(condition(
            "go",
            test_trial().and(accurate()).and(trial_type("go")),
        ))
        .regressor(condition("stop_success", trial_type("stop_success")))
        .regressor(condition("stop_failure", trial_type("stop_failure")))
        .regressor(response_time(accurate().and(trial_type("go"))))
        .rt_centering(stop_signal_rt_centering(&["go"], &["stop_failure"]))
        .single_contrasts(&["go", "stop_success", "stop_failure"])
        .contrasts(&[
            ("stop_success-go", "stop_success-go"),
            ("stop_failure-go", "stop_failure-go"),
            ("stop_success-stop_failure", "stop_success-stop_failure"),
            ("stop_failure-stop_success", "stop_failure-stop_success"),
            (
                TASK_BASELINE,
                "1/3*go + 1/3*stop_failure + 1/3*stop_success",
            ),
            ("response_time", "response_time"),
        ])
}

fn shape_matching() -> TaskDefinition {
    let conditions = ["SSS", "SDD", "SNN", "DSD", "DNN", "DDD", "DDS"];
    TaskDefinition::new("shapeMatching", TaskFamily::TestTrial)
        .nuisance("", &Filter::All)
        .accurate_conditions(&conditions)
        .regressor(response_time(accurate().and(test_trial())))
        .contrasts(&[
            (TASK_BASELINE, "1/7*(SSS+SDD+SNN+DSD+DDD+DDS+DNN)"),
            ("main_vars", "1/3*(SDD+DDD+DDS)-1/2*(SNN+DNN)"),
        ])
        .single_contrasts(&conditions)
        .contrasts(&[("response_time", "response_time")])
}

fn spatial_ts() -> TaskDefinition {
    TaskDefinition::new("spatialTS", TaskFamily::TestTrial)
        .nuisance("", &not_missing())
        .regressors(task_switching_conditions())
        .regressor(response_time(accurate().and(not_missing())))
        .contrasts(TASK_SWITCHING_CONTRASTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cued_ts_models_unlabelled_trials() {
        let task = cued_ts();
        let names = task.regressors.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "omission",
                "commission",
                "rt_fast",
                "n/a",
                "task_stay_cue_switch",
                "task_stay_cue_stay",
                "task_switch_cue_switch",
                "response_time",
            ]
        );
    }

    #[test]
    fn test_only_n_back_keeps_leading_cosines() {
        for definition in definitions() {
            let expected = if definition.id == "nBack" {
                ConfoundPolicy::LeadingCosines
            } else {
                ConfoundPolicy::AllCosines
            };
            assert_eq!(definition.confounds, expected, "{}", definition.id);
        }
    }
}
