//! Dual tasks: two single tasks interleaved, with conditions crossing the
//! factors of both.

use taskglm_design::regressor::RegressorSpec;
use taskglm_events::{augment::CONSTANT, filter::Filter, nuisance::TaskFamily};

use super::{n_back_conditions, not_missing};
use crate::config::{
    TaskDefinition, accurate, condition, response_time, stop_signal_rt_centering, test_trial,
    trial_type,
};

pub(super) fn definitions() -> Vec<TaskDefinition> {
    vec![
        directed_forgetting_w_cued_ts(),
        directed_forgetting_w_flanker(),
        stop_signal_w_directed_forgetting(),
        stop_signal_w_flanker(),
        spatial_ts_w_cued_ts(),
        flanker_w_shape_matching(),
        cued_ts_w_flanker(),
        spatial_ts_w_shape_matching(),
        n_back_w_shape_matching(),
        n_back_w_spatial_ts(),
        shape_matching_w_cued_ts(),
    ]
}

/// Accurate conditions over labelled test trials, nuisance restricted to
/// labelled rows.
fn labelled_trials(id: &str, conditions: &[&str], contrasts: &[(&str, &str)]) -> TaskDefinition {
    TaskDefinition::new(id, TaskFamily::TestTrial)
        .nuisance("", &not_missing())
        .accurate_conditions(conditions)
        .regressor(response_time(
            test_trial().and(not_missing()).and(accurate()),
        ))
        .single_contrasts(conditions)
        .contrasts(contrasts)
        .contrasts(&[("response_time", "response_time")])
}

/// Accurate conditions with nuisance over every row.
fn all_trials(id: &str, conditions: &[&str], contrasts: &[(&str, &str)]) -> TaskDefinition {
    TaskDefinition::new(id, TaskFamily::TestTrial)
        .nuisance("", &Filter::All)
        .accurate_conditions(conditions)
        .regressor(response_time(accurate().and(test_trial())))
        .single_contrasts(conditions)
        .contrasts(contrasts)
        .contrasts(&[("response_time", "response_time")])
}

/// Encoding and cue period, modelled over its full duration.
fn memory_and_cue(trial_ids: &[&str]) -> RegressorSpec {
    RegressorSpec::new(
        "memory_and_cue",
        CONSTANT,
        "duration",
        Filter::is_in("trial_id", trial_ids.iter().copied()),
    )
}

/// Stop-signal task crossed with another factor: accurate go trials, and
/// stop outcomes regardless of response.
fn stop_signal_dual(
    id: &str,
    go: &[&str],
    stop_success: &[&str],
    stop_failure: &[&str],
) -> TaskDefinition {
    TaskDefinition::new(id, TaskFamily::go_trials(go.iter().copied()))
        .nuisance("go_", &Filter::All)
        .accurate_conditions(go)
        .regressors(
            stop_success
                .iter()
                .chain(stop_failure)
                .map(|label| condition(label, trial_type(label))),
        )
        .rt_centering(stop_signal_rt_centering(go, stop_failure))
}

fn directed_forgetting_w_cued_ts() -> TaskDefinition {
    labelled_trials(
        "directedForgettingWCuedTS",
        &DIRECTED_FORGETTING_W_CUED_TS_CONDITIONS,
        DIRECTED_FORGETTING_W_CUED_TS_CONTRASTS,
    )
}

fn directed_forgetting_w_flanker() -> TaskDefinition {
    TaskDefinition::new("directedForgettingWFlanker", TaskFamily::TestTrial)
        .nuisance("", &Filter::All)
        .regressor(memory_and_cue(&["test_four_letters", "test_cue"]))
        .accurate_conditions(&DIRECTED_FORGETTING_W_FLANKER_CONDITIONS)
        .regressor(response_time(accurate().and(test_trial())))
        .single_contrasts(&DIRECTED_FORGETTING_W_FLANKER_CONDITIONS)
        .contrasts(DIRECTED_FORGETTING_W_FLANKER_CONTRASTS)
        .contrasts(&[("response_time", "response_time")])
}

fn stop_signal_w_directed_forgetting() -> TaskDefinition {
    let go = ["go_pos", "go_neg", "go_con"];
    stop_signal_dual(
        "stopSignalWDirectedForgetting",
        &go,
        &["stop_success_pos", "stop_success_neg", "stop_success_con"],
        &["stop_failure_pos", "stop_failure_neg", "stop_failure_con"],
    )
    .regressor(memory_and_cue(&["test_cue"]))
    .regressor(response_time(
        accurate().and(Filter::is_in("trial_type", go)),
    ))
    .single_contrasts(&STOP_SIGNAL_W_DIRECTED_FORGETTING_CONDITIONS)
    .contrasts(STOP_SIGNAL_W_DIRECTED_FORGETTING_CONTRASTS)
    .contrasts(&[("response_time", "response_time")])
}

fn stop_signal_w_flanker() -> TaskDefinition {
    let go = ["go_congruent", "go_incongruent"];
    stop_signal_dual(
        "stopSignalWFlanker",
        &go,
        &["stop_success_congruent", "stop_success_incongruent"],
        &["stop_failure_congruent", "stop_failure_incongruent"],
    )
    .regressor(response_time(
        accurate().and(Filter::is_in("trial_type", go)),
    ))
    .single_contrasts(&STOP_SIGNAL_W_FLANKER_CONDITIONS)
    .contrasts(STOP_SIGNAL_W_FLANKER_CONTRASTS)
    .contrasts(&[("response_time", "response_time")])
}

fn spatial_ts_w_cued_ts() -> TaskDefinition {
    labelled_trials(
        "spatialTSWCuedTS",
        &SPATIAL_TS_W_CUED_TS_CONDITIONS,
        SPATIAL_TS_W_CUED_TS_CONTRASTS,
    )
}

fn flanker_w_shape_matching() -> TaskDefinition {
    all_trials(
        "flankerWShapeMatching",
        &FLANKER_W_SHAPE_MATCHING_CONDITIONS,
        FLANKER_W_SHAPE_MATCHING_CONTRASTS,
    )
}

fn cued_ts_w_flanker() -> TaskDefinition {
    labelled_trials(
        "cuedTSWFlanker",
        &CUED_TS_W_FLANKER_CONDITIONS,
        CUED_TS_W_FLANKER_CONTRASTS,
    )
}

fn spatial_ts_w_shape_matching() -> TaskDefinition {
    labelled_trials(
        "spatialTSWShapeMatching",
        &SPATIAL_TS_W_SHAPE_MATCHING_CONDITIONS,
        SPATIAL_TS_W_SHAPE_MATCHING_CONTRASTS,
    )
}

fn n_back_w_shape_matching() -> TaskDefinition {
    labelled_trials(
        "nBackWShapeMatching",
        &N_BACK_W_SHAPE_MATCHING_CONDITIONS,
        N_BACK_W_SHAPE_MATCHING_CONTRASTS,
    )
}

fn n_back_w_spatial_ts() -> TaskDefinition {
    let trial_types = [
        "match_tstay_cstay",
        "match_tstay_cswitch",
        "match_tswitch_cswitch",
        "mismatch_tstay_cstay",
        "mismatch_tstay_cswitch",
        "mismatch_tswitch_cswitch",
    ];
    TaskDefinition::new("nBackWSpatialTS", TaskFamily::TestTrial)
        .auxiliary_column("delay")
        .nuisance("", &not_missing())
        .regressors(n_back_conditions(&trial_types))
        .regressor(response_time(
            test_trial().and(not_missing()).and(accurate()),
        ))
        .single_contrasts(&N_BACK_W_SPATIAL_TS_CONDITIONS)
        .contrasts(N_BACK_W_SPATIAL_TS_CONTRASTS)
        .contrasts(&[("response_time", "response_time")])
}

fn shape_matching_w_cued_ts() -> TaskDefinition {
    all_trials(
        "shapeMatchingWCuedTS",
        &SHAPE_MATCHING_W_CUED_TS_CONDITIONS,
        SHAPE_MATCHING_W_CUED_TS_CONTRASTS,
    )
}

const DIRECTED_FORGETTING_W_CUED_TS_CONDITIONS: [&str; 9] = [
    "neg_tswitch_cswitch",
    "neg_tstay_cswitch",
    "neg_tstay_cstay",
    "pos_tswitch_cswitch",
    "pos_tstay_cswitch",
    "pos_tstay_cstay",
    "con_tswitch_cswitch",
    "con_tstay_cswitch",
    "con_tstay_cstay",
];
const DIRECTED_FORGETTING_W_CUED_TS_CONTRASTS: &[(&str, &str)] = &[
    ("con_tstay_cswitch-con_tstay_cstay", "con_tstay_cswitch-con_tstay_cstay"),
    ("con_tswitch_cswitch-con_tstay_cswitch", "con_tswitch_cswitch-con_tstay_cswitch"),
    ("neg_tstay_cstay-con_tstay_cstay", "neg_tstay_cstay-con_tstay_cstay"),
    (
        "(neg_tstay_cswitch+pos_tstay_cswitch+con_tstay_cswitch)-(neg_tstay_cstay+pos_tstay_cstay+con_tstay_cstay)",
        "1/3*(neg_tstay_cswitch+pos_tstay_cswitch+con_tstay_cswitch)-1/3*(neg_tstay_cstay+pos_tstay_cstay+con_tstay_cstay)",
    ),
    (
        "(neg_tswitch_cswitch+pos_tswitch_cswitch+con_tswitch_cswitch)-(neg_tstay_cswitch+pos_tstay_cswitch+con_tstay_cswitch)",
        "1/3*(neg_tswitch_cswitch+pos_tswitch_cswitch+con_tswitch_cswitch)-1/3*(neg_tstay_cswitch+pos_tstay_cswitch+con_tstay_cswitch)",
    ),
    (
        "(neg_tstay_cstay+neg_tstay_cswitch+neg_tswitch_cswitch)-(con_tstay_cstay+con_tstay_cswitch+con_tswitch_cswitch)",
        "1/3*(neg_tstay_cstay+neg_tstay_cswitch+neg_tswitch_cswitch)-1/3*(con_tstay_cstay+con_tstay_cswitch+con_tswitch_cswitch)",
    ),
    (
        "(neg_tstay_cswitch-con_tstay_cswitch)-(neg_tstay_cstay-con_tstay_cstay)",
        "1/2*(neg_tstay_cswitch-con_tstay_cswitch)-1/2*(neg_tstay_cstay-con_tstay_cstay)",
    ),
    (
        "(neg_tswitch_cswitch-con_tswitch_cswitch)-(neg_tstay_cswitch-con_tstay_cswitch)",
        "1/2*(neg_tswitch_cswitch-con_tswitch_cswitch)-1/2*(neg_tstay_cswitch-con_tstay_cswitch)",
    ),
    (
        "task-baseline",
        "1/9*(neg_tswitch_cswitch+neg_tstay_cswitch+neg_tstay_cstay+pos_tswitch_cswitch+pos_tstay_cswitch+pos_tstay_cstay+con_tswitch_cswitch+con_tstay_cswitch+con_tstay_cstay)",
    ),
];

const DIRECTED_FORGETTING_W_FLANKER_CONDITIONS: [&str; 6] = [
    "congruent_pos",
    "congruent_neg",
    "congruent_con",
    "incongruent_pos",
    "incongruent_neg",
    "incongruent_con",
];
const DIRECTED_FORGETTING_W_FLANKER_CONTRASTS: &[(&str, &str)] = &[
    ("congruent_neg-congruent_con", "congruent_neg-congruent_con"),
    ("incongruent_con-congruent_con", "incongruent_con-congruent_con"),
    (
        "(incongruent_neg-incongruent_con)-(congruent_neg-congruent_con)",
        "1/2*(incongruent_neg+congruent_con)-1/2*(incongruent_con+congruent_neg)",
    ),
    (
        "task-baseline",
        "1/7*(congruent_pos+congruent_neg+congruent_con+incongruent_pos+incongruent_neg+incongruent_con+memory_and_cue)",
    ),
];

const STOP_SIGNAL_W_DIRECTED_FORGETTING_CONDITIONS: [&str; 9] = [
    "go_pos",
    "go_neg",
    "go_con",
    "stop_success_pos",
    "stop_success_neg",
    "stop_success_con",
    "stop_failure_pos",
    "stop_failure_neg",
    "stop_failure_con",
];
const STOP_SIGNAL_W_DIRECTED_FORGETTING_CONTRASTS: &[(&str, &str)] = &[
    ("go_neg-go_con", "go_neg-go_con"),
    ("stop_success_con-go_con", "stop_success_con-go_con"),
    (
        "(stop_success_con+stop_success_pos+stop_success_neg)-(go_con+go_pos_+go_neg)",
        "1/3*(stop_success_con+stop_success_pos+stop_success_neg)-1/3*(go_con+go_pos+go_neg)",
    ),
    (
        "(stop_failure_con+stop_failure_pos+stop_failure_neg)-(go_con+go_pos_+go_neg)",
        "1/3*(stop_failure_con+stop_failure_pos+stop_failure_neg)-1/3*(go_con+go_pos+go_neg)",
    ),
    (
        "(stop_success_neg-go_neg)-(stop_success_con-go_con)",
        "1/2*(stop_success_neg-go_neg)-1/2*(stop_success_con-go_con)",
    ),
    (
        "(stop_failure_neg-go_neg)-(stop_failure_con-go_con)",
        "1/2*(stop_failure_neg-go_neg)-1/2*(stop_failure_con-go_con)",
    ),
    (
        "task-baseline",
        "1/10*(go_pos+go_neg+go_con+stop_success_pos+stop_success_neg+stop_success_con+stop_failure_pos+stop_failure_neg+stop_failure_con+memory_and_cue)",
    ),
];

const STOP_SIGNAL_W_FLANKER_CONDITIONS: [&str; 6] = [
    "go_congruent",
    "go_incongruent",
    "stop_success_congruent",
    "stop_success_incongruent",
    "stop_failure_congruent",
    "stop_failure_incongruent",
];
const STOP_SIGNAL_W_FLANKER_CONTRASTS: &[(&str, &str)] = &[
    ("go_incongruent-go_congruent", "go_incongruent-go_congruent"),
    (
        "(stop_success_congruent+stop_success_incongruent)-(go_congruent+go_incongruent)",
        "1/2*(stop_success_congruent+stop_success_incongruent)-1/2*(go_congruent+go_incongruent)",
    ),
    (
        "(stop_failure_congruent+stop_failure_incongruent)-(go_congruent+go_incongruent)",
        "1/2*(stop_failure_congruent+stop_failure_incongruent)-1/2*(go_congruent+go_incongruent)",
    ),
    (
        "(stop_success_incongruent-go_incongruent)-(stop_success_congruent-go_congruent)",
        "1/2*(stop_success_incongruent-go_incongruent)-1/2*(stop_success_congruent-go_congruent)",
    ),
    (
        "(stop_failure_incongruent-go_incongruent)-(stop_failure_congruent-go_congruent)",
        "1/2*(stop_failure_incongruent-go_incongruent)-1/2*(stop_failure_congruent-go_congruent)",
    ),
    ("stop_success_congruent-go_congruent", "stop_success_congruent-go_congruent"),
    (
        "task-baseline",
        "1/6*(go_congruent+go_incongruent+stop_success_congruent+stop_success_incongruent+stop_failure_congruent+stop_failure_incongruent)",
    ),
];

const SPATIAL_TS_W_CUED_TS_CONDITIONS: [&str; 9] = [
    "cuedtstaycstay_spatialtstaycstay",
    "cuedtstaycstay_spatialtstaycswitch",
    "cuedtstaycstay_spatialtswitchcswitch",
    "cuedtstaycswitch_spatialtstaycstay",
    "cuedtstaycswitch_spatialtstaycswitch",
    "cuedtstaycswitch_spatialtswitchcswitch",
    "cuedtswitchcswitch_spatialtstaycstay",
    "cuedtswitchcswitch_spatialtstaycswitch",
    "cuedtswitchcswitch_spatialtswitchcswitch",
];
const SPATIAL_TS_W_CUED_TS_CONTRASTS: &[(&str, &str)] = &[
    (
        "cuedtstaycswitch_spatialtstaycstay-cuedtstaycstay_spatialtstaycstay",
        "cuedtstaycswitch_spatialtstaycstay-cuedtstaycstay_spatialtstaycstay",
    ),
    (
        "cuedtswitchcswitch_spatialtstaycstay-cuedtstaycswitch_spatialtstaycstay",
        "cuedtswitchcswitch_spatialtstaycstay-cuedtstaycswitch_spatialtstaycstay",
    ),
    (
        "cuedtstaycstay_spatialtstaycswitch-cuedtstaycstay_spatialtstaycstay",
        "cuedtstaycstay_spatialtstaycswitch-cuedtstaycstay_spatialtstaycstay",
    ),
    (
        "cuedtstaycstay_spatialtswitchcswitch-cuedtstaycstay_spatialtstaycswitch",
        "cuedtstaycstay_spatialtswitchcswitch-cuedtstaycstay_spatialtstaycswitch",
    ),
    (
        "(cuedtstaycswitch_spatialtstaycstay+cuedtstaycswitch_spatialtstaycswitch+cuedtstaycswitch_spatialtswitchcswitch)-(cuedtstaycstay_spatialtstaycstay+cuedtstaycstay_spatialtstaycswitch+cuedtstaycstay_spatialtswitchcswitch)",
        "1/3*(cuedtstaycswitch_spatialtstaycstay+cuedtstaycswitch_spatialtstaycswitch+cuedtstaycswitch_spatialtswitchcswitch)-1/3*(cuedtstaycstay_spatialtstaycstay+cuedtstaycstay_spatialtstaycswitch+cuedtstaycstay_spatialtswitchcswitch)",
    ),
    (
        "(cuedtswitchcswitch_spatialtstaycstay+cuedtswitchcswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtswitchcswitch)-(cuedtstaycswitch_spatialtstaycstay+cuedtstaycswitch_spatialtstaycswitch+cuedtstaycswitch_spatialtswitchcswitch)",
        "1/3*(cuedtswitchcswitch_spatialtstaycstay+cuedtswitchcswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtswitchcswitch)-1/3*(cuedtstaycswitch_spatialtstaycstay+cuedtstaycswitch_spatialtstaycswitch+cuedtstaycswitch_spatialtswitchcswitch)",
    ),
    (
        "(cuedtstaycstay_spatialtstaycswitch+cuedtstaycswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtstaycswitch)-(cuedtstaycstay_spatialtstaycstay+cuedtstaycswitch_spatialtstaycstay+cuedtswitchcswitch_spatialtstaycstay)",
        "1/3*(cuedtstaycstay_spatialtstaycswitch+cuedtstaycswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtstaycswitch)-1/3*(cuedtstaycstay_spatialtstaycstay+cuedtstaycswitch_spatialtstaycstay+cuedtswitchcswitch_spatialtstaycstay)",
    ),
    (
        "(cuedtstaycstay_spatialtswitchcswitch+cuedtstaycswitch_spatialtswitchcswitch+cuedtswitchcswitch_spatialtswitchcswitch)-(cuedtstaycstay_spatialtstaycswitch+cuedtstaycswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtstaycswitch)",
        "1/3*(cuedtstaycstay_spatialtswitchcswitch+cuedtstaycswitch_spatialtswitchcswitch+cuedtswitchcswitch_spatialtswitchcswitch)-1/3*(cuedtstaycstay_spatialtstaycswitch+cuedtstaycswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtstaycswitch)",
    ),
    (
        "(cuedtstaycswitch_spatialtstaycswitch-cuedtstaycstay_spatialtstaycswitch)-(cuedtstaycswitch_spatialtstaycstay-cuedtstaycstay_spatialtstaycstay)",
        "1/2*(cuedtstaycswitch_spatialtstaycswitch-cuedtstaycstay_spatialtstaycswitch)-1/2*(cuedtstaycswitch_spatialtstaycstay-cuedtstaycstay_spatialtstaycstay)",
    ),
    (
        "(cuedtswitchcswitch_spatialtswitchcswitch-cuedtstaycswitch_spatialtswitchcswitch)-(cuedtswitchcswitch_spatialtstaycswitch-cuedtstaycswitch_spatialtstaycswitch)",
        "1/2*(cuedtswitchcswitch_spatialtswitchcswitch-cuedtstaycswitch_spatialtswitchcswitch)-1/2*(cuedtswitchcswitch_spatialtstaycswitch-cuedtstaycswitch_spatialtstaycswitch)",
    ),
    (
        "task-baseline",
        "1/9*(cuedtstaycstay_spatialtstaycstay+cuedtstaycstay_spatialtstaycswitch+cuedtstaycstay_spatialtswitchcswitch+cuedtstaycswitch_spatialtstaycstay+cuedtstaycswitch_spatialtstaycswitch+cuedtstaycswitch_spatialtswitchcswitch+cuedtswitchcswitch_spatialtstaycstay+cuedtswitchcswitch_spatialtstaycswitch+cuedtswitchcswitch_spatialtswitchcswitch)",
    ),
];

const FLANKER_W_SHAPE_MATCHING_CONDITIONS: [&str; 14] = [
    "congruent_SSS",
    "congruent_SDD",
    "congruent_SNN",
    "congruent_DSD",
    "congruent_DDD",
    "congruent_DDS",
    "congruent_DNN",
    "incongruent_SSS",
    "incongruent_SDD",
    "incongruent_SNN",
    "incongruent_DSD",
    "incongruent_DDD",
    "incongruent_DDS",
    "incongruent_DNN",
];
const FLANKER_W_SHAPE_MATCHING_CONTRASTS: &[(&str, &str)] = &[
    (
        "(incongruent_SNN+incongruent_DNN)-(congruent_SNN+congruent_DNN)",
        "1/2*(incongruent_SNN+incongruent_DNN)-1/2*(congruent_SNN+congruent_DNN)",
    ),
    (
        "(congruent_SDD+congruent_DDD+congruent_DDS)-(congruent_SNN+congruent_DNN)",
        "1/3*(congruent_SDD+congruent_DDD+congruent_DDS)-1/2*(congruent_SNN+congruent_DNN)",
    ),
    (
        "(incongruent_SSS+incongruent_SDD+incongruent_SNN+incongruent_DSD+incongruent_DNN+incongruent_DDD+incongruent_DDS)-(congruent_SSS+congruent_SDD+congruent_SNN+congruent_DSD+congruent_DNN+congruent_DDD+congruent_DDS)",
        "1/7*(incongruent_SSS+incongruent_SDD+incongruent_SNN+incongruent_DSD+incongruent_DNN+incongruent_DDD+incongruent_DDS)-1/7*(congruent_SSS+congruent_SDD+congruent_SNN+congruent_DSD+congruent_DNN+congruent_DDD+congruent_DDS)",
    ),
    (
        "(congruent_SDD+congruent_DDD+congruent_DDS+incongruent_SDD+incongruent_DDD+incongruent_DDS)-(congruent_SNN+congruent_DNN+incongruent_SNN+incongruent_DNN)",
        "1/6*(congruent_SDD+congruent_DDD+congruent_DDS+incongruent_SDD+incongruent_DDD+incongruent_DDS)-1/4*(congruent_SNN+congruent_DNN+incongruent_SNN+incongruent_DNN)",
    ),
    (
        "((incongruent_SDD+incongruent_DDD+incongruent_DDS)-(congruent_SDD+congruent_DDD+congruent_DDS))-((incongruent_SNN+incongruent_DNN)-(congruent_SNN+congruent_DNN))",
        "(1/3*(incongruent_SDD+incongruent_DDD+incongruent_DDS)-1/3*(congruent_SDD+congruent_DDD+congruent_DDS))-(1/2*(incongruent_SNN+incongruent_DNN)-1/2*(congruent_SNN+congruent_DNN))",
    ),
    (
        "task-baseline",
        "1/14*(congruent_SSS+congruent_SDD+congruent_SNN+congruent_DSD+congruent_DNN+congruent_DDD+congruent_DDS+incongruent_SSS+incongruent_SDD+incongruent_SNN+incongruent_DSD+incongruent_DNN+incongruent_DDD+incongruent_DDS)",
    ),
];

const CUED_TS_W_FLANKER_CONDITIONS: [&str; 6] = [
    "cstay_tstay_congruent",
    "cstay_tstay_incongruent",
    "cswitch_tswitch_congruent",
    "cswitch_tswitch_incongruent",
    "cswitch_tstay_congruent",
    "cswitch_tstay_incongruent",
];
const CUED_TS_W_FLANKER_CONTRASTS: &[(&str, &str)] = &[
    (
        "cstay_tstay_incongruent-cstay_tstay_congruent",
        "cstay_tstay_incongruent-cstay_tstay_congruent",
    ),
    (
        "cswitch_tstay_congruent-cstay_tstay_congruent",
        "cswitch_tstay_congruent-cstay_tstay_congruent",
    ),
    (
        "cswitch_tswitch_congruent-cswitch_tstay_congruent",
        "cswitch_tswitch_congruent-cswitch_tstay_congruent",
    ),
    (
        "(cstay_tstay_incongruent+cswitch_tswitch_incongruent+cswitch_tstay_incongruent)-(cstay_tstay_congruent+cswitch_tswitch_congruent+cswitch_tstay_congruent)",
        "1/3*(cstay_tstay_incongruent+cswitch_tswitch_incongruent+cswitch_tstay_incongruent)-1/3*(cstay_tstay_congruent+cswitch_tswitch_congruent+cswitch_tstay_congruent)",
    ),
    (
        "(cswitch_tstay_congruent+cswitch_tstay_incongruent)-(cstay_tstay_congruent+cstay_tstay_incongruent)",
        "1/2*(cswitch_tstay_congruent+cswitch_tstay_incongruent)-1/2*(cstay_tstay_congruent+cstay_tstay_incongruent)",
    ),
    (
        "(cswitch_tswitch_congruent+cswitch_tswitch_incongruent)-(cswitch_tstay_congruent+cswitch_tstay_incongruent)",
        "1/2*(cswitch_tswitch_congruent+cswitch_tswitch_incongruent)-1/2*(cswitch_tstay_congruent+cswitch_tstay_incongruent)",
    ),
    (
        "(cswitch_tstay_incongruent-cstay_tstay_incongruent)-(cswitch_tstay_congruent-cstay_tstay_congruent)",
        "1/2*(cswitch_tstay_incongruent-cstay_tstay_incongruent)-1/2*(cswitch_tstay_congruent-cstay_tstay_congruent)",
    ),
    (
        "(cswitch_tswitch_incongruent-cswitch_tstay_incongruent)-(cswitch_tswitch_congruent-cswitch_tstay_congruent)",
        "1/2*(cswitch_tswitch_incongruent-cswitch_tstay_incongruent)-1/2*(cswitch_tswitch_congruent-cswitch_tstay_congruent)",
    ),
    (
        "task-baseline",
        "1/6*(cstay_tstay_congruent+cstay_tstay_incongruent+cswitch_tswitch_congruent+cswitch_tswitch_incongruent+cswitch_tstay_congruent+cswitch_tstay_incongruent)",
    ),
];

const SPATIAL_TS_W_SHAPE_MATCHING_CONDITIONS: [&str; 21] = [
    "tstay_cstay_SSS",
    "tstay_cstay_SDD",
    "tstay_cstay_SNN",
    "tstay_cstay_DSD",
    "tstay_cstay_DNN",
    "tstay_cstay_DDD",
    "tstay_cstay_DDS",
    "tstay_cswitch_SSS",
    "tstay_cswitch_SDD",
    "tstay_cswitch_SNN",
    "tstay_cswitch_DSD",
    "tstay_cswitch_DNN",
    "tstay_cswitch_DDD",
    "tstay_cswitch_DDS",
    "tswitch_cswitch_SSS",
    "tswitch_cswitch_SDD",
    "tswitch_cswitch_SNN",
    "tswitch_cswitch_DSD",
    "tswitch_cswitch_DNN",
    "tswitch_cswitch_DDD",
    "tswitch_cswitch_DDS",
];
const SPATIAL_TS_W_SHAPE_MATCHING_CONTRASTS: &[(&str, &str)] = &[
    (
        "(tstay_cswitch_SNN+tstay_cswitch_DNN)-(tstay_cstay_SNN+tstay_cstay_DNN)",
        "1/2*(tstay_cswitch_SNN+tstay_cswitch_DNN)-1/2*(tstay_cstay_SNN+tstay_cstay_DNN)",
    ),
    (
        "(tswitch_cswitch_SNN+tswitch_cswitch_DNN)-(tstay_cswitch_SNN+tstay_cswitch_DNN)",
        "1/2*(tswitch_cswitch_SNN+tswitch_cswitch_DNN)-1/2*(tstay_cswitch_SNN+tstay_cswitch_DNN)",
    ),
    (
        "(tstay_cstay_SDD+tstay_cstay_DDD+tstay_cstay_DDS)-(tstay_cstay_SNN+tstay_cstay_DNN)",
        "1/3*(tstay_cstay_SDD+tstay_cstay_DDD+tstay_cstay_DDS)-1/2*(tstay_cstay_SNN+tstay_cstay_DNN)",
    ),
    (
        "(tstay_cswitch_SSS+tstay_cswitch_SDD+tstay_cswitch_SNN+tstay_cswitch_DSD+tstay_cswitch_DNN+tstay_cswitch_DDD+tstay_cswitch_DDS)-(tstay_cstay_SSS+tstay_cstay_SDD+tstay_cstay_SNN+tstay_cstay_DSD+tstay_cstay_DNN+tstay_cstay_DDD+tstay_cstay_DDS)",
        "1/7*(tstay_cswitch_SSS+tstay_cswitch_SDD+tstay_cswitch_SNN+tstay_cswitch_DSD+tstay_cswitch_DNN+tstay_cswitch_DDD+tstay_cswitch_DDS)-1/7*(tstay_cstay_SSS+tstay_cstay_SDD+tstay_cstay_SNN+tstay_cstay_DSD+tstay_cstay_DNN+tstay_cstay_DDD+tstay_cstay_DDS)",
    ),
    (
        "(tswitch_cswitch_SSS+tswitch_cswitch_SDD+tswitch_cswitch_SNN+tswitch_cswitch_DSD+tswitch_cswitch_DNN+tswitch_cswitch_DDD+tswitch_cswitch_DDS)-(tstay_cswitch_SSS+tstay_cswitch_SDD+tstay_cswitch_SNN+tstay_cswitch_DSD+tstay_cswitch_DNN+tstay_cswitch_DDD+tstay_cswitch_DDS)",
        "1/7*(tswitch_cswitch_SSS+tswitch_cswitch_SDD+tswitch_cswitch_SNN+tswitch_cswitch_DSD+tswitch_cswitch_DNN+tswitch_cswitch_DDD+tswitch_cswitch_DDS)-1/7*(tstay_cswitch_SSS+tstay_cswitch_SDD+tstay_cswitch_SNN+tstay_cswitch_DSD+tstay_cswitch_DNN+tstay_cswitch_DDD+tstay_cswitch_DDS)",
    ),
    (
        "(tstay_cstay_SDD+tstay_cstay_DDD+tstay_cstay_DDS+tstay_cswitch_SDD+tstay_cswitch_DDD+tstay_cswitch_DDS+tswitch_cswitch_SDD+tswitch_cswitch_DDD+tswitch_cswitch_DDS)-(tstay_cstay_SNN+tstay_cstay_DNN+tstay_cswitch_SNN+tstay_cswitch_DNN+tswitch_cswitch_SNN+tswitch_cswitch_DNN)",
        "1/9*(tstay_cstay_SDD+tstay_cstay_DDD+tstay_cstay_DDS+tstay_cswitch_SDD+tstay_cswitch_DDD+tstay_cswitch_DDS+tswitch_cswitch_SDD+tswitch_cswitch_DDD+tswitch_cswitch_DDS)-1/6*(tstay_cstay_SNN+tstay_cstay_DNN+tstay_cswitch_SNN+tstay_cswitch_DNN+tswitch_cswitch_SNN+tswitch_cswitch_DNN)",
    ),
    (
        "((tstay_cswitch_SDD+tstay_cswitch_DDD+tstay_cswitch_DDS)-(tstay_cstay_SDD+tstay_cstay_DDD+tstay_cstay_DDS))-((tstay_cswitch_SNN+tstay_cswitch_DNN)-(tstay_cstay_SNN+tstay_cstay_DNN))",
        "1/3*(tstay_cswitch_SDD+tstay_cswitch_DDD+tstay_cswitch_DDS)-1/3*(tstay_cstay_SDD+tstay_cstay_DDD+tstay_cstay_DDS)-1/2*(tstay_cswitch_SNN+tstay_cswitch_DNN)+1/2*(tstay_cstay_SNN+tstay_cstay_DNN)",
    ),
    (
        "((tswitch_cswitch_SDD+tswitch_cswitch_DDD+tswitch_cswitch_DDS)-(tstay_cswitch_SDD+tstay_cswitch_DDD+tstay_cswitch_DDS))-((tswitch_cswitch_SNN+tswitch_cswitch_DNN)-(tstay_cswitch_SNN+tstay_cswitch_DNN))",
        "1/3*(tswitch_cswitch_SDD+tswitch_cswitch_DDD+tswitch_cswitch_DDS)-1/3*(tstay_cswitch_SDD+tstay_cswitch_DDD+tstay_cswitch_DDS)-1/2*(tswitch_cswitch_SNN+tswitch_cswitch_DNN)+1/2*(tstay_cswitch_SNN+tstay_cswitch_DNN)",
    ),
    (
        "task-baseline",
        "1/21*(tstay_cstay_SSS+tstay_cstay_SDD+tstay_cstay_SNN+tstay_cstay_DSD+tstay_cstay_DNN+tstay_cstay_DDD+tstay_cstay_DDS+tstay_cswitch_SSS+tstay_cswitch_SDD+tstay_cswitch_SNN+tstay_cswitch_DSD+tstay_cswitch_DNN+tstay_cswitch_DDD+tstay_cswitch_DDS+tswitch_cswitch_SSS+tswitch_cswitch_SDD+tswitch_cswitch_SNN+tswitch_cswitch_DSD+tswitch_cswitch_DNN+tswitch_cswitch_DDD+tswitch_cswitch_DDS)",
    ),
];

const N_BACK_W_SHAPE_MATCHING_CONDITIONS: [&str; 12] = [
    "match_td_same_1back",
    "match_td_same_2back",
    "match_td_diff_1back",
    "match_td_diff_2back",
    "match_td_na_1back",
    "match_td_na_2back",
    "mismatch_td_same_1back",
    "mismatch_td_same_2back",
    "mismatch_td_diff_1back",
    "mismatch_td_diff_2back",
    "mismatch_td_na_1back",
    "mismatch_td_na_2back",
];
const N_BACK_W_SHAPE_MATCHING_CONTRASTS: &[(&str, &str)] = &[
    (
        "twoBack-oneBack",
        "1/6*(match_td_same_2back+match_td_diff_2back+match_td_na_2back+mismatch_td_same_2back+mismatch_td_diff_2back+mismatch_td_na_2back)-1/6*(match_td_same_1back+match_td_diff_1back+match_td_na_1back+mismatch_td_same_1back+mismatch_td_diff_1back+mismatch_td_na_1back)",
    ),
    (
        "td_diff-td_na",
        "1/4*(match_td_diff_1back+match_td_diff_2back+mismatch_td_diff_1back+mismatch_td_diff_2back)-1/4*(match_td_na_1back+match_td_na_2back+mismatch_td_na_1back+mismatch_td_na_2back)",
    ),
    (
        "td_same-td_na",
        "1/4*(match_td_same_1back+match_td_same_2back+mismatch_td_same_1back+mismatch_td_same_2back)-1/4*(match_td_na_1back+match_td_na_2back+mismatch_td_na_1back+mismatch_td_na_2back)",
    ),
    (
        "(td_diff_2back-td_na_2back)-(td_diff_1back-td_na_1back)",
        "1/2*(match_td_diff_2back+mismatch_td_diff_2back)-1/2*(match_td_na_2back+mismatch_td_na_2back)-1/2*(match_td_diff_1back+mismatch_td_diff_1back)+1/2*(match_td_na_1back+mismatch_td_na_1back)",
    ),
    (
        "task-baseline",
        "1/12*(match_td_same_1back+match_td_same_2back+match_td_diff_1back+match_td_diff_2back+match_td_na_1back+match_td_na_2back+mismatch_td_same_1back+mismatch_td_same_2back+mismatch_td_diff_1back+mismatch_td_diff_2back+mismatch_td_na_1back+mismatch_td_na_2back)",
    ),
];

const N_BACK_W_SPATIAL_TS_CONDITIONS: [&str; 12] = [
    "match_tstay_cstay_1back",
    "match_tstay_cswitch_1back",
    "match_tswitch_cswitch_1back",
    "mismatch_tstay_cstay_1back",
    "mismatch_tstay_cswitch_1back",
    "mismatch_tswitch_cswitch_1back",
    "match_tstay_cstay_2back",
    "match_tstay_cswitch_2back",
    "match_tswitch_cswitch_2back",
    "mismatch_tstay_cstay_2back",
    "mismatch_tstay_cswitch_2back",
    "mismatch_tswitch_cswitch_2back",
];
const N_BACK_W_SPATIAL_TS_CONTRASTS: &[(&str, &str)] = &[
    (
        "(match_tstay_cstay_2back+mismatch_tstay_cstay_2back)-(match_tstay_cstay_1back+mismatch_tstay_cstay_1back)",
        "1/2*(match_tstay_cstay_2back+mismatch_tstay_cstay_2back)-1/2*(match_tstay_cstay_1back+mismatch_tstay_cstay_1back)",
    ),
    (
        "(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back)-(match_tstay_cstay_1back+mismatch_tstay_cstay_1back)",
        "1/2*(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back)-1/2*(match_tstay_cstay_1back+mismatch_tstay_cstay_1back)",
    ),
    (
        "(match_tswitch_cswitch_1back+mismatch_tswitch_cswitch_1back)-(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back)",
        "1/2*(match_tswitch_cswitch_1back+mismatch_tswitch_cswitch_1back)-1/2*(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back)",
    ),
    (
        "(match_tstay_cstay_2back+match_tstay_cswitch_2back+match_tswitch_cswitch_2back+mismatch_tstay_cstay_2back+mismatch_tstay_cswitch_2back+mismatch_tswitch_cswitch_2back)-(match_tstay_cstay_1back+match_tstay_cswitch_1back+match_tswitch_cswitch_1back+mismatch_tstay_cstay_1back+mismatch_tstay_cswitch_1back+mismatch_tswitch_cswitch_1back)",
        "1/6*(match_tstay_cstay_2back+match_tstay_cswitch_2back+match_tswitch_cswitch_2back+mismatch_tstay_cstay_2back+mismatch_tstay_cswitch_2back+mismatch_tswitch_cswitch_2back)-1/6*(match_tstay_cstay_1back+match_tstay_cswitch_1back+match_tswitch_cswitch_1back+mismatch_tstay_cstay_1back+mismatch_tstay_cswitch_1back+mismatch_tswitch_cswitch_1back)",
    ),
    (
        "(match_tstay_cswitch_1back+match_tstay_cswitch_2back+mismatch_tstay_cswitch_1back+mismatch_tstay_cswitch_2back)-(match_tstay_cstay_1back+match_tstay_cstay_2back+mismatch_tstay_cstay_1back+mismatch_tstay_cstay_2back)",
        "1/4*(match_tstay_cswitch_1back+match_tstay_cswitch_2back+mismatch_tstay_cswitch_1back+mismatch_tstay_cswitch_2back)-1/4*(match_tstay_cstay_1back+match_tstay_cstay_2back+mismatch_tstay_cstay_1back+mismatch_tstay_cstay_2back)",
    ),
    (
        "(match_tswitch_cswitch_1back+match_tswitch_cswitch_2back+mismatch_tswitch_cswitch_1back+mismatch_tswitch_cswitch_2back)-(match_tstay_cswitch_1back+match_tstay_cswitch_2back+mismatch_tstay_cswitch_1back+mismatch_tstay_cswitch_2back)",
        "1/4*(match_tswitch_cswitch_1back+match_tswitch_cswitch_2back+mismatch_tswitch_cswitch_1back+mismatch_tswitch_cswitch_2back)-1/4*(match_tstay_cswitch_1back+match_tstay_cswitch_2back+mismatch_tstay_cswitch_1back+mismatch_tstay_cswitch_2back)",
    ),
    (
        "((match_tstay_cswitch_2back+mismatch_tstay_cswitch_2back)-(match_tstay_cstay_2back+mismatch_tstay_cstay_2back))-((match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back)-(match_tstay_cstay_1back+mismatch_tstay_cstay_1back))",
        "(1/2*(match_tstay_cswitch_2back+mismatch_tstay_cswitch_2back)-1/2*(match_tstay_cstay_2back+mismatch_tstay_cstay_2back))-(1/2*(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back)-1/2*(match_tstay_cstay_1back+mismatch_tstay_cstay_1back))",
    ),
    (
        "((match_tswitch_cswitch_2back+mismatch_tswitch_cswitch_2back)-(match_tstay_cswitch_2back+mismatch_tstay_cswitch_2back))-((match_tswitch_cswitch_1back+mismatch_tswitch_cswitch_1back)-(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back))",
        "(1/2*(match_tswitch_cswitch_2back+mismatch_tswitch_cswitch_2back)-1/2*(match_tstay_cswitch_2back+mismatch_tstay_cswitch_2back))-(1/2*(match_tswitch_cswitch_1back+mismatch_tswitch_cswitch_1back)-1/2*(match_tstay_cswitch_1back+mismatch_tstay_cswitch_1back))",
    ),
    (
        "task-baseline",
        "1/12*(mismatch_tstay_cstay_1back+mismatch_tstay_cswitch_1back+mismatch_tswitch_cswitch_1back+match_tstay_cstay_1back+match_tstay_cswitch_1back+match_tswitch_cswitch_1back+mismatch_tstay_cstay_2back+mismatch_tstay_cswitch_2back+mismatch_tswitch_cswitch_2back+match_tstay_cstay_2back+match_tstay_cswitch_2back+match_tswitch_cswitch_2back)",
    ),
];

const SHAPE_MATCHING_W_CUED_TS_CONDITIONS: [&str; 21] = [
    "SSS_tswitch_cswitch",
    "SSS_tstay_cswitch",
    "SSS_tstay_cstay",
    "SDD_tswitch_cswitch",
    "SDD_tstay_cswitch",
    "SDD_tstay_cstay",
    "SNN_tswitch_cswitch",
    "SNN_tstay_cswitch",
    "SNN_tstay_cstay",
    "DSD_tswitch_cswitch",
    "DSD_tstay_cswitch",
    "DSD_tstay_cstay",
    "DDD_tswitch_cswitch",
    "DDD_tstay_cswitch",
    "DDD_tstay_cstay",
    "DDS_tswitch_cswitch",
    "DDS_tstay_cswitch",
    "DDS_tstay_cstay",
    "DNN_tswitch_cswitch",
    "DNN_tstay_cswitch",
    "DNN_tstay_cstay",
];
const SHAPE_MATCHING_W_CUED_TS_CONTRASTS: &[(&str, &str)] = &[
    (
        "(SNN_tstay_cswitch+DNN_tstay_cswitch)-(SNN_tstay_cstay+DNN_tstay_cstay)",
        "1/2*(SNN_tstay_cswitch+DNN_tstay_cswitch)-1/2*(SNN_tstay_cstay+DNN_tstay_cstay)",
    ),
    (
        "(SNN_tswitch_cswitch+DNN_tswitch_cswitch)-(SNN_tstay_cswitch+DNN_tstay_cswitch)",
        "1/2*(SNN_tswitch_cswitch+DNN_tswitch_cswitch)-1/2*(SNN_tstay_cswitch+DNN_tstay_cswitch)",
    ),
    (
        "(SDD_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay)-(SNN_tstay_cstay+DNN_tstay_cstay)",
        "1/3*(SDD_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay)-1/2*(SNN_tstay_cstay+DNN_tstay_cstay)",
    ),
    (
        "(SSS_tstay_cswitch+SDD_tstay_cswitch+SNN_tstay_cswitch+DSD_tstay_cswitch+DNN_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)-(SSS_tstay_cstay+SDD_tstay_cstay+SNN_tstay_cstay+DSD_tstay_cstay+DNN_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay)",
        "1/7*(SSS_tstay_cswitch+SDD_tstay_cswitch+SNN_tstay_cswitch+DSD_tstay_cswitch+DNN_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)-1/7*(SSS_tstay_cstay+SDD_tstay_cstay+SNN_tstay_cstay+DSD_tstay_cstay+DNN_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay)",
    ),
    (
        "(SSS_tswitch_cswitch+SDD_tswitch_cswitch+SNN_tswitch_cswitch+DSD_tswitch_cswitch+DNN_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)-(SSS_tstay_cswitch+SDD_tstay_cswitch+SNN_tstay_cswitch+DSD_tstay_cswitch+DNN_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)",
        "1/7*(SSS_tswitch_cswitch+SDD_tswitch_cswitch+SNN_tswitch_cswitch+DSD_tswitch_cswitch+DNN_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)-1/7*(SSS_tstay_cswitch+SDD_tstay_cswitch+SNN_tstay_cswitch+DSD_tstay_cswitch+DNN_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)",
    ),
    (
        "(SDD_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay+SDD_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch+SDD_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)-(SNN_tstay_cstay+DNN_tstay_cstay+SNN_tstay_cswitch+DNN_tstay_cswitch+SNN_tswitch_cswitch+DNN_tswitch_cswitch)",
        "1/9*(SDD_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay+SDD_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch+SDD_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)-1/6*(SNN_tstay_cstay+DNN_tstay_cstay+SNN_tstay_cswitch+DNN_tstay_cswitch+SNN_tswitch_cswitch+DNN_tswitch_cswitch)",
    ),
    (
        "((SDD_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)-(SDD_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay))-((SNN_tstay_cswitch+DNN_tstay_cswitch)-(SNN_tstay_cstay+DNN_tstay_cstay))",
        "1/3*(SDD_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)-1/3*(SDD_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay)-1/2*(SNN_tstay_cswitch+DNN_tstay_cswitch)+1/2*(SNN_tstay_cstay+DNN_tstay_cstay)",
    ),
    (
        "((SDD_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)-(SDD_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch))-((SNN_tswitch_cswitch+DNN_tswitch_cswitch)-(SNN_tstay_cswitch+DNN_tstay_cswitch))",
        "1/3*(SDD_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)-1/3*(SDD_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch)-1/2*(SNN_tswitch_cswitch+DNN_tswitch_cswitch)+1/2*(SNN_tstay_cswitch+DNN_tstay_cswitch)",
    ),
    (
        "task-baseline",
        "1/21*(SSS_tstay_cstay+SDD_tstay_cstay+SNN_tstay_cstay+DSD_tstay_cstay+DNN_tstay_cstay+DDD_tstay_cstay+DDS_tstay_cstay+SSS_tstay_cswitch+SDD_tstay_cswitch+SNN_tstay_cswitch+DSD_tstay_cswitch+DNN_tstay_cswitch+DDD_tstay_cswitch+DDS_tstay_cswitch+SSS_tswitch_cswitch+SDD_tswitch_cswitch+SNN_tswitch_cswitch+DSD_tswitch_cswitch+DNN_tswitch_cswitch+DDD_tswitch_cswitch+DDS_tswitch_cswitch)",
    ),
];
