use std::fmt::Write as _;

use approx::assert_abs_diff_eq;
use ndarray::{Array3, Array4};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use taskglm_design::{
    confounds::ConfoundFrame,
    contrast::{Contrast, ContrastFormula},
    design_matrix::DesignMatrix,
    hrf::DEFAULT_OVERSAMPLING,
    regressor::{RegressorBuilder, RegressorSpec},
};
use taskglm_events::{filter::Filter, table::EventTable};
use taskglm_model::{
    collinearity::VifReport,
    fixed_effects,
    glm::{FirstLevelModel, NoiseModel},
    volume::{BoldSeries, Mask},
};

const N_SCANS: usize = 200;
const TR: f64 = 1.49;
const GO_EFFECT: f64 = 4.0;
const STOP_EFFECT: f64 = 6.0;
const SHAPE: (usize, usize, usize) = (4, 4, 3);

fn events() -> EventTable {
    let mut tsv = String::from(
        "onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\tresponse_time\n",
    );
    for i in 0..45_u32 {
        let onset = 4.0 + 6.3 * f64::from(i);
        let (trial_type, key_press, rt) = if i % 3 == 1 {
            ("stop", "-1", "n/a")
        } else {
            ("go", "37", "0.52")
        };
        writeln!(tsv, "{onset}\t1.0\ttest_trial\t{trial_type}\t{key_press}\t37\t{rt}").unwrap();
    }
    EventTable::from_tsv_reader(tsv.as_bytes()).unwrap()
}

fn design() -> DesignMatrix {
    let events = events();
    let specs = ["go", "stop"]
        .map(|label| RegressorSpec::new(label, "duration", "duration", Filter::eq("trial_type", label)));
    let builder = RegressorBuilder::new(N_SCANS, TR, DEFAULT_OVERSAMPLING).unwrap();
    let regressors = builder
        .build_all(&events, &specs)
        .unwrap()
        .into_iter()
        .map(|(regressor, _)| regressor)
        .collect::<Vec<_>>();
    let confounds = ConfoundFrame {
        names: Vec::new(),
        columns: Vec::new(),
        n_rows: N_SCANS,
    };
    DesignMatrix::assemble(&regressors, &confounds, N_SCANS).unwrap()
}

fn synthetic_bold(design: &DesignMatrix, seed: u64) -> BoldSeries {
    let go = design.column("go").unwrap();
    let stop = design.column("stop").unwrap();
    let noise = Normal::new(0.0, 0.1).unwrap();
    let mut rng = Pcg64::seed_from_u64(seed);
    let (x, y, z) = SHAPE;
    let mut data = Array4::zeros((x, y, z, N_SCANS));
    for ((_, _, _, t), value) in data.indexed_iter_mut() {
        *value = 100.0 + GO_EFFECT * go[t] + STOP_EFFECT * stop[t] + noise.sample(&mut rng);
    }
    BoldSeries::new(data, [3.0, 3.0, 3.0])
}

fn mask() -> Mask {
    let mut voxels = Array3::from_elem(SHAPE, true);
    voxels[[0, 0, 0]] = false;
    Mask::from_voxels(voxels)
}

fn model() -> FirstLevelModel {
    FirstLevelModel {
        smoothing_fwhm: Some(5.0),
        signal_scaling: false,
        noise_model: NoiseModel::Ar1,
    }
}

#[test]
fn test_recovers_known_coefficients() {
    let design = design();
    assert_eq!(design.names(), ["go", "stop", "constant"]);

    let mask = mask();
    let fitted = model().fit(&design, synthetic_bold(&design, 1), &mask).unwrap();
    assert_eq!(fitted.n_voxels(), mask.n_voxels());
    for (column, expected) in [("go", GO_EFFECT), ("stop", STOP_EFFECT), ("constant", 100.0)] {
        let values = fitted.coefficients(column).unwrap();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert_abs_diff_eq!(mean, expected, epsilon = 0.15);
    }

    let estimate = fitted
        .evaluate(&ContrastFormula::parse("stop-go").unwrap())
        .unwrap();
    let maps = estimate.to_maps(&mask);
    assert_eq!(maps.effect_size[[0, 0, 0]], 0.0);
    assert_eq!(maps.z_score[[0, 0, 0]], 0.0);
    for (effect, z) in estimate.effect_size.iter().zip(&estimate.z_score) {
        assert_abs_diff_eq!(*effect, STOP_EFFECT - GO_EFFECT, epsilon = 0.6);
        assert!(*z > 3.0, "z = {z}");
    }
}

#[test]
fn test_fixed_effects_across_sessions() {
    let design = design();
    let mask = mask();
    let formula = ContrastFormula::parse("stop-go").unwrap();
    let sessions = [11, 12]
        .map(|seed| {
            model()
                .fit(&design, synthetic_bold(&design, seed), &mask)
                .unwrap()
                .evaluate(&formula)
                .unwrap()
                .to_maps(&mask)
        });
    let combined = fixed_effects::combine(
        &sessions.clone().map(|maps| maps.effect_size),
        &sessions.clone().map(|maps| maps.variance),
        &sessions.clone().map(|maps| maps.z_score),
    )
    .unwrap();

    let index = [2, 1, 1];
    assert_abs_diff_eq!(combined.effect_size[index], STOP_EFFECT - GO_EFFECT, epsilon = 0.6);
    for session in &sessions {
        assert!(combined.variance[index] < session.variance[index]);
    }
    assert_eq!(combined.effect_size[[0, 0, 0]], 0.0);
}

#[test]
fn test_design_contrasts_have_finite_vif() {
    let design = design();
    let contrasts = [
        Contrast::new("stop-go", "stop-go").unwrap(),
        Contrast::new("task-baseline", "1/2*go+1/2*stop").unwrap(),
    ];
    let report = VifReport::compute(&design, &contrasts).unwrap();
    for (name, vif) in report.entries() {
        assert!(vif.is_finite() && *vif >= 1.0, "{name}: {vif}");
    }
}
