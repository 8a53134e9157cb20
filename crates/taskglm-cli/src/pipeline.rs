//! Processing of one (subject, task) unit.
//!
//! Every session is fitted in parallel once the subject-level mean response
//! time is known. Fixed effects then combine the maps of exactly those
//! sessions, and are skipped when any session of the unit failed.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use ndarray::Array3;
use rayon::prelude::*;
use taskglm_design::{
    confounds::ConfoundFrame, design_matrix::DesignMatrix, regressor::RegressorBuilder,
    simplified_events::SimplifiedEvents,
};
use taskglm_events::{
    augment::{augment, session_mean_rt, subject_mean_rt},
    nuisance::NuisanceFlags,
    table::EventTable,
};
use taskglm_model::{
    collinearity::VifReport,
    contrast::StatMaps,
    fixed_effects::{self, FixedEffectsError},
};
use taskglm_tasks::{config::TaskConfig, registry::TaskRegistry};
use tracing::{debug, info, warn};

use crate::{
    layout::{SessionFiles, Stat, UnitLayout, discover_sessions},
    model::{
        pipeline_config::PipelineConfig,
        run_manifest::{FixedEffectsSummary, RunManifest, SessionSummary, Stage},
    },
    nifti_io,
};

/// Looks up `ids` in `registry`; every registered task when `ids` is empty.
pub fn select_tasks<'a>(
    registry: &'a TaskRegistry,
    ids: &[String],
) -> anyhow::Result<Vec<&'a TaskConfig>> {
    if ids.is_empty() {
        return Ok(registry.tasks().iter().collect());
    }
    ids.iter()
        .map(|id| registry.get(id).map_err(anyhow::Error::from))
        .collect()
}

/// Design of one session together with the artifacts derived from it.
#[derive(Debug)]
pub struct SessionDesign {
    pub design: DesignMatrix,
    pub simplified_events: SimplifiedEvents,
    pub n_junk_trials: usize,
}

/// Flags nuisance trials, adds the derived event columns and assembles the
/// design matrix of one session.
pub fn build_design(
    task: &TaskConfig,
    config: &PipelineConfig,
    events: &mut EventTable,
    confounds: &ConfoundFrame,
    n_scans: usize,
    mean_rt: f64,
) -> anyhow::Result<SessionDesign> {
    let flags = NuisanceFlags::classify(events, &task.family)
        .context("Failed to classify nuisance trials")?;
    augment(events, &flags, mean_rt).context("Failed to add derived event columns")?;
    confounds.ensure_rows(n_scans)?;

    let builder = RegressorBuilder::new(n_scans, config.tr, config.hrf_oversampling)?;
    let specs = task.design_regressors(config.model_break_period);
    let built = builder
        .build_all(events, &specs)
        .context("Failed to build regressors")?;
    let simplified_events = SimplifiedEvents::build(
        specs
            .iter()
            .zip(&built)
            .map(|(spec, (_, frame))| (spec.name.as_str(), frame)),
    );
    let regressors = built
        .into_iter()
        .map(|(regressor, _)| regressor)
        .collect::<Vec<_>>();
    let design = DesignMatrix::assemble(&regressors, confounds, n_scans)?;
    debug!(
        task = %task.id,
        n_columns = design.names().len(),
        n_scans,
        "assembled design matrix"
    );
    Ok(SessionDesign {
        design,
        simplified_events,
        n_junk_trials: flags.junk_count(),
    })
}

#[derive(Debug)]
struct LoadedSession {
    files: SessionFiles,
    events: EventTable,
}

/// One (subject, task) unit of a batch.
#[derive(Debug)]
pub struct Unit<'a> {
    pub subject: &'a str,
    pub task: &'a TaskConfig,
    pub config: &'a PipelineConfig,
    pub layout: UnitLayout,
}

impl<'a> Unit<'a> {
    pub fn new(
        output_dir: &Path,
        subject: &'a str,
        task: &'a TaskConfig,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            subject,
            task,
            config,
            layout: UnitLayout::new(output_dir, subject, &task.id),
        }
    }

    /// Runs every stage and writes the manifest; failures are recorded in
    /// the returned manifest rather than returned.
    pub fn run(&self, data_dir: &Path) -> RunManifest {
        let mut manifest = RunManifest::new(self.subject, &self.task.id, self.config);
        info!(subject = self.subject, task = %self.task.id, "starting unit");

        match self.load_sessions(data_dir) {
            Err(err) => manifest.record_failure(Stage::Discovery, None, None, &err),
            Ok(sessions) => match self.mean_rt(&sessions) {
                Err(err) => manifest.record_failure(Stage::MeanRt, None, None, &err),
                Ok(mean_rt) => {
                    manifest.mean_rt = Some(mean_rt);
                    let discovered = sessions
                        .iter()
                        .map(|session| session.files.session.clone())
                        .collect::<Vec<_>>();
                    self.fit_sessions(sessions, mean_rt, &mut manifest);
                    let failed = discovered
                        .iter()
                        .filter(|id| !manifest.sessions.iter().any(|s| &s.session == *id))
                        .map(String::as_str)
                        .collect::<Vec<_>>();
                    if failed.is_empty() {
                        self.combine_sessions(&discovered, &mut manifest);
                    } else {
                        let err = anyhow!(
                            "skipped: {} of {} sessions failed ({})",
                            failed.len(),
                            discovered.len(),
                            failed.join(", ")
                        );
                        manifest.record_failure(Stage::FixedEffects, None, None, &err);
                    }
                }
            },
        }

        manifest.finish();
        let path = self.layout.manifest_path();
        if let Err(err) = manifest.save(&path) {
            manifest.record_failure(Stage::Manifest, None, None, &err);
        }
        if manifest.is_success() {
            info!(subject = self.subject, task = %self.task.id, "unit finished");
        }
        manifest
    }

    fn load_sessions(&self, data_dir: &Path) -> anyhow::Result<Vec<LoadedSession>> {
        self.layout.create_dirs()?;
        let sessions = discover_sessions(data_dir, self.subject, &self.task.id)?;
        if sessions.is_empty() {
            bail!(
                "no sessions of task-{} found for {} under {}",
                self.task.id,
                self.subject,
                data_dir.display()
            );
        }
        info!(
            subject = self.subject,
            task = %self.task.id,
            n_sessions = sessions.len(),
            "discovered sessions"
        );
        sessions
            .into_iter()
            .map(|files| {
                let events = EventTable::from_tsv_path(&files.events).with_context(|| {
                    format!("Failed to read events file: {}", files.events.display())
                })?;
                Ok(LoadedSession { files, events })
            })
            .collect()
    }

    fn mean_rt(&self, sessions: &[LoadedSession]) -> anyhow::Result<f64> {
        let mut means = Vec::with_capacity(sessions.len());
        for LoadedSession { files, events } in sessions {
            let mean = session_mean_rt(events, &self.task.rt_centering)
                .with_context(|| format!("{}: response-time centering", files.session))?;
            if mean.is_none() {
                warn!(
                    subject = self.subject,
                    session = %files.session,
                    task = %self.task.id,
                    "no trials qualify for response-time centering"
                );
            }
            means.push(mean);
        }
        let mean_rt = subject_mean_rt(means).with_context(|| {
            format!(
                "no session of {} has trials qualifying for response-time centering",
                self.subject
            )
        })?;
        info!(subject = self.subject, task = %self.task.id, mean_rt, "mean response time");
        Ok(mean_rt)
    }

    fn fit_sessions(&self, sessions: Vec<LoadedSession>, mean_rt: f64, manifest: &mut RunManifest) {
        let results = sessions
            .into_par_iter()
            .map(|session| {
                let id = session.files.session.clone();
                let result = self.fit_session(session, mean_rt);
                (id, result)
            })
            .collect::<Vec<_>>();
        for (session, result) in results {
            match result {
                Ok(summary) => manifest.sessions.push(summary),
                Err(err) => manifest.record_failure(Stage::Session, Some(&session), None, &err),
            }
        }
    }

    fn fit_session(&self, session: LoadedSession, mean_rt: f64) -> anyhow::Result<SessionSummary> {
        let LoadedSession { files, mut events } = session;
        let id = files.session.as_str();
        info!(subject = self.subject, session = id, task = %self.task.id, "fitting session");

        let bold = nifti_io::read_bold(&files.bold)?;
        let n_scans = bold.n_scans();
        let (mask, reference) = nifti_io::read_mask(&files.mask)?;
        let confounds = ConfoundFrame::from_tsv_path(&files.confounds, self.task.confounds)
            .with_context(|| {
                format!("Failed to read confounds file: {}", files.confounds.display())
            })?;

        let SessionDesign {
            design,
            simplified_events,
            n_junk_trials,
        } = build_design(
            self.task,
            self.config,
            &mut events,
            &confounds,
            n_scans,
            mean_rt,
        )?;
        let path = self.layout.simplified_events_path(id);
        simplified_events
            .save_csv(&path)
            .with_context(|| format!("Failed to write simplified events: {}", path.display()))?;

        let fitted = self.config.model().fit(&design, bold, &mask)?;
        for contrast in &self.task.contrasts {
            let maps = fitted
                .evaluate(&contrast.formula)
                .with_context(|| format!("contrast {}", contrast.name))?
                .to_maps(&mask);
            for (stat, volume) in stat_volumes(&maps) {
                let path = self.layout.session_map_path(id, &contrast.name, stat);
                nifti_io::write_volume(&path, volume, &reference)?;
            }
            debug!(session = id, contrast = %contrast.name, "wrote contrast maps");
        }

        let vif = VifReport::compute(&design, &self.task.contrasts)?;
        let path = self.layout.vif_path(id);
        vif.save_csv(&path)
            .with_context(|| format!("Failed to write VIF report: {}", path.display()))?;

        info!(
            subject = self.subject,
            session = id,
            task = %self.task.id,
            n_scans,
            n_junk_trials,
            "session finished"
        );
        Ok(SessionSummary {
            session: files.session.clone(),
            n_scans,
            n_events: events.n_rows(),
            n_junk_trials,
            n_confounds: confounds.names.len(),
            design_columns: design.names().to_vec(),
            contrasts: self.task.contrast_names().map(str::to_owned).collect(),
        })
    }

    /// Fixed effects over `sessions` of every contrast the configuration
    /// does not exclude.
    pub fn combine_sessions(&self, sessions: &[String], manifest: &mut RunManifest) {
        let results = self
            .task
            .contrast_names()
            .filter(|contrast| self.config.combines(contrast))
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|contrast| (contrast, combine_fitted(&self.layout, contrast, sessions)))
            .collect::<Vec<_>>();
        for (contrast, result) in results {
            match result {
                Ok(n_sessions) => manifest.fixed_effects.push(FixedEffectsSummary {
                    contrast: contrast.to_owned(),
                    n_sessions,
                }),
                Err(err) => {
                    manifest.record_failure(Stage::FixedEffects, None, Some(contrast), &err);
                }
            }
        }
    }
}

fn stat_volumes(maps: &StatMaps) -> [(Stat, &Array3<f64>); 3] {
    [
        (Stat::EffectSize, &maps.effect_size),
        (Stat::Variance, &maps.variance),
        (Stat::ZScore, &maps.z_score),
    ]
}

/// Combines the per-session maps of `contrast` found under `layout` and
/// writes the fixed-effects maps; returns the number of sessions combined.
pub fn combine_contrast(layout: &UnitLayout, contrast: &str) -> anyhow::Result<usize> {
    let effects = layout.find_session_maps(contrast, Stat::EffectSize)?;
    let variances = layout.find_session_maps(contrast, Stat::Variance)?;
    let z_scores = layout.find_session_maps(contrast, Stat::ZScore)?;
    combine_maps(layout, contrast, &effects, &variances, &z_scores)
}

/// Combines exactly the maps of `sessions`.
///
/// A missing map, or a map of `contrast` from any other session, is an
/// error, so leftovers of an earlier run never enter the combination.
pub fn combine_fitted(
    layout: &UnitLayout,
    contrast: &str,
    sessions: &[String],
) -> anyhow::Result<usize> {
    let mut maps = Vec::with_capacity(Stat::ALL.len());
    for stat in Stat::ALL {
        let expected = sessions
            .iter()
            .map(|session| layout.session_map_path(session, contrast, stat))
            .collect::<Vec<_>>();
        let found = layout.find_session_maps(contrast, stat)?;
        if let Some(stale) = found.iter().find(|path| !expected.contains(*path)) {
            bail!("unexpected map not produced by this run: {}", stale.display());
        }
        if let Some(missing) = expected.iter().find(|path| !found.contains(*path)) {
            bail!("missing map: {}", missing.display());
        }
        maps.push(expected);
    }
    combine_maps(layout, contrast, &maps[0], &maps[1], &maps[2])
}

fn combine_maps(
    layout: &UnitLayout,
    contrast: &str,
    effects: &[PathBuf],
    variances: &[PathBuf],
    z_scores: &[PathBuf],
) -> anyhow::Result<usize> {
    if effects.len() != variances.len() || effects.len() != z_scores.len() {
        return Err(FixedEffectsError::CountMismatch {
            effects: effects.len(),
            variances: variances.len(),
            z_scores: z_scores.len(),
        }
        .into());
    }
    let Some(first) = effects.first() else {
        return Err(FixedEffectsError::NoSessions.into());
    };

    let (_, reference) = nifti_io::read_volume(first)?;
    let read_all = |paths: &[PathBuf]| {
        paths
            .iter()
            .map(|path| nifti_io::read_volume(path).map(|(volume, _)| volume))
            .collect::<anyhow::Result<Vec<_>>>()
    };
    let maps = fixed_effects::combine(
        &read_all(effects)?,
        &read_all(variances)?,
        &read_all(z_scores)?,
    )?;
    for (stat, volume) in stat_volumes(&maps) {
        nifti_io::write_volume(&layout.fixed_effects_path(contrast, stat), volume, &reference)?;
    }
    info!(contrast, n_sessions = effects.len(), "wrote fixed effects");
    Ok(effects.len())
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use approx::assert_relative_eq;
    use nifti::{NiftiHeader, writer::WriterOptions};
    use taskglm_design::confounds::ConfoundPolicy;
    use taskglm_model::glm::NoiseModel;

    use super::*;

    const N_SCANS: usize = 60;

    fn flanker_tsv() -> String {
        let mut tsv = String::from(
            "onset\tduration\ttrial_id\ttrial_type\tkey_press\tcorrect_response\tresponse_time\n",
        );
        for i in 0..20_u32 {
            let onset = 2.0 + 4.0 * f64::from(i);
            let trial_type = if i % 2 == 0 { "congruent" } else { "incongruent" };
            let (key, rt) = match i {
                3 => ("-1", "n/a".to_owned()),
                7 => ("40", "0.7".to_owned()),
                _ => ("37", format!("{:.2}", 0.5 + 0.01 * f64::from(i))),
            };
            writeln!(tsv, "{onset}\t1.0\ttest_trial\t{trial_type}\t{key}\t37\t{rt}").unwrap();
        }
        tsv
    }

    fn flanker_events() -> EventTable {
        EventTable::from_tsv_reader(flanker_tsv().as_bytes()).unwrap()
    }

    fn confounds_tsv(n_rows: usize) -> String {
        let mut tsv = String::from("cosine00\ttrans_x\tcsf\n");
        for t in 0..n_rows {
            writeln!(tsv, "{}\t{}\t5.0", (t as f64 * 0.1).cos(), 0.01 * (t % 3) as f64).unwrap();
        }
        tsv
    }

    fn confounds(n_rows: usize) -> ConfoundFrame {
        ConfoundFrame::from_tsv_reader(confounds_tsv(n_rows).as_bytes(), ConfoundPolicy::AllCosines)
            .unwrap()
    }

    /// Writes the four input files of one flanker session under `data_dir`.
    fn write_session(data_dir: &Path, session: &str, n_confound_rows: usize) {
        let func = data_dir.join("sub-s03").join(session).join("func");
        std::fs::create_dir_all(&func).unwrap();
        let stem = func.join(format!("sub-s03_{session}_task-flanker_run-1"));
        let path = |suffix: &str| PathBuf::from(format!("{}_{suffix}", stem.display()));

        std::fs::write(path("events.tsv"), flanker_tsv()).unwrap();
        std::fs::write(
            path("desc-confounds_timeseries.tsv"),
            confounds_tsv(n_confound_rows),
        )
        .unwrap();
        let header = NiftiHeader {
            pixdim: [1.0, 2.0, 2.0, 2.0, 1.49, 1.0, 1.0, 1.0],
            ..NiftiHeader::default()
        };
        let bold = ndarray::Array4::from_shape_fn((3, 3, 3, N_SCANS), |(x, y, z, t)| {
            100.0 + (x + 2 * y + 3 * z) as f64 + ((t * (x + y + z + 1)) as f64 * 0.7).sin()
        });
        WriterOptions::new(path("space-T1w_desc-optcom_bold.nii.gz"))
            .reference_header(&header)
            .write_nifti(&bold)
            .unwrap();
        nifti_io::write_volume(
            &path("space-T1w_desc-brain_mask.nii.gz"),
            &Array3::from_elem((3, 3, 3), 1.0),
            &header,
        )
        .unwrap();
    }

    #[test]
    fn test_design_of_a_flanker_session() {
        let registry = TaskRegistry::builtin(true).unwrap();
        let task = registry.get("flanker").unwrap();
        let config = PipelineConfig::default();
        let mut events = flanker_events();

        let session = build_design(
            task,
            &config,
            &mut events,
            &confounds(N_SCANS),
            N_SCANS,
            0.6,
        )
        .unwrap();
        // one omission and one commission
        assert_eq!(session.n_junk_trials, 2);
        let names = session.design.names();
        assert_eq!(names.last().map(String::as_str), Some("constant"));
        assert!(names.iter().any(|name| name == "break_period"));
        assert!(names.iter().any(|name| name == "cosine00"));
        assert!(!names.iter().any(|name| name == "csf"));
        assert_eq!(session.design.n_scans(), N_SCANS);

        let rt = events.numeric("response_time_centered").unwrap();
        assert_relative_eq!(rt[0], 0.5 - 0.6, epsilon = 1e-12);
        assert!(session.simplified_events.columns()[0] == "onset");

        let report = VifReport::compute(&session.design, &task.contrasts).unwrap();
        assert_eq!(report.entries().len(), task.contrasts.len());
    }

    #[test]
    fn test_design_rejects_confound_row_mismatch() {
        let registry = TaskRegistry::builtin(true).unwrap();
        let task = registry.get("flanker").unwrap();
        let mut events = flanker_events();
        let result = build_design(
            task,
            &PipelineConfig::default(),
            &mut events,
            &confounds(N_SCANS - 1),
            N_SCANS,
            0.6,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_select_tasks() {
        let registry = TaskRegistry::builtin(true).unwrap();
        assert_eq!(select_tasks(&registry, &[]).unwrap().len(), registry.tasks().len());
        let selected = select_tasks(&registry, &["nBack".to_owned()]).unwrap();
        assert_eq!(selected[0].id, "nBack");
        assert!(select_tasks(&registry, &["stroop".to_owned()]).is_err());
    }

    #[test]
    fn test_combine_contrast_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let layout = UnitLayout::new(dir.path(), "sub-s03", "flanker");
        layout.create_dirs().unwrap();
        let header = NiftiHeader::default();
        let filled = |value: f64| Array3::from_elem((2, 2, 2), value);
        for session in ["ses-01", "ses-02"] {
            for (stat, value) in [(Stat::EffectSize, 0.8), (Stat::Variance, 2.0), (Stat::ZScore, 0.5)] {
                let path = layout.session_map_path(session, "incongruent-congruent", stat);
                nifti_io::write_volume(&path, &filled(value), &header).unwrap();
            }
        }

        let n = combine_contrast(&layout, "incongruent-congruent").unwrap();
        assert_eq!(n, 2);
        let (variance, _) =
            nifti_io::read_volume(&layout.fixed_effects_path("incongruent-congruent", Stat::Variance))
                .unwrap();
        assert_relative_eq!(variance[[1, 1, 1]], 1.0);
        let (effect, _) = nifti_io::read_volume(
            &layout.fixed_effects_path("incongruent-congruent", Stat::EffectSize),
        )
        .unwrap();
        assert_relative_eq!(effect[[0, 1, 0]], 0.8);

        let sessions = ["ses-01".to_owned(), "ses-02".to_owned()];
        assert_eq!(combine_fitted(&layout, "incongruent-congruent", &sessions).unwrap(), 2);
        // maps of a session not fitted in this run are never mixed in
        let err = combine_fitted(&layout, "incongruent-congruent", &sessions[..1]).unwrap_err();
        assert!(err.to_string().contains("sub-s03_ses-02_task-flanker"), "{err}");
        let with_missing = ["ses-01".to_owned(), "ses-02".to_owned(), "ses-04".to_owned()];
        let err = combine_fitted(&layout, "incongruent-congruent", &with_missing).unwrap_err();
        assert!(err.to_string().starts_with("missing map"), "{err}");

        // a session missing its z map is a count mismatch
        let path = layout.session_map_path("ses-03", "incongruent-congruent", Stat::EffectSize);
        nifti_io::write_volume(&path, &filled(1.0), &header).unwrap();
        let path = layout.session_map_path("ses-03", "incongruent-congruent", Stat::Variance);
        nifti_io::write_volume(&path, &filled(1.0), &header).unwrap();
        let err = combine_contrast(&layout, "incongruent-congruent").unwrap_err();
        assert_eq!(err.to_string(), "found 3 effect-size, 3 variance and 2 z-score maps");

        assert!(combine_contrast(&layout, "response_time").is_err());
    }

    #[test]
    fn test_failed_session_skips_fixed_effects() {
        let data_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        write_session(data_dir.path(), "ses-01", N_SCANS);
        write_session(data_dir.path(), "ses-02", N_SCANS - 5);

        let registry = TaskRegistry::builtin(true).unwrap();
        let task = registry.get("flanker").unwrap();
        let config = PipelineConfig {
            smoothing_fwhm: 0.0,
            noise_model: NoiseModel::Ols,
            ..PipelineConfig::default()
        };
        let unit = Unit::new(output_dir.path(), "sub-s03", task, &config);
        let manifest = unit.run(data_dir.path());

        assert!(!manifest.is_success());
        let fitted = manifest.sessions.iter().map(|s| s.session.as_str()).collect::<Vec<_>>();
        assert_eq!(fitted, ["ses-01"]);
        let stages = manifest
            .failures
            .iter()
            .map(|failure| (failure.stage, failure.session.as_deref()))
            .collect::<Vec<_>>();
        assert_eq!(
            stages,
            [(Stage::Session, Some("ses-02")), (Stage::FixedEffects, None)]
        );
        assert!(manifest.failures[1].message.contains("ses-02"));
        assert!(manifest.fixed_effects.is_empty());

        for contrast in task.contrast_names() {
            assert!(
                unit.layout
                    .session_map_path("ses-01", contrast, Stat::EffectSize)
                    .is_file()
            );
            for stat in Stat::ALL {
                assert!(!unit.layout.fixed_effects_path(contrast, stat).exists());
            }
        }
        assert!(unit.layout.manifest_path().is_file());
    }
}
