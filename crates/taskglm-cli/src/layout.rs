//! Where session inputs are found and where unit outputs are written.
//!
//! Inputs live under `<data_dir>/<subject>/ses-*/func/`; every file whose
//! name contains `task-<task>_` is classified by its suffix and each session
//! must provide all four kinds. Outputs of one (subject, task) unit live
//! under `<output_dir>/<subject>/<task>/`.

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};

const SESSION_PREFIX: &str = "ses-";
const RT_MODEL: &str = "rtmodel-rt_centered";

const INDIV_CONTRASTS_DIR: &str = "indiv_contrasts";
const FIXED_EFFECTS_DIR: &str = "fixed_effects";
const QUALITY_CONTROL_DIR: &str = "quality_control";
const SIMPLIFIED_EVENTS_DIR: &str = "simplified_events";
const MANIFEST_FILE: &str = "run_manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SessionFileKind {
    Events,
    Confounds,
    Bold,
    Mask,
}

impl SessionFileKind {
    const ALL: [Self; 4] = [Self::Events, Self::Confounds, Self::Bold, Self::Mask];

    fn suffix(self) -> &'static str {
        match self {
            Self::Events => "events.tsv",
            Self::Confounds => "desc-confounds_timeseries.tsv",
            Self::Bold => "T1w_desc-optcom_bold.nii.gz",
            Self::Mask => "T1w_desc-brain_mask.nii.gz",
        }
    }

    fn classify(file_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| file_name.ends_with(kind.suffix()))
    }
}

/// The four input files of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFiles {
    pub session: String,
    pub events: PathBuf,
    pub confounds: PathBuf,
    pub bold: PathBuf,
    pub mask: PathBuf,
}

/// Finds every session of `subject` that has files for `task`, in session
/// name order.
pub fn discover_sessions(
    data_dir: &Path,
    subject: &str,
    task: &str,
) -> anyhow::Result<Vec<SessionFiles>> {
    let subject_dir = data_dir.join(subject);
    let task_marker = format!("task-{task}_");

    let mut found = BTreeMap::<String, BTreeMap<SessionFileKind, PathBuf>>::new();
    for session_dir in sorted_entries(&subject_dir)? {
        let Some(session) = file_name(&session_dir) else {
            continue;
        };
        let func_dir = session_dir.join("func");
        if !session.starts_with(SESSION_PREFIX) || !func_dir.is_dir() {
            continue;
        }
        for path in sorted_entries(&func_dir)? {
            let Some(name) = file_name(&path) else {
                continue;
            };
            if !name.contains(&task_marker) {
                continue;
            }
            let Some(kind) = SessionFileKind::classify(name) else {
                continue;
            };
            let files = found.entry(session.to_owned()).or_default();
            if let Some(previous) = files.insert(kind, path.clone()) {
                bail!(
                    "{subject} {session} task-{task}: both {} and {} end in {}",
                    previous.display(),
                    path.display(),
                    kind.suffix()
                );
            }
        }
    }

    found
        .into_iter()
        .map(|(session, mut files)| {
            let mut take = |kind: SessionFileKind| {
                files.remove(&kind).with_context(|| {
                    format!(
                        "{subject} {session} task-{task}: no file ending in {}",
                        kind.suffix()
                    )
                })
            };
            Ok(SessionFiles {
                events: take(SessionFileKind::Events)?,
                confounds: take(SessionFileKind::Confounds)?,
                bold: take(SessionFileKind::Bold)?,
                mask: take(SessionFileKind::Mask)?,
                session,
            })
        })
        .collect()
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(OsStr::to_str)
}

fn sorted_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

/// Statistic stored in one output volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    EffectSize,
    Variance,
    ZScore,
}

impl Stat {
    pub const ALL: [Self; 3] = [Self::EffectSize, Self::Variance, Self::ZScore];

    fn session_label(self) -> &'static str {
        match self {
            Self::EffectSize => "effect-size",
            Self::Variance => "variance",
            Self::ZScore => "z_score",
        }
    }

    fn fixed_effects_label(self) -> &'static str {
        match self {
            Self::EffectSize => "fixed-effects",
            Self::Variance => "fixed-effects-variance",
            Self::ZScore => "fixed-effects-z_score",
        }
    }
}

/// Output paths of one (subject, task) unit.
#[derive(Debug, Clone)]
pub struct UnitLayout {
    subject: String,
    task: String,
    root: PathBuf,
}

impl UnitLayout {
    pub fn new(output_dir: &Path, subject: &str, task: &str) -> Self {
        Self {
            subject: subject.to_owned(),
            task: task.to_owned(),
            root: output_dir.join(subject).join(task),
        }
    }

    pub fn create_dirs(&self) -> anyhow::Result<()> {
        for dir in [
            INDIV_CONTRASTS_DIR,
            FIXED_EFFECTS_DIR,
            QUALITY_CONTROL_DIR,
            SIMPLIFIED_EVENTS_DIR,
        ] {
            let path = self.root.join(dir);
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    pub fn session_map_path(&self, session: &str, contrast: &str, stat: Stat) -> PathBuf {
        let Self { subject, task, .. } = self;
        self.root.join(INDIV_CONTRASTS_DIR).join(format!(
            "{subject}_{session}_task-{task}_contrast-{contrast}_{RT_MODEL}_stat-{}.nii.gz",
            stat.session_label()
        ))
    }

    pub fn fixed_effects_path(&self, contrast: &str, stat: Stat) -> PathBuf {
        let Self { subject, task, .. } = self;
        self.root.join(FIXED_EFFECTS_DIR).join(format!(
            "{subject}_task-{task}_contrast-{contrast}_{RT_MODEL}_stat-{}.nii.gz",
            stat.fixed_effects_label()
        ))
    }

    pub fn vif_path(&self, session: &str) -> PathBuf {
        let Self { subject, task, .. } = self;
        self.root.join(QUALITY_CONTROL_DIR).join(format!(
            "{subject}_{session}_task-{task}_{RT_MODEL}_stat-vif_contrasts.csv"
        ))
    }

    pub fn simplified_events_path(&self, session: &str) -> PathBuf {
        let Self { subject, task, .. } = self;
        self.root
            .join(SIMPLIFIED_EVENTS_DIR)
            .join(format!("{subject}_{session}_task-{task}_simplified_events.csv"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Per-session maps of `contrast` already on disk, in file name order.
    ///
    /// Matches `{subject}_*_task-{task}_contrast-{contrast}_..._stat-{stat}`.
    pub fn find_session_maps(&self, contrast: &str, stat: Stat) -> anyhow::Result<Vec<PathBuf>> {
        let Self { subject, task, .. } = self;
        let prefix = format!("{subject}_");
        let suffix = format!(
            "_task-{task}_contrast-{contrast}_{RT_MODEL}_stat-{}.nii.gz",
            stat.session_label()
        );
        let dir = self.root.join(INDIV_CONTRASTS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        Ok(sorted_entries(&dir)?
            .into_iter()
            .filter(|path| {
                file_name(path).is_some_and(|name| {
                    name.len() > prefix.len() + suffix.len()
                        && name.starts_with(&prefix)
                        && name.ends_with(&suffix)
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    const SUBJECT: &str = "sub-s03";

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    fn session_files(root: &Path, session: &str, task: &str) -> Vec<PathBuf> {
        let func = root.join(SUBJECT).join(session).join("func");
        let stem = format!("{SUBJECT}_{session}_task-{task}_run-1");
        [
            format!("{stem}_events.tsv"),
            format!("{stem}_desc-confounds_timeseries.tsv"),
            format!("{stem}_space-T1w_desc-optcom_bold.nii.gz"),
            format!("{stem}_space-T1w_desc-brain_mask.nii.gz"),
        ]
        .into_iter()
        .map(|name| func.join(name))
        .collect()
    }

    #[test]
    fn test_discovers_complete_sessions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for session in ["ses-02", "ses-01"] {
            for path in session_files(dir.path(), session, "flanker") {
                touch(&path);
            }
        }
        // other tasks and unrelated files are ignored
        for path in session_files(dir.path(), "ses-01", "flankerWShapeMatching") {
            touch(&path);
        }
        touch(&dir.path().join(SUBJECT).join("ses-01/func/notes.txt"));
        touch(&dir.path().join(SUBJECT).join("anat/x_task-flanker_events.tsv"));

        let sessions = discover_sessions(dir.path(), SUBJECT, "flanker").unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session, "ses-01");
        assert_eq!(sessions[1].session, "ses-02");
        let expected = session_files(dir.path(), "ses-01", "flanker");
        assert_eq!(sessions[0].events, expected[0]);
        assert_eq!(sessions[0].confounds, expected[1]);
        assert_eq!(sessions[0].bold, expected[2]);
        assert_eq!(sessions[0].mask, expected[3]);

        assert!(discover_sessions(dir.path(), SUBJECT, "nBack").unwrap().is_empty());
    }

    #[test]
    fn test_incomplete_session_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let files = session_files(dir.path(), "ses-05", "goNogo");
        for path in &files[..3] {
            touch(path);
        }
        let err = discover_sessions(dir.path(), SUBJECT, "goNogo").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ses-05"), "{message}");
        assert!(message.contains("brain_mask"), "{message}");
    }

    #[test]
    fn test_missing_subject_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_sessions(dir.path(), SUBJECT, "flanker").is_err());
    }

    #[test]
    fn test_output_names() {
        let layout = UnitLayout::new(Path::new("/out"), SUBJECT, "stopSignal");
        assert_eq!(
            layout.session_map_path("ses-01", "stop_success-go", Stat::ZScore),
            Path::new(
                "/out/sub-s03/stopSignal/indiv_contrasts/sub-s03_ses-01_task-stopSignal_contrast-stop_success-go_rtmodel-rt_centered_stat-z_score.nii.gz"
            )
        );
        assert_eq!(
            layout.fixed_effects_path("go", Stat::Variance),
            Path::new(
                "/out/sub-s03/stopSignal/fixed_effects/sub-s03_task-stopSignal_contrast-go_rtmodel-rt_centered_stat-fixed-effects-variance.nii.gz"
            )
        );
        assert_eq!(
            layout.vif_path("ses-01"),
            Path::new(
                "/out/sub-s03/stopSignal/quality_control/sub-s03_ses-01_task-stopSignal_rtmodel-rt_centered_stat-vif_contrasts.csv"
            )
        );
        assert_eq!(
            layout.simplified_events_path("ses-01"),
            Path::new(
                "/out/sub-s03/stopSignal/simplified_events/sub-s03_ses-01_task-stopSignal_simplified_events.csv"
            )
        );
        assert_eq!(
            layout.manifest_path(),
            Path::new("/out/sub-s03/stopSignal/run_manifest.json")
        );
    }

    #[test]
    fn test_finds_session_maps_of_one_contrast() {
        let dir = tempfile::tempdir().unwrap();
        let layout = UnitLayout::new(dir.path(), SUBJECT, "stopSignal");
        layout.create_dirs().unwrap();
        for session in ["ses-02", "ses-01"] {
            for stat in Stat::ALL {
                touch(&layout.session_map_path(session, "go", stat));
                touch(&layout.session_map_path(session, "stop_success-go", stat));
            }
        }
        touch(&layout.session_map_path("ses-03", "go", Stat::EffectSize));

        let effects = layout.find_session_maps("go", Stat::EffectSize).unwrap();
        assert_eq!(effects.len(), 3);
        assert_eq!(effects[0], layout.session_map_path("ses-01", "go", Stat::EffectSize));
        assert_eq!(layout.find_session_maps("go", Stat::Variance).unwrap().len(), 2);
        assert_eq!(
            layout
                .find_session_maps("stop_success-go", Stat::ZScore)
                .unwrap()
                .len(),
            2
        );
    }
}
