use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{model::pipeline_config::PipelineConfig, util::Output};

/// Summary of one (subject, task) unit, written next to its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub subject: String,
    pub task: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config: PipelineConfig,
    /// Subject-level mean response time used for centering.
    pub mean_rt: Option<f64>,
    pub sessions: Vec<SessionSummary>,
    pub fixed_effects: Vec<FixedEffectsSummary>,
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session: String,
    pub n_scans: usize,
    pub n_events: usize,
    pub n_junk_trials: usize,
    pub n_confounds: usize,
    pub design_columns: Vec<String>,
    pub contrasts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedEffectsSummary {
    pub contrast: String,
    pub n_sessions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Discovery,
    MeanRt,
    Session,
    FixedEffects,
    Manifest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub stage: Stage,
    pub session: Option<String>,
    pub contrast: Option<String>,
    pub message: String,
}

impl RunManifest {
    pub fn new(subject: &str, task: &str, config: &PipelineConfig) -> Self {
        Self {
            subject: subject.to_owned(),
            task: task.to_owned(),
            started_at: Utc::now(),
            finished_at: None,
            config: config.clone(),
            mean_rt: None,
            sessions: Vec::new(),
            fixed_effects: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Logs `err` with the unit identifiers and keeps it in the manifest.
    pub fn record_failure(
        &mut self,
        stage: Stage,
        session: Option<&str>,
        contrast: Option<&str>,
        err: &anyhow::Error,
    ) {
        let message = format!("{err:#}");
        error!(
            subject = %self.subject,
            task = %self.task,
            session = session.unwrap_or("-"),
            contrast = contrast.unwrap_or("-"),
            ?stage,
            "{message}"
        );
        self.failures.push(Failure {
            stage,
            session: session.map(str::to_owned),
            contrast: contrast.map(str::to_owned),
            message,
        });
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        Output::save_json(self, Some(path.to_owned()))
    }
}
