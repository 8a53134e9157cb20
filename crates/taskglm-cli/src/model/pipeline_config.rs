use anyhow::ensure;
use serde::{Deserialize, Serialize};
use taskglm_design::hrf::DEFAULT_OVERSAMPLING;
use taskglm_model::glm::{FirstLevelModel, NoiseModel};
use taskglm_tasks::config::TASK_BASELINE;

pub const DEFAULT_TR: f64 = 1.49;
pub const DEFAULT_SMOOTHING_FWHM: f64 = 5.0;

/// Settings shared by every unit of a run.
///
/// Missing fields of a JSON file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Repetition time in seconds.
    pub tr: f64,
    /// Gaussian smoothing FWHM in millimetres; zero disables smoothing.
    pub smoothing_fwhm: f64,
    pub noise_model: NoiseModel,
    pub signal_scaling: bool,
    pub model_break_period: bool,
    /// Contrasts left out of the fixed-effects combination.
    pub fixed_effects_exclusions: Vec<String>,
    pub hrf_oversampling: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tr: DEFAULT_TR,
            smoothing_fwhm: DEFAULT_SMOOTHING_FWHM,
            noise_model: NoiseModel::Ar1,
            signal_scaling: true,
            model_break_period: true,
            fixed_effects_exclusions: vec![TASK_BASELINE.to_owned()],
            hrf_oversampling: DEFAULT_OVERSAMPLING,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.tr.is_finite() && self.tr > 0.0,
            "tr must be a positive number of seconds, got {}",
            self.tr
        );
        ensure!(
            self.smoothing_fwhm.is_finite() && self.smoothing_fwhm >= 0.0,
            "smoothing_fwhm must be zero or positive, got {}",
            self.smoothing_fwhm
        );
        ensure!(self.hrf_oversampling > 0, "hrf_oversampling must be positive");
        Ok(())
    }

    #[must_use]
    pub fn model(&self) -> FirstLevelModel {
        FirstLevelModel {
            smoothing_fwhm: (self.smoothing_fwhm > 0.0).then_some(self.smoothing_fwhm),
            signal_scaling: self.signal_scaling,
            noise_model: self.noise_model,
        }
    }

    /// Whether `contrast` takes part in the fixed-effects combination.
    #[must_use]
    pub fn combines(&self, contrast: &str) -> bool {
        !self.fixed_effects_exclusions.iter().any(|c| c == contrast)
    }
}
