use std::path::PathBuf;

use taskglm_model::glm::NoiseModel;

use crate::{model::pipeline_config::PipelineConfig, util::read_json_file};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Pipeline settings JSON file; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Contrast left out of fixed effects (repeatable, replaces the configured list)
    #[arg(long = "exclude-contrast")]
    exclude_contrasts: Vec<String>,
}

impl ConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<PipelineConfig> {
        let config = self.read()?;
        config.validate()?;
        Ok(config)
    }

    fn read(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => read_json_file("pipeline config", path)?,
            None => PipelineConfig::default(),
        };
        if !self.exclude_contrasts.is_empty() {
            config
                .fixed_effects_exclusions
                .clone_from(&self.exclude_contrasts);
        }
        Ok(config)
    }
}

/// Pipeline settings: a config file plus flags overriding single fields.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PipelineArgs {
    #[clap(flatten)]
    file: ConfigArg,
    /// Repetition time in seconds
    #[arg(long)]
    tr: Option<f64>,
    /// Smoothing FWHM in millimetres (0 disables smoothing)
    #[arg(long)]
    smoothing_fwhm: Option<f64>,
    /// Noise model: ols or ar1
    #[arg(long)]
    noise_model: Option<NoiseModel>,
    /// Fit raw BOLD values instead of percent signal change
    #[arg(long)]
    no_signal_scaling: bool,
    /// Leave the break_period regressor out of every design
    #[arg(long)]
    no_break_period: bool,
    /// HRF oversampling factor relative to the TR
    #[arg(long)]
    hrf_oversampling: Option<usize>,
}

impl PipelineArgs {
    pub(crate) fn load(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = self.file.read()?;
        if let Some(tr) = self.tr {
            config.tr = tr;
        }
        if let Some(fwhm) = self.smoothing_fwhm {
            config.smoothing_fwhm = fwhm;
        }
        if let Some(noise_model) = self.noise_model {
            config.noise_model = noise_model;
        }
        if self.no_signal_scaling {
            config.signal_scaling = false;
        }
        if self.no_break_period {
            config.model_break_period = false;
        }
        if let Some(oversampling) = self.hrf_oversampling {
            config.hrf_oversampling = oversampling;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        pipeline: PipelineArgs,
    }

    fn load(args: &[&str]) -> anyhow::Result<PipelineConfig> {
        let cli = Cli::try_parse_from(std::iter::once("taskglm").chain(args.iter().copied()))?;
        cli.pipeline.load()
    }

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(load(&[]).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{ "tr": 2.0, "smoothing_fwhm": 6.0 }"#).unwrap();
        let path = path.to_str().unwrap();

        let config = load(&[
            "--config",
            path,
            "--smoothing-fwhm",
            "0",
            "--noise-model",
            "ols",
            "--no-break-period",
            "--exclude-contrast",
            "task-baseline",
            "--exclude-contrast",
            "response_time",
        ])
        .unwrap();
        assert_eq!(config.tr, 2.0);
        assert_eq!(config.smoothing_fwhm, 0.0);
        assert_eq!(config.noise_model, NoiseModel::Ols);
        assert!(!config.model_break_period);
        assert!(config.signal_scaling);
        assert_eq!(config.fixed_effects_exclusions, ["task-baseline", "response_time"]);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(load(&["--tr", "-1.49"]).is_err());
        assert!(load(&["--noise-model", "ar2"]).is_err());
        assert!(load(&["--hrf-oversampling", "0"]).is_err());
    }
}
