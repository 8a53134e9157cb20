use std::path::PathBuf;

use anyhow::bail;
use taskglm_tasks::registry::TaskRegistry;
use tracing::{error, info};

use crate::{command::pipeline_args::ConfigArg, layout::UnitLayout, pipeline};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FixedEffectsArg {
    /// Directory holding the `<subject>/<task>/indiv_contrasts/` maps
    #[arg(long, default_value = "output_lev1")]
    output_dir: PathBuf,
    /// Subject to combine (repeatable)
    #[arg(long = "subject", required = true)]
    subjects: Vec<String>,
    /// Task to combine (repeatable); every registered task when omitted
    #[arg(long = "task")]
    tasks: Vec<String>,
    #[clap(flatten)]
    config: ConfigArg,
}

pub(crate) fn run(arg: &FixedEffectsArg) -> anyhow::Result<()> {
    let FixedEffectsArg {
        output_dir,
        subjects,
        tasks,
        config,
    } = arg;
    let config = config.load()?;
    let registry = TaskRegistry::builtin(config.model_break_period)?;
    let tasks = pipeline::select_tasks(&registry, tasks)?;

    let mut n_combined = 0;
    let mut failed = Vec::new();
    for subject in subjects {
        for task in &tasks {
            let layout = UnitLayout::new(output_dir, subject, &task.id);
            for contrast in task.contrast_names().filter(|c| config.combines(c)) {
                match pipeline::combine_contrast(&layout, contrast) {
                    Ok(_) => n_combined += 1,
                    Err(err) => {
                        error!(subject, task = %task.id, contrast, "{err:#}");
                        failed.push(format!("{subject} task-{} {contrast}", task.id));
                    }
                }
            }
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} contrasts failed to combine: {}",
            failed.len(),
            failed.join(", ")
        );
    }
    info!(n_combined, "fixed effects finished");
    Ok(())
}
