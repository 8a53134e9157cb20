use std::path::PathBuf;

use anyhow::bail;
use rayon::prelude::*;
use taskglm_tasks::registry::TaskRegistry;
use tracing::info;

use crate::{command::pipeline_args::PipelineArgs, pipeline};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FirstLevelArg {
    /// Directory holding `<subject>/ses-*/func/` inputs
    #[arg(long)]
    data_dir: PathBuf,
    /// Directory receiving `<subject>/<task>/` outputs
    #[arg(long, default_value = "output_lev1")]
    output_dir: PathBuf,
    /// Subject to process (repeatable)
    #[arg(long = "subject", required = true)]
    subjects: Vec<String>,
    /// Task to process (repeatable); every registered task when omitted
    #[arg(long = "task")]
    tasks: Vec<String>,
    #[clap(flatten)]
    pipeline: PipelineArgs,
}

pub(crate) fn run(arg: &FirstLevelArg) -> anyhow::Result<()> {
    let FirstLevelArg {
        data_dir,
        output_dir,
        subjects,
        tasks,
        pipeline: pipeline_args,
    } = arg;
    let config = pipeline_args.load()?;
    let registry = TaskRegistry::builtin(config.model_break_period)?;
    let tasks = pipeline::select_tasks(&registry, tasks)?;

    let units = subjects
        .iter()
        .flat_map(|subject| tasks.iter().map(move |task| (subject.as_str(), *task)))
        .collect::<Vec<_>>();
    info!(
        n_units = units.len(),
        data_dir = %data_dir.display(),
        output_dir = %output_dir.display(),
        "starting first-level batch"
    );

    let manifests = units
        .into_par_iter()
        .map(|(subject, task)| {
            pipeline::Unit::new(output_dir, subject, task, &config).run(data_dir)
        })
        .collect::<Vec<_>>();

    let failed = manifests
        .iter()
        .filter(|manifest| !manifest.is_success())
        .map(|manifest| format!("{} task-{}", manifest.subject, manifest.task))
        .collect::<Vec<_>>();
    if !failed.is_empty() {
        bail!(
            "{} of {} units failed: {}",
            failed.len(),
            manifests.len(),
            failed.join(", ")
        );
    }
    info!(n_units = manifests.len(), "first-level batch finished");
    Ok(())
}
