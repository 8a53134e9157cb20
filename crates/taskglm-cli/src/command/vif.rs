use std::path::PathBuf;

use anyhow::Context;
use taskglm_design::confounds::ConfoundFrame;
use taskglm_events::{augment::session_mean_rt, table::EventTable};
use taskglm_model::collinearity::VifReport;
use taskglm_tasks::registry::TaskRegistry;
use tracing::info;

use crate::{command::pipeline_args::PipelineArgs, nifti_io, pipeline, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct VifArg {
    /// Events TSV of the session
    #[arg(long)]
    events: PathBuf,
    /// Confounds TSV of the session
    #[arg(long)]
    confounds: PathBuf,
    /// Task whose regressors and contrasts are used
    #[arg(long)]
    task: String,
    /// Number of scans in the run
    #[arg(long, required_unless_present = "bold")]
    n_scans: Option<usize>,
    /// BOLD image whose header gives the number of scans
    #[arg(long, conflicts_with = "n_scans")]
    bold: Option<PathBuf>,
    /// Response time used for centering; the session mean when omitted
    #[arg(long)]
    mean_rt: Option<f64>,
    /// Output CSV path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the simplified events CSV to this path
    #[arg(long)]
    simplified_events: Option<PathBuf>,
    #[clap(flatten)]
    pipeline: PipelineArgs,
}

pub(crate) fn run(arg: &VifArg) -> anyhow::Result<()> {
    let config = arg.pipeline.load()?;
    let registry = TaskRegistry::builtin(config.model_break_period)?;
    let task = registry.get(&arg.task)?;

    let n_scans = match (arg.n_scans, &arg.bold) {
        (Some(n_scans), _) => n_scans,
        (None, Some(bold)) => nifti_io::scan_count(bold)?,
        (None, None) => anyhow::bail!("either --n-scans or --bold is required"),
    };
    let mut events = EventTable::from_tsv_path(&arg.events)
        .with_context(|| format!("Failed to read events file: {}", arg.events.display()))?;
    let mean_rt = match arg.mean_rt {
        Some(mean_rt) => mean_rt,
        None => session_mean_rt(&events, &task.rt_centering)?
            .context("no trials qualify for response-time centering; pass --mean-rt")?,
    };
    let confounds = ConfoundFrame::from_tsv_path(&arg.confounds, task.confounds)
        .with_context(|| format!("Failed to read confounds file: {}", arg.confounds.display()))?;

    let session = pipeline::build_design(task, &config, &mut events, &confounds, n_scans, mean_rt)?;
    if let Some(path) = &arg.simplified_events {
        session
            .simplified_events
            .save_csv(path)
            .with_context(|| format!("Failed to write simplified events: {}", path.display()))?;
    }

    let report = VifReport::compute(&session.design, &task.contrasts)?;
    for (contrast, vif) in report.entries() {
        info!(contrast = %contrast, vif, "contrast VIF");
    }
    let output = Output::from_output_path(arg.output.clone())?;
    let display_path = output.display_path();
    report
        .write_csv(output)
        .with_context(|| format!("Failed to write VIF report to {display_path}"))?;
    Ok(())
}
