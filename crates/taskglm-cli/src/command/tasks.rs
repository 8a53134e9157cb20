use std::path::PathBuf;

use taskglm_tasks::registry::TaskRegistry;

use crate::{model::pipeline_config::PipelineConfig, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TasksArg {
    /// Task to show as JSON; every task id is listed when omitted
    task: Option<String>,
    /// Output file path for the JSON (stdout when omitted)
    #[arg(long, requires = "task")]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TasksArg) -> anyhow::Result<()> {
    let registry = TaskRegistry::builtin(PipelineConfig::default().model_break_period)?;
    let Some(id) = &arg.task else {
        for task in registry.tasks() {
            println!(
                "{:<32} {:>3} regressors {:>3} contrasts",
                task.id,
                task.regressors.len(),
                task.contrasts.len()
            );
        }
        return Ok(());
    };
    Output::save_json(registry.get(id)?, arg.output.clone())
}
