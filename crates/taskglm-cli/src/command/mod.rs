use clap::{Parser, Subcommand};

use self::{
    first_level::FirstLevelArg, fixed_effects::FixedEffectsArg, tasks::TasksArg, vif::VifArg,
};

mod first_level;
mod fixed_effects;
mod pipeline_args;
mod tasks;
mod vif;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fit first-level models for subjects x tasks and combine their sessions
    FirstLevel(#[clap(flatten)] FirstLevelArg),
    /// Recombine per-session maps already on disk
    FixedEffects(#[clap(flatten)] FixedEffectsArg),
    /// Contrast VIFs of one session's design, without fitting
    Vif(#[clap(flatten)] VifArg),
    /// List the task registry or show one task as JSON
    Tasks(#[clap(flatten)] TasksArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::FirstLevel(arg) => first_level::run(&arg)?,
        Mode::FixedEffects(arg) => fixed_effects::run(&arg)?,
        Mode::Vif(arg) => vif::run(&arg)?,
        Mode::Tasks(arg) => tasks::run(&arg)?,
    }
    Ok(())
}
