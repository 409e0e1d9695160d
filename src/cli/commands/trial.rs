use clap::{Args, Subcommand};

use super::super::{render, Ctx};
use crate::core::Trial;
use crate::Result;

#[derive(Subcommand, Debug)]
pub enum TrialCmd {
    /// Record a trial run.
    Add(TrialAddArgs),
    /// List recorded trials, most recent first.
    List,
}

#[derive(Args, Debug)]
pub struct TrialAddArgs {
    /// Application the trial ran against.
    #[arg(long)]
    pub app: String,

    /// Prompt text used for the run.
    #[arg(long)]
    pub prompt: String,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Run duration in seconds.
    #[arg(long)]
    pub duration: Option<u64>,

    #[arg(long)]
    pub format_forcer: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

pub(crate) fn handle(ctx: &Ctx, cmd: TrialCmd) -> Result<()> {
    match cmd {
        TrialCmd::Add(args) => {
            let mut trial = Trial::new(args.app, args.prompt);
            trial.model = args.model;
            trial.seed = args.seed;
            trial.duration = args.duration;
            trial.format_forcer = args.format_forcer;
            trial.notes = args.notes;

            let mut manager = ctx.manager()?;
            let doc = manager.add_trial(trial)?;
            if ctx.json {
                render::print_json(&doc.trials[0])
            } else {
                if !ctx.quiet {
                    println!("✓ recorded trial for {}", doc.trials[0].app);
                }
                Ok(())
            }
        }
        TrialCmd::List => {
            let manager = ctx.manager()?;
            let doc = manager.load_or_baseline();
            if ctx.json {
                render::print_json(&doc.trials)
            } else {
                println!("{}", render::render_trials(&doc.trials));
                Ok(())
            }
        }
    }
}
