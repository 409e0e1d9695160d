use std::time::Duration;

use clap::Args;

use super::super::Ctx;
use crate::autosave::{self, AutosaveConfig};
use crate::Result;

#[derive(Args, Debug)]
pub struct AutosaveArgs {
    /// Run for this many seconds, then stop. Runs until interrupted if
    /// omitted.
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,
}

pub(crate) fn handle(ctx: &Ctx, args: AutosaveArgs) -> Result<()> {
    if ctx.config.autosave.disabled {
        if !ctx.quiet {
            println!("autosave is disabled in the config");
        }
        return Ok(());
    }
    let manager = ctx.manager()?;
    let doc = manager.load_or_baseline();
    if !doc.flags.autosave_effective() {
        if !ctx.quiet {
            println!("autosave is switched off by the save's flags");
        }
        return Ok(());
    }

    let config = AutosaveConfig {
        save_every: Duration::from_secs(ctx.config.autosave.save_every_secs),
        snapshot_every: Duration::from_secs(ctx.config.autosave.snapshot_every_secs),
        keep: ctx.config.autosave.keep,
    };
    if !ctx.quiet {
        println!(
            "autosave running (save every {}s, snapshot every {}s, keep {})",
            ctx.config.autosave.save_every_secs,
            ctx.config.autosave.snapshot_every_secs,
            ctx.config.autosave.keep,
        );
    }
    let handle = autosave::start(ctx.kv_store()?, ctx.revisions_path(), config);

    match args.duration {
        Some(secs) => {
            std::thread::sleep(Duration::from_secs(secs));
            handle.stop();
            if !ctx.quiet {
                println!("autosave stopped");
            }
        }
        None => loop {
            std::thread::park();
        },
    }
    Ok(())
}
