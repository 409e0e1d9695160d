use std::path::PathBuf;

use clap::Args;

use super::super::Ctx;
use crate::Result;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

pub(crate) fn handle(ctx: &Ctx, args: ExportArgs) -> Result<()> {
    let manager = ctx.manager()?;
    let exported = manager.export_save()?;
    match args.path {
        Some(path) => {
            std::fs::write(&path, &exported)?;
            if !ctx.quiet {
                println!("✓ exported save to {}", path.display());
            }
        }
        None => println!("{exported}"),
    }
    Ok(())
}
