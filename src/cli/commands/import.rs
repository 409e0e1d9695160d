use std::path::PathBuf;

use clap::Args;

use super::super::{read_json_file, render, Ctx};
use crate::Result;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// A previously exported save file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub(crate) fn handle(ctx: &Ctx, args: ImportArgs) -> Result<()> {
    let value = read_json_file(&args.file)?;
    let mut manager = ctx.manager()?;
    // Rejections surface as a user-visible message; the stored document is
    // untouched in that case.
    let doc = manager.import_save(&value)?;
    if ctx.json {
        render::print_json(&doc)
    } else {
        if !ctx.quiet {
            println!("✓ imported {}", args.file.display());
            println!("{}", render::render_summary(&doc));
        }
        Ok(())
    }
}
