use super::super::{render, Ctx};
use crate::ui;
use crate::Result;

pub(crate) fn handle(ctx: &Ctx) -> Result<()> {
    let mut manager = ctx.manager()?;
    let doc = manager.init()?;

    if ctx.json {
        return render::print_json(&doc);
    }
    if !ctx.quiet {
        println!("✓ save ready at {}", ctx.data_dir.display());
        println!("{}", render::render_summary(&doc));
        println!("{}", ui::render_root_block(&doc.ui));
        if doc.flags.autosave_effective() && !ctx.config.autosave.disabled {
            println!("autosave: run `gc autosave` to start the loop");
        }
    }
    Ok(())
}
