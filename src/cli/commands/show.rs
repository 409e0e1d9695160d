use super::super::{render, Ctx};
use crate::Result;

pub(crate) fn handle(ctx: &Ctx) -> Result<()> {
    let manager = ctx.manager()?;
    let doc = manager.load_or_baseline();
    if ctx.json {
        render::print_json(&doc)
    } else {
        println!("{}", render::render_summary(&doc));
        Ok(())
    }
}
