use clap::Subcommand;

use super::super::{render, Ctx};
use crate::store::RevisionStore;
use crate::Result;

#[derive(Subcommand, Debug)]
pub enum RevisionsCmd {
    /// List retained revisions, oldest first.
    List,
    /// Print the payload of one revision.
    Show { id: i64 },
}

pub(crate) fn handle(ctx: &Ctx, cmd: RevisionsCmd) -> Result<()> {
    let store = RevisionStore::open(&ctx.revisions_path())?.with_keep(ctx.config.autosave.keep);
    match cmd {
        RevisionsCmd::List => {
            let revisions = store.list()?;
            if ctx.json {
                render::print_json(&revisions)
            } else {
                println!("{}", render::render_revisions(&revisions));
                Ok(())
            }
        }
        RevisionsCmd::Show { id } => {
            let revisions = store.list()?;
            match revisions.iter().find(|r| r.id == id) {
                Some(revision) => {
                    println!("{}", revision.payload);
                    Ok(())
                }
                None => Err(crate::Error::Validation {
                    field: "id".to_string(),
                    reason: format!("no revision #{id}"),
                }),
            }
        }
    }
}
