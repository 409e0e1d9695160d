use clap::{builder::BoolishValueParser, Args, Subcommand};

use super::super::{render, Ctx};
use crate::Result;

#[derive(Subcommand, Debug)]
pub enum FlagsCmd {
    /// Show flag values, marking unset flags that fall back to defaults.
    Show,
    /// Set one or more flags explicitly.
    Set(FlagsSetArgs),
}

#[derive(Args, Debug)]
pub struct FlagsSetArgs {
    /// Opt in to learning-mode content.
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub learning: Option<bool>,

    /// Enable the periodic autosave loop.
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub autosave: Option<bool>,

    /// Share anonymized usage data.
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub share_anon: Option<bool>,
}

pub(crate) fn handle(ctx: &Ctx, cmd: FlagsCmd) -> Result<()> {
    let mut manager = ctx.manager()?;
    match cmd {
        FlagsCmd::Show => {
            let doc = manager.load_or_baseline();
            if ctx.json {
                render::print_json(&doc.flags)
            } else {
                println!("{}", render::render_flags(&doc.flags));
                Ok(())
            }
        }
        FlagsCmd::Set(args) => {
            let doc = manager.with_doc(|doc| {
                if args.learning.is_some() {
                    doc.flags.learning = args.learning;
                }
                if args.autosave.is_some() {
                    doc.flags.autosave = args.autosave;
                }
                if args.share_anon.is_some() {
                    doc.flags.share_anon = args.share_anon;
                }
            })?;
            if ctx.json {
                render::print_json(&doc.flags)
            } else {
                if !ctx.quiet {
                    println!("{}", render::render_flags(&doc.flags));
                }
                Ok(())
            }
        }
    }
}
