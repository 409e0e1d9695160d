use clap::Subcommand;

use super::super::{render, Ctx};
use crate::core::{resolve_str, Plan};
use crate::{Error, Result};

#[derive(Subcommand, Debug)]
pub enum PlanCmd {
    /// Show the stored plan and resolved entitlements.
    Show,
    /// Set the stored plan.
    Set {
        /// One of: trial, basic, silver, gold, diamond.
        plan: String,
    },
    /// Resolve entitlements for an arbitrary plan id without storing it.
    Resolve { plan: String },
}

pub(crate) fn handle(ctx: &Ctx, cmd: PlanCmd) -> Result<()> {
    let manager = ctx.manager()?;
    match cmd {
        PlanCmd::Show => {
            let plan = manager.plan();
            let entitlement = manager.entitlements();
            if ctx.json {
                render::print_json(&serde_json::json!({
                    "plan": plan.map(|p| p.as_str()),
                    "entitlements": entitlement,
                }))
            } else {
                println!("{}", render::render_entitlement(plan, &entitlement));
                Ok(())
            }
        }
        PlanCmd::Set { plan } => {
            let plan = Plan::parse(&plan).ok_or_else(|| Error::Validation {
                field: "plan".to_string(),
                reason: format!("`{plan}` is not a known plan"),
            })?;
            manager.set_plan(plan)?;
            if !ctx.quiet {
                println!("✓ plan set to {plan}");
            }
            Ok(())
        }
        PlanCmd::Resolve { plan } => {
            let entitlement = resolve_str(&plan);
            if ctx.json {
                render::print_json(&entitlement)
            } else {
                println!(
                    "{}",
                    render::render_entitlement(Plan::parse(&plan), &entitlement)
                );
                Ok(())
            }
        }
    }
}
