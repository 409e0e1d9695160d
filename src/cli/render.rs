//! Human renderers for CLI outputs.
//!
//! Pure formatting; handlers gather the data.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::core::{Entitlement, Flags, Plan, SaveDocument, Trial, WallMs};
use crate::metrics::MetricEvent;
use crate::store::Revision;
use crate::Result;

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn fmt_ts(ts: WallMs) -> String {
    let secs = (ts.0 / 1000) as i64;
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.0.to_string())
}

pub fn render_summary(doc: &SaveDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("save v{}", doc.meta.version));
    if let Some(updates) = &doc.meta.updates_version {
        out.push_str(&format!(" (updates {updates})"));
    }
    out.push('\n');
    out.push_str(&format!("  updated: {}\n", fmt_ts(doc.meta.updated_at)));
    out.push_str(&format!(
        "  ui: accent {} radius {}px glow {:.2} theme {}\n",
        doc.ui.accent,
        doc.ui.radius,
        doc.ui.glow,
        doc.ui.theme.as_str()
    ));
    out.push_str(&format!(
        "  flags: learning {} autosave {} share_anon {}\n",
        flag_str(doc.flags.learning, doc.flags.learning_effective()),
        flag_str(doc.flags.autosave, doc.flags.autosave_effective()),
        flag_str(doc.flags.share_anon, doc.flags.share_anon_effective()),
    ));
    out.push_str(&format!(
        "  language: {} ({} seeds, {} prompts)\n",
        doc.language.ref_path,
        doc.language.seeds.len(),
        doc.language.prompts.len()
    ));
    out.push_str(&format!(
        "  trials: {}   clicks: {}   scroll depth: {}%",
        doc.trials.len(),
        doc.telemetry.clicks,
        doc.telemetry.scroll.depth
    ));
    out
}

fn flag_str(raw: Option<bool>, effective: bool) -> String {
    match raw {
        Some(v) => v.to_string(),
        None => format!("{effective} (default)"),
    }
}

pub fn render_flags(flags: &Flags) -> String {
    format!(
        "learning:   {}\nautosave:   {}\nshare_anon: {}",
        flag_str(flags.learning, flags.learning_effective()),
        flag_str(flags.autosave, flags.autosave_effective()),
        flag_str(flags.share_anon, flags.share_anon_effective()),
    )
}

pub fn render_trials(trials: &[Trial]) -> String {
    if trials.is_empty() {
        return "no trials recorded".to_string();
    }
    let mut out = String::new();
    for (i, trial) in trials.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] {}",
            i + 1,
            fmt_ts(trial.ts),
            trial.app
        ));
        if let Some(model) = &trial.model {
            out.push_str(&format!(" ({model})"));
        }
        out.push_str(&format!(": {}", trial.prompt));
        if let Some(notes) = &trial.notes {
            out.push_str(&format!(" ({notes})"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn render_entitlement(plan: Option<Plan>, entitlement: &Entitlement) -> String {
    let plan_str = plan.map(|p| p.as_str()).unwrap_or("(none)");
    let mut out = format!("plan: {plan_str}\n");
    out.push_str(&format!(
        "  watermark: {}\n  community: {:?}\n  export: {:?}",
        entitlement.watermark, entitlement.community, entitlement.export
    ));
    if entitlement.whitelist == Some(true) {
        out.push_str("\n  whitelisted");
    }
    out
}

pub fn render_revisions(revisions: &[Revision]) -> String {
    if revisions.is_empty() {
        return "no revisions".to_string();
    }
    let mut out = String::new();
    for revision in revisions {
        out.push_str(&format!(
            "#{} {} ({} bytes)\n",
            revision.id,
            fmt_ts(revision.ts),
            revision.payload.len()
        ));
    }
    out.trim_end().to_string()
}

pub fn render_events(events: &[MetricEvent]) -> String {
    if events.is_empty() {
        return "no events recorded".to_string();
    }
    let mut out = String::new();
    for event in events {
        out.push_str(&format!("{} {}", fmt_ts(event.t), event.event));
        if !event.payload.is_empty() {
            out.push_str(&format!(" {}", serde_json::Value::Object(
                event.payload.clone().into_iter().collect()
            )));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
