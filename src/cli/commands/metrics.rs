use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::Value;

use super::super::{render, Ctx};
use crate::metrics::MetricsRecorder;
use crate::{Error, Result};

#[derive(Subcommand, Debug)]
pub enum MetricsCmd {
    /// Append an event to the log.
    Track(TrackArgs),
    /// List recorded events, oldest first.
    List,
    /// Dump the full log as pretty-printed JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// Empty the log (the session id is kept).
    Clear,
}

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Event name, e.g. `click` or `scroll`.
    pub event: String,

    /// Extra payload fields as KEY=VALUE pairs. Values parse as JSON when
    /// they can, otherwise they are stored as strings.
    #[arg(value_name = "KEY=VALUE")]
    pub kv: Vec<String>,
}

pub(crate) fn handle(ctx: &Ctx, cmd: MetricsCmd) -> Result<()> {
    let recorder = MetricsRecorder::new(ctx.kv_store()?)?;
    match cmd {
        MetricsCmd::Track(args) => {
            let payload = parse_payload(&args.kv)?;
            mirror_into_save(ctx, &args.event, &payload)?;
            recorder.track(&args.event, payload)?;
            if !ctx.quiet {
                println!("✓ tracked {} (sid {})", args.event, recorder.sid());
            }
            Ok(())
        }
        MetricsCmd::List => {
            let events = recorder.events();
            if ctx.json {
                render::print_json(&events)
            } else {
                println!("{}", render::render_events(&events));
                Ok(())
            }
        }
        MetricsCmd::Export { path } => {
            let blob = recorder.export();
            match path {
                Some(path) => {
                    std::fs::write(&path, &blob)?;
                    if !ctx.quiet {
                        println!("✓ exported metrics log to {}", path.display());
                    }
                }
                None => println!("{blob}"),
            }
            Ok(())
        }
        MetricsCmd::Clear => {
            recorder.clear()?;
            if !ctx.quiet {
                println!("✓ metrics log cleared");
            }
            Ok(())
        }
    }
}

/// Interaction events also feed the aggregate counters that ride along in
/// the save document, next to the standalone event log.
fn mirror_into_save(ctx: &Ctx, event: &str, payload: &BTreeMap<String, Value>) -> Result<()> {
    let mut manager = ctx.manager()?;
    match event {
        "click" => {
            manager.with_doc(|doc| doc.telemetry.record_click())?;
        }
        "scroll" => {
            if let Some(depth) = payload.get("depth").and_then(Value::as_u64) {
                let depth = depth.min(100) as u8;
                manager.with_doc(|doc| doc.telemetry.record_scroll(depth))?;
            }
        }
        "dwell" => {
            let section = payload.get("section").and_then(Value::as_str);
            let ms = payload.get("ms").and_then(Value::as_u64);
            if let (Some(section), Some(ms)) = (section, ms) {
                let section = section.to_string();
                manager.with_doc(|doc| doc.telemetry.record_dwell(&section, ms))?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_payload(pairs: &[String]) -> Result<BTreeMap<String, Value>> {
    let mut payload = BTreeMap::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(Error::Validation {
                field: "payload".to_string(),
                reason: format!("`{pair}` is not KEY=VALUE"),
            });
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        payload.insert(key.to_string(), value);
    }
    Ok(payload)
}
