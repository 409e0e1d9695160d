//! The save state manager.
//!
//! Owns the canonical save document: loads it, merges in baseline defaults,
//! remote-provided defaults and user imports, and persists after every
//! mutation. Constructed explicitly over a store and a fetcher; there are no
//! ambient globals. Every read re-fetches from the durable store, so no
//! long-lived mutable reference to the document exists outside a single
//! operation.

use serde_json::Value;
use thiserror::Error;

use crate::core::{
    merge, Entitlement, Plan, SaveClock, SaveDocument, Trial, WallMs, BASELINE_LANGUAGE_REF,
};
use crate::fetch::{fetch_first, Fetcher};
use crate::store::{keys, KvStore, StoreError};

/// Candidate locations for the updates manifest, tried in order.
pub const UPDATE_CANDIDATES: &[&str] = &["updates.json", "data/updates.json", "assets/updates.json"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import rejected: expected a JSON object, got {got}")]
    NotAnObject { got: &'static str },
    #[error("import rejected: {reason}")]
    Malformed { reason: String },
}

pub struct SaveManager {
    store: KvStore,
    fetcher: Box<dyn Fetcher>,
    clock: SaveClock,
}

impl SaveManager {
    pub fn new(store: KvStore, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            store,
            fetcher,
            clock: SaveClock::new(),
        }
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Deserialize the durable entry. Absent or corrupt entries are `None`.
    pub fn load(&self) -> Option<SaveDocument> {
        self.store.get_json(keys::SAVE)
    }

    pub fn load_or_baseline(&self) -> SaveDocument {
        self.load().unwrap_or_else(SaveDocument::baseline)
    }

    /// Stamp `meta.updated_at` and write durably. The stamp never goes
    /// backward within this manager, even across a wall-clock jump.
    pub fn save(&mut self, doc: &mut SaveDocument) -> Result<(), StoreError> {
        doc.meta.updated_at = self.clock.tick();
        self.store.put_json(keys::SAVE, doc)
    }

    /// Load, mutate, persist. The closure sees a fresh read of the document.
    pub fn with_doc(
        &mut self,
        mutate: impl FnOnce(&mut SaveDocument),
    ) -> crate::Result<SaveDocument> {
        let mut doc = self.load_or_baseline();
        mutate(&mut doc);
        self.save(&mut doc)?;
        Ok(doc)
    }

    /// Pretty-printed serialization of the current document, for download.
    pub fn export_save(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.load_or_baseline())?)
    }

    /// Merge a user-provided document in and persist.
    ///
    /// `ui`, `flags`, `profile`, `language` and `telemetry` shallow-merge
    /// with the import winning per key; `trials` is wholesale-replaced when
    /// present and an array. A non-object or malformed import is rejected
    /// without touching the persisted document.
    pub fn import_save(&mut self, value: &Value) -> crate::Result<SaveDocument> {
        let current = self.load_or_baseline();
        let mut doc = merged_with_import(&current, value)?;
        self.save(&mut doc)?;
        Ok(doc)
    }

    /// Prepend a trial with a fresh timestamp and persist. Trials are
    /// immutable once recorded.
    pub fn add_trial(&mut self, mut trial: Trial) -> crate::Result<SaveDocument> {
        trial.ts = WallMs::now();
        self.with_doc(|doc| doc.trials.insert(0, trial))
    }

    /// Startup assembly of the save document.
    ///
    /// Every fetch is independently best-effort: a miss degrades that single
    /// step to a no-op and the rest continues, so a usable document is
    /// persisted even fully offline.
    pub fn init(&mut self) -> crate::Result<SaveDocument> {
        // Work on the raw stored JSON so that keys genuinely absent from the
        // stored document (older schema, trimmed import) can take manifest
        // defaults, while any present local value wins. A fresh store seeds
        // only `meta`: every other section stays absent so remote defaults
        // land before serde fills the remaining holes from the baseline.
        let mut raw = match self.store.get_json::<Value>(keys::SAVE) {
            Some(value) if value.is_object() => value,
            _ => {
                let mut seed = serde_json::Map::new();
                seed.insert(
                    "meta".to_string(),
                    serde_json::to_value(SaveDocument::baseline().meta)?,
                );
                Value::Object(seed)
            }
        };

        match fetch_first(self.fetcher.as_ref(), UPDATE_CANDIDATES) {
            Some(manifest) => apply_updates_manifest(&mut raw, &manifest),
            None => tracing::debug!("no updates manifest deployed, continuing with local state"),
        }

        let mut doc: SaveDocument = match serde_json::from_value(raw) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(%err, "stored document unusable, rebuilding from baseline");
                SaveDocument::baseline()
            }
        };

        let ref_path = doc.language.ref_path.clone();
        if !ref_path.trim().is_empty() {
            match fetch_first(self.fetcher.as_ref(), &[ref_path.as_str()]) {
                Some(pack) => merge_language_pack(&mut doc, &pack),
                None => tracing::debug!(path = %ref_path, "language pack not deployed"),
            }
        }

        doc.telemetry.touch_session(WallMs::now());

        // Persist unconditionally: a durable baseline must exist after init
        // even if nothing above changed anything.
        self.save(&mut doc)?;
        Ok(doc)
    }

    // ------------------------------------------------------------------
    // Auxiliary flat keys
    // ------------------------------------------------------------------

    pub fn plan(&self) -> Option<Plan> {
        self.store
            .get(keys::PLAN)
            .and_then(|raw| Plan::parse(&raw))
    }

    pub fn set_plan(&self, plan: Plan) -> Result<(), StoreError> {
        self.store.put(keys::PLAN, plan.as_str())
    }

    pub fn entitlements(&self) -> Entitlement {
        crate::core::resolve(self.plan())
    }

    /// Experiment bucket, assigned randomly once and persisted.
    pub fn canary_cohort(&self) -> Result<String, StoreError> {
        if let Some(existing) = self.store.get(keys::CANARY_COHORT) {
            let trimmed = existing.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
        let cohort = if rand::random::<bool>() {
            "canary"
        } else {
            "control"
        };
        self.store.put(keys::CANARY_COHORT, cohort)?;
        Ok(cohort.to_string())
    }
}

/// Import merge at the JSON level, validated back into a typed document.
/// The current document is untouched on any failure.
fn merged_with_import(
    current: &SaveDocument,
    incoming: &Value,
) -> Result<SaveDocument, ImportError> {
    let incoming_obj = incoming.as_object().ok_or(ImportError::NotAnObject {
        got: json_type(incoming),
    })?;
    let mut doc_val = serde_json::to_value(current).map_err(|err| ImportError::Malformed {
        reason: err.to_string(),
    })?;

    for section in ["ui", "flags", "profile", "language", "telemetry"] {
        if let Some(inc) = incoming_obj.get(section) {
            ensure_object(&mut doc_val, section);
            merge::shallow_overwrite(&mut doc_val[section], inc);
        }
    }
    if let Some(trials) = incoming_obj.get("trials") {
        if trials.is_array() {
            doc_val["trials"] = trials.clone();
        }
    }

    serde_json::from_value(doc_val).map_err(|err| ImportError::Malformed {
        reason: err.to_string(),
    })
}

/// Overlay an updates manifest onto the raw stored document.
///
/// Defaults fill only keys the local document does not carry; flag defaults
/// fill only flags never explicitly set; `imports` deltas go through the
/// normal import merge, each one independently best-effort.
fn apply_updates_manifest(raw: &mut Value, manifest: &Value) {
    if let Some(version) = manifest.get("version").and_then(Value::as_str) {
        ensure_object(raw, "meta");
        raw["meta"]["updates_version"] = Value::String(version.to_string());
    }

    if let Some(defaults) = manifest.get("defaults") {
        if let Some(ui_defaults) = defaults.get("ui") {
            ensure_object(raw, "ui");
            merge::shallow_underlay(&mut raw["ui"], ui_defaults);
        }
        if let Some(lang_ref) = defaults.get("language_ref").and_then(Value::as_str) {
            let local_ref = raw
                .get("language")
                .and_then(|l| l.get("ref"))
                .and_then(Value::as_str);
            if local_ref.is_none() || local_ref == Some(BASELINE_LANGUAGE_REF) {
                ensure_object(raw, "language");
                raw["language"]["ref"] = Value::String(lang_ref.to_string());
            }
        }
    }

    if let Some(flag_defaults) = manifest.get("flags") {
        ensure_object(raw, "flags");
        for (manifest_key, flag_key) in [
            ("learning_enabled_default", "learning"),
            ("autosave_enabled_default", "autosave"),
        ] {
            if raw["flags"].get(flag_key).is_some() {
                continue; // explicitly set locally
            }
            if let Some(value) = flag_defaults.get(manifest_key).and_then(Value::as_bool) {
                raw["flags"][flag_key] = Value::Bool(value);
            }
        }
    }

    if let Some(imports) = manifest.get("imports").and_then(Value::as_array) {
        for (idx, delta) in imports.iter().enumerate() {
            let current: SaveDocument = match serde_json::from_value(raw.clone()) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(%err, "document unusable mid-overlay, skipping imports");
                    break;
                }
            };
            match merged_with_import(&current, delta) {
                Ok(next) => match serde_json::to_value(&next) {
                    Ok(value) => *raw = value,
                    Err(err) => tracing::warn!(idx, %err, "manifest import delta skipped"),
                },
                Err(err) => tracing::warn!(idx, %err, "manifest import delta skipped"),
            }
        }
    }
}

/// Merge a fetched language pack under the local mappings; local entries win
/// on key collision.
fn merge_language_pack(doc: &mut SaveDocument, pack: &Value) {
    let lang = &mut doc.language;
    for (field, local) in [
        ("seeds", &mut lang.seeds),
        ("format_forcers", &mut lang.format_forcers),
        ("workflows", &mut lang.workflows),
        ("prompts", &mut lang.prompts),
    ] {
        if let Some(remote) = pack.get(field).and_then(Value::as_object) {
            merge::underlay_map(local, remote);
        }
    }
}

fn ensure_object(value: &mut Value, key: &str) {
    let needs_reset = match value.get(key) {
        Some(existing) => !existing.is_object(),
        None => true,
    };
    if needs_reset {
        value[key] = Value::Object(serde_json::Map::new());
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
