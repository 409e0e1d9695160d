//! The canonical save document.
//!
//! One document per data dir, persisted under a fixed key. Every section is
//! `#[serde(default)]` so a document written by an older build (or a partial
//! import) still loads; unknown fields are ignored on the way in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clock::WallMs;
use super::trial::Trial;

pub const SAVE_SCHEMA_VERSION: &str = "1.3";

/// Baseline flag values, used when a flag was never explicitly set and no
/// updates manifest supplied a default.
pub const BASELINE_LEARNING: bool = false;
pub const BASELINE_AUTOSAVE: bool = true;
pub const BASELINE_SHARE_ANON: bool = false;

pub const BASELINE_LANGUAGE_REF: &str = "lang/grid_lang.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveDocument {
    pub meta: SaveMeta,
    pub ui: UiPrefs,
    pub flags: Flags,
    pub profile: Profile,
    pub language: LanguagePack,
    pub trials: Vec<Trial>,
    pub telemetry: SaveTelemetry,
}

impl SaveDocument {
    /// Hardcoded baseline: all defaults, empty collections, fresh timestamps.
    pub fn baseline() -> Self {
        let now = WallMs::now();
        Self {
            meta: SaveMeta {
                version: SAVE_SCHEMA_VERSION.to_string(),
                created_at: now,
                updated_at: now,
                updates_version: None,
            },
            ..Self::default()
        }
    }
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self {
            meta: SaveMeta::default(),
            ui: UiPrefs::default(),
            flags: Flags::default(),
            profile: Profile::default(),
            language: LanguagePack::default(),
            trials: Vec::new(),
            telemetry: SaveTelemetry::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveMeta {
    pub version: String,
    pub created_at: WallMs,
    pub updated_at: WallMs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates_version: Option<String>,
}

impl Default for SaveMeta {
    fn default() -> Self {
        Self {
            version: SAVE_SCHEMA_VERSION.to_string(),
            created_at: WallMs::default(),
            updated_at: WallMs::default(),
            updates_version: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
    Light,
    Contrast,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Contrast => "contrast",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

/// Visual preferences. Values are clamped/validated at the input boundary
/// (see `crate::ui`), not here: storage holds whatever was accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPrefs {
    pub accent: String,
    pub radius: u32,
    pub glow: f64,
    pub theme: Theme,
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            accent: "#00e5ff".to_string(),
            radius: 14,
            glow: 0.6,
            theme: Theme::Dark,
        }
    }
}

/// Behavioral toggles. Tri-state: `None` means "never explicitly set", which
/// is what lets an updates manifest fill in a default exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosave: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_anon: Option<bool>,
}

impl Flags {
    pub fn learning_effective(&self) -> bool {
        self.learning.unwrap_or(BASELINE_LEARNING)
    }

    pub fn autosave_effective(&self) -> bool {
        self.autosave.unwrap_or(BASELINE_AUTOSAVE)
    }

    pub fn share_anon_effective(&self) -> bool {
        self.share_anon.unwrap_or(BASELINE_SHARE_ANON)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub owner: bool,
    pub admin_invite: bool,
}

/// Language reference data: seed packs, prompt templates, workflows and
/// format forcers. Each mapping merges shallowly with a remote pack; local
/// entries win on key collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagePack {
    #[serde(rename = "ref")]
    pub ref_path: String,
    pub seeds: BTreeMap<String, Value>,
    pub format_forcers: BTreeMap<String, Value>,
    pub workflows: BTreeMap<String, Value>,
    pub prompts: BTreeMap<String, Value>,
}

impl Default for LanguagePack {
    fn default() -> Self {
        Self {
            ref_path: BASELINE_LANGUAGE_REF.to_string(),
            seeds: BTreeMap::new(),
            format_forcers: BTreeMap::new(),
            workflows: BTreeMap::new(),
            prompts: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollState {
    /// Deepest scroll position ever seen, in percent.
    pub depth: u8,
}

/// In-document interaction counters (distinct from the event log in
/// `crate::metrics`; these ride along in the save document).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveTelemetry {
    pub clicks: u64,
    pub dwell: BTreeMap<String, u64>,
    pub scroll: ScrollState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_session: Option<WallMs>,
    pub scores: BTreeMap<String, f64>,
}

impl SaveTelemetry {
    pub fn record_click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    pub fn record_dwell(&mut self, section: &str, ms: u64) {
        let entry = self.dwell.entry(section.to_string()).or_insert(0);
        *entry = entry.saturating_add(ms);
    }

    pub fn record_scroll(&mut self, depth_percent: u8) {
        let depth = depth_percent.min(100);
        if depth > self.scroll.depth {
            self.scroll.depth = depth;
        }
    }

    pub fn touch_session(&mut self, now: WallMs) {
        self.last_session = Some(now);
    }
}
